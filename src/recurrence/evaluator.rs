// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Zoned;
use jiff::tz::Offset;

use crate::datetime::{align, parse_utc_offset};
use crate::recurrence::occurrence::previous_occurrence;
use crate::recurrence::settings::{Recurrence, RecurrenceBound, TimeWindowSettings};

impl TimeWindowSettings {
    /// Whether `time` falls inside an active window.
    ///
    /// Without a recurrence rule this is `start <= time < end`. With one,
    /// `time` must fall inside `[occ, occ + (end - start))` for some
    /// occurrence `occ` admitted by the range bound.
    ///
    /// Expects settings that passed [`validate`](Self::validate); settings
    /// that would not are reported inactive rather than panicking.
    #[must_use]
    pub fn is_active(&self, time: &Zoned) -> bool {
        let Some(recurrence) = &self.recurrence else {
            return *time >= self.start && *time < self.end;
        };
        if *time < self.start {
            return false;
        }

        let offset = self.recurrence_offset(recurrence);
        let start = align(&self.start, offset);
        let aligned = align(time, offset);

        let Some(occurrence) = previous_occurrence(&recurrence.pattern, start, aligned) else {
            tracing::warn!(
                "no previous occurrence for a time at or after start; \
                 treating the window as inactive"
            );
            return false;
        };

        match recurrence.range.bound {
            RecurrenceBound::NoEnd => {}
            RecurrenceBound::EndDate { end_date } => {
                if occurrence.start.date() > end_date {
                    return false;
                }
            }
            RecurrenceBound::Numbered {
                number_of_occurrences,
            } => {
                if occurrence.index >= i64::from(number_of_occurrences) {
                    return false;
                }
            }
        }

        let duration = self.end.duration_since(&self.start);
        match occurrence.start.checked_add(duration) {
            Ok(window_end) => aligned < window_end,
            Err(_) => false,
        }
    }

    /// The fixed offset all calendar arithmetic is performed in: the parsed
    /// `recurrence_time_zone`, else the offset of `start`.
    pub(crate) fn recurrence_offset(&self, recurrence: &Recurrence) -> Offset {
        match &recurrence.range.recurrence_time_zone {
            Some(tz) => parse_utc_offset(tz).unwrap_or_else(|| {
                tracing::warn!(tz, "unrecognized recurrence time zone, using the start offset");
                self.start.offset()
            }),
            None => self.start.offset(),
        }
    }
}
