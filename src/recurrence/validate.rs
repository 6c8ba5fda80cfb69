// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

//! Validation of recurrence settings. Every invariant is checked once, up
//! front; the evaluator assumes validated input.

use std::fmt::{self, Display};

use jiff::SignedDuration;
use jiff::civil::DateTime;

use crate::datetime::{DayOfWeek, align, nth_weekday_of_month, parse_utc_offset};
use crate::recurrence::settings::{
    RecurrenceBound, RecurrencePattern, TimeWindowSettings,
};

/// Why a settings record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    /// A mandatory field is absent or empty.
    Required,
    /// A numeric value is outside its domain, or the window is longer than
    /// the minimum gap between occurrences.
    OutOfRange,
    /// An enumeration value or time-zone string does not parse.
    Unrecognizable,
    /// The start of the window is not itself a valid first occurrence of
    /// the pattern.
    NotMatched,
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ValidationFailure::Required => "required value is missing or empty",
            ValidationFailure::OutOfRange => "value is out of range",
            ValidationFailure::Unrecognizable => "value is unrecognizable",
            ValidationFailure::NotMatched => "start does not match the recurrence pattern",
        };
        write!(f, "{message}")
    }
}

/// A settings record violated a recurrence invariant.
///
/// The field path is the canonical, machine-readable locator; the `Display`
/// message is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g.
    /// `recurrence.pattern.days_of_week`.
    pub field: &'static str,
    /// Why the field was rejected.
    pub reason: ValidationFailure,
}

impl ValidationError {
    fn new(field: &'static str, reason: ValidationFailure) -> Self {
        ValidationError { field, reason }
    }
}

impl TimeWindowSettings {
    /// Checks every invariant of the settings record, surfacing the first
    /// violation.
    ///
    /// # Errors
    ///
    /// Returns the dotted field path and reason of the first violated
    /// invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(recurrence) = &self.recurrence else {
            return if self.end > self.start {
                Ok(())
            } else {
                Err(ValidationError::new("end", ValidationFailure::OutOfRange))
            };
        };

        let pattern = &recurrence.pattern;
        validate_pattern_fields(pattern)?;

        if let RecurrenceBound::Numbered {
            number_of_occurrences,
        } = recurrence.range.bound
            && number_of_occurrences < 1
        {
            return Err(ValidationError::new(
                "recurrence.range.number_of_occurrences",
                ValidationFailure::OutOfRange,
            ));
        }

        let offset = match &recurrence.range.recurrence_time_zone {
            Some(tz) => parse_utc_offset(tz).ok_or_else(|| {
                ValidationError::new(
                    "recurrence.range.recurrence_time_zone",
                    ValidationFailure::Unrecognizable,
                )
            })?,
            None => self.start.offset(),
        };

        if self.end <= self.start {
            return Err(ValidationError::new("end", ValidationFailure::OutOfRange));
        }

        // The window must be shorter than any possible gap between
        // occurrences, so activations never overlap.
        let duration = self.end.duration_since(&self.start);
        if duration > days(pattern.minimum_gap_days()) {
            return Err(ValidationError::new("end", ValidationFailure::OutOfRange));
        }
        if let RecurrencePattern::Weekly {
            interval,
            days_of_week,
            first_day_of_week,
        } = pattern
            && duration > days(minimum_weekday_gap(days_of_week, *first_day_of_week, *interval))
        {
            return Err(ValidationError::new("end", ValidationFailure::OutOfRange));
        }

        let start = align(&self.start, offset);

        if let RecurrenceBound::EndDate { end_date } = recurrence.range.bound
            && end_date < start.date()
        {
            return Err(ValidationError::new(
                "recurrence.range.end_date",
                ValidationFailure::OutOfRange,
            ));
        }

        if !is_first_occurrence(pattern, start) {
            return Err(ValidationError::new("start", ValidationFailure::NotMatched));
        }

        Ok(())
    }
}

fn validate_pattern_fields(pattern: &RecurrencePattern) -> Result<(), ValidationError> {
    match pattern {
        RecurrencePattern::Weekly { days_of_week, .. }
        | RecurrencePattern::RelativeMonthly { days_of_week, .. }
        | RecurrencePattern::RelativeYearly { days_of_week, .. }
            if days_of_week.is_empty() =>
        {
            return Err(ValidationError::new(
                "recurrence.pattern.days_of_week",
                ValidationFailure::Required,
            ));
        }
        _ => {}
    }

    if pattern.interval() < 1 {
        return Err(ValidationError::new(
            "recurrence.pattern.interval",
            ValidationFailure::OutOfRange,
        ));
    }

    match *pattern {
        RecurrencePattern::AbsoluteMonthly { day_of_month, .. } => {
            check_domain(day_of_month, 1, 31, "recurrence.pattern.day_of_month")?;
        }
        RecurrencePattern::AbsoluteYearly {
            month,
            day_of_month,
            ..
        } => {
            check_domain(month, 1, 12, "recurrence.pattern.month")?;
            check_domain(day_of_month, 1, 31, "recurrence.pattern.day_of_month")?;
        }
        RecurrencePattern::RelativeYearly { month, .. } => {
            check_domain(month, 1, 12, "recurrence.pattern.month")?;
        }
        _ => {}
    }

    Ok(())
}

fn check_domain(value: i8, lo: i8, hi: i8, field: &'static str) -> Result<(), ValidationError> {
    if value < lo || value > hi {
        return Err(ValidationError::new(field, ValidationFailure::OutOfRange));
    }
    Ok(())
}

/// Whether the aligned start is itself a valid first occurrence.
fn is_first_occurrence(pattern: &RecurrencePattern, start: DateTime) -> bool {
    match pattern {
        RecurrencePattern::Daily { .. } => true,
        RecurrencePattern::Weekly { days_of_week, .. } => days_of_week
            .iter()
            .any(|day| day.matches(start.date().weekday())),
        RecurrencePattern::AbsoluteMonthly { day_of_month, .. } => start.day() == *day_of_month,
        RecurrencePattern::RelativeMonthly {
            days_of_week,
            index,
            ..
        } => {
            let earliest = days_of_week
                .iter()
                .filter_map(|&day| {
                    nth_weekday_of_month(start.year(), start.month(), *index, day)
                })
                .min();
            earliest == Some(start.date())
        }
        RecurrencePattern::AbsoluteYearly {
            month,
            day_of_month,
            ..
        } => start.month() == *month && start.day() == *day_of_month,
        RecurrencePattern::RelativeYearly {
            days_of_week,
            index,
            month,
            ..
        } => {
            let earliest = days_of_week
                .iter()
                .filter_map(|&day| {
                    nth_weekday_of_month(start.year(), start.month(), *index, day)
                })
                .min();
            start.month() == *month && earliest == Some(start.date())
        }
    }
}

/// The minimum gap, in days, between consecutive selected weekdays within
/// one interval cycle, measured from the first day of the week. With a
/// single selected weekday this is the whole cycle.
fn minimum_weekday_gap(days_of_week: &[DayOfWeek], first_day_of_week: DayOfWeek, interval: i64) -> i64 {
    let first = first_day_of_week.to_sunday_zero();
    let mut positions: Vec<i64> = days_of_week
        .iter()
        .map(|day| i64::from((day.to_sunday_zero() - first + 7).rem_euclid(7)))
        .collect();
    positions.sort_unstable();
    positions.dedup();

    let mut gap = i64::MAX;
    for pair in positions.windows(2) {
        gap = gap.min(pair[1] - pair[0]);
    }
    // Wrap-around from the last selected weekday to the first one of the
    // next active week.
    let wrap = interval
        .saturating_mul(7)
        .saturating_sub(positions.last().copied().unwrap_or(0))
        .saturating_add(positions.first().copied().unwrap_or(0));
    gap.min(wrap)
}

fn days(n: i64) -> SignedDuration {
    SignedDuration::from_secs(n.saturating_mul(86_400))
}

#[cfg(test)]
mod tests {
    use jiff::Zoned;
    use jiff::civil::{date, datetime};
    use jiff::tz::TimeZone;

    use crate::datetime::WeekIndex;
    use crate::recurrence::settings::{Recurrence, RecurrenceRange};

    use super::*;

    fn utc(year: i16, month: i8, day: i8, hour: i8, minute: i8) -> Zoned {
        datetime(year, month, day, hour, minute, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
    }

    fn weekly_settings(days: Vec<DayOfWeek>) -> TimeWindowSettings {
        TimeWindowSettings {
            start: utc(2023, 9, 4, 8, 0),
            end: utc(2023, 9, 4, 9, 0),
            recurrence: Some(Recurrence {
                pattern: RecurrencePattern::Weekly {
                    interval: 1,
                    days_of_week: days,
                    first_day_of_week: DayOfWeek::Sunday,
                },
                range: RecurrenceRange::default(),
            }),
        }
    }

    #[test]
    fn accepts_a_one_shot_window() {
        let s = TimeWindowSettings {
            start: utc(2023, 9, 1, 8, 0),
            end: utc(2023, 9, 1, 10, 0),
            recurrence: None,
        };
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn rejects_an_inverted_one_shot_window() {
        let s = TimeWindowSettings {
            start: utc(2023, 9, 1, 10, 0),
            end: utc(2023, 9, 1, 8, 0),
            recurrence: None,
        };
        assert_eq!(
            s.validate(),
            Err(ValidationError::new("end", ValidationFailure::OutOfRange))
        );
    }

    #[test]
    fn rejects_an_empty_weekday_set() {
        let s = weekly_settings(vec![]);
        assert_eq!(
            s.validate(),
            Err(ValidationError::new(
                "recurrence.pattern.days_of_week",
                ValidationFailure::Required
            ))
        );
    }

    #[test]
    fn rejects_a_zero_interval() {
        let mut s = weekly_settings(vec![DayOfWeek::Monday]);
        s.recurrence.as_mut().unwrap().pattern = RecurrencePattern::Weekly {
            interval: 0,
            days_of_week: vec![DayOfWeek::Monday],
            first_day_of_week: DayOfWeek::Sunday,
        };
        assert_eq!(
            s.validate(),
            Err(ValidationError::new(
                "recurrence.pattern.interval",
                ValidationFailure::OutOfRange
            ))
        );
    }

    #[test]
    fn rejects_numeric_fields_outside_their_domain() {
        let mut s = weekly_settings(vec![DayOfWeek::Monday]);
        s.start = utc(2023, 1, 15, 12, 0);
        s.end = utc(2023, 1, 15, 13, 0);
        s.recurrence.as_mut().unwrap().pattern = RecurrencePattern::AbsoluteMonthly {
            interval: 1,
            day_of_month: 32,
        };
        assert_eq!(
            s.validate(),
            Err(ValidationError::new(
                "recurrence.pattern.day_of_month",
                ValidationFailure::OutOfRange
            ))
        );

        s.recurrence.as_mut().unwrap().pattern = RecurrencePattern::AbsoluteYearly {
            interval: 1,
            month: 13,
            day_of_month: 15,
        };
        assert_eq!(
            s.validate(),
            Err(ValidationError::new(
                "recurrence.pattern.month",
                ValidationFailure::OutOfRange
            ))
        );
    }

    #[test]
    fn rejects_a_zero_occurrence_count() {
        let mut s = weekly_settings(vec![DayOfWeek::Monday]);
        s.recurrence.as_mut().unwrap().range.bound = RecurrenceBound::Numbered {
            number_of_occurrences: 0,
        };
        assert_eq!(
            s.validate(),
            Err(ValidationError::new(
                "recurrence.range.number_of_occurrences",
                ValidationFailure::OutOfRange
            ))
        );
    }

    #[test]
    fn rejects_an_unparseable_time_zone() {
        let mut s = weekly_settings(vec![DayOfWeek::Monday]);
        s.recurrence.as_mut().unwrap().range.recurrence_time_zone =
            Some("PST".to_string());
        assert_eq!(
            s.validate(),
            Err(ValidationError::new(
                "recurrence.range.recurrence_time_zone",
                ValidationFailure::Unrecognizable
            ))
        );
    }

    #[test]
    fn rejects_a_window_longer_than_the_interval() {
        let s = TimeWindowSettings {
            start: utc(2023, 9, 1, 8, 0),
            end: utc(2023, 9, 3, 8, 30),
            recurrence: Some(Recurrence {
                pattern: RecurrencePattern::Daily { interval: 2 },
                range: RecurrenceRange::default(),
            }),
        };
        assert_eq!(
            s.validate(),
            Err(ValidationError::new("end", ValidationFailure::OutOfRange))
        );
    }

    #[test]
    fn rejects_a_window_longer_than_the_weekday_gap() {
        // Monday and Wednesday are two days apart; a three-day window
        // overlaps the next activation.
        let mut s = weekly_settings(vec![DayOfWeek::Monday, DayOfWeek::Wednesday]);
        s.end = utc(2023, 9, 7, 8, 0);
        assert_eq!(
            s.validate(),
            Err(ValidationError::new("end", ValidationFailure::OutOfRange))
        );

        // A two-day window fits exactly.
        s.end = utc(2023, 9, 6, 8, 0);
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn rejects_an_end_date_before_start() {
        let mut s = weekly_settings(vec![DayOfWeek::Monday]);
        s.recurrence.as_mut().unwrap().range.bound = RecurrenceBound::EndDate {
            end_date: date(2023, 9, 3),
        };
        assert_eq!(
            s.validate(),
            Err(ValidationError::new(
                "recurrence.range.end_date",
                ValidationFailure::OutOfRange
            ))
        );
    }

    #[test]
    fn rejects_a_start_that_misses_the_pattern() {
        // 2023-09-04 is a Monday.
        let s = weekly_settings(vec![DayOfWeek::Tuesday]);
        assert_eq!(
            s.validate(),
            Err(ValidationError::new("start", ValidationFailure::NotMatched))
        );
    }

    #[test]
    fn accepts_a_start_on_the_nth_weekday() {
        // 2023-09-01 is the first Friday of September.
        let s = TimeWindowSettings {
            start: utc(2023, 9, 1, 8, 0),
            end: utc(2023, 9, 1, 9, 0),
            recurrence: Some(Recurrence {
                pattern: RecurrencePattern::RelativeMonthly {
                    interval: 1,
                    days_of_week: vec![DayOfWeek::Friday],
                    index: WeekIndex::First,
                },
                range: RecurrenceRange::default(),
            }),
        };
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn rejects_a_start_that_is_not_the_earliest_selected_weekday() {
        // The first Monday (09-04) comes after the first Friday (09-01), so
        // a window anchored on the Monday misses the month's occurrence.
        let s = TimeWindowSettings {
            start: utc(2023, 9, 4, 8, 0),
            end: utc(2023, 9, 4, 9, 0),
            recurrence: Some(Recurrence {
                pattern: RecurrencePattern::RelativeMonthly {
                    interval: 1,
                    days_of_week: vec![DayOfWeek::Monday, DayOfWeek::Friday],
                    index: WeekIndex::First,
                },
                range: RecurrenceRange::default(),
            }),
        };
        assert_eq!(
            s.validate(),
            Err(ValidationError::new("start", ValidationFailure::NotMatched))
        );
    }

    #[test]
    fn validation_depends_on_the_aligned_wall_clock_only() {
        // The same instant expressed with different offsets, aligned into
        // the same recurrence zone, validates identically.
        let base = TimeWindowSettings {
            start: utc(2023, 9, 4, 8, 0),
            end: utc(2023, 9, 4, 9, 0),
            recurrence: Some(Recurrence {
                pattern: RecurrencePattern::Weekly {
                    interval: 1,
                    days_of_week: vec![DayOfWeek::Monday],
                    first_day_of_week: DayOfWeek::Sunday,
                },
                range: RecurrenceRange {
                    bound: RecurrenceBound::NoEnd,
                    recurrence_time_zone: Some("UTC+00:00".to_string()),
                },
            }),
        };
        assert_eq!(base.validate(), Ok(()));

        // The same instants carrying a +05:00 offset align to the same
        // wall-clock in the recurrence zone.
        let tz = TimeZone::fixed(jiff::tz::offset(5));
        let mut shifted = base.clone();
        shifted.start = base.start.with_time_zone(tz.clone());
        shifted.end = base.end.with_time_zone(tz);
        assert_eq!(shifted.validate(), Ok(()));
    }
}
