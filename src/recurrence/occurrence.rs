// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

//! Previous-occurrence search: for an aligned wall-clock instant, find the
//! greatest occurrence of the pattern that starts at or before it, without
//! enumerating occurrences.

use jiff::civil::{Date, DateTime, Time, Weekday};
use jiff::{SignedDuration, Span};

use crate::datetime::{DayOfWeek, WeekIndex, nth_weekday_of_month};
use crate::recurrence::settings::RecurrencePattern;

/// One activation start of a recurring window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Occurrence {
    /// Start of the occurrence, in the recurrence time zone.
    pub(crate) start: DateTime,
    /// Zero-based index of the occurrence; the one at the window anchor is 0.
    pub(crate) index: i64,
}

/// The greatest occurrence starting at or before `time`.
///
/// Both `start` and `time` are wall-clocks aligned into the recurrence time
/// zone, with `time >= start`. Returns `None` when the pattern fields
/// violate their invariants or the calendar arithmetic leaves the
/// representable range; callers treat that as "no occurrence".
pub(crate) fn previous_occurrence(
    pattern: &RecurrencePattern,
    start: DateTime,
    time: DateTime,
) -> Option<Occurrence> {
    match pattern {
        RecurrencePattern::Daily { interval } => previous_daily(start, time, *interval),
        RecurrencePattern::Weekly {
            interval,
            days_of_week,
            first_day_of_week,
        } => previous_weekly(start, time, *interval, days_of_week, *first_day_of_week),
        RecurrencePattern::AbsoluteMonthly { interval, .. } => {
            previous_absolute_monthly(start, time, *interval)
        }
        RecurrencePattern::RelativeMonthly {
            interval,
            days_of_week,
            index,
        } => previous_relative_monthly(start, time, *interval, days_of_week, *index),
        RecurrencePattern::AbsoluteYearly { interval, .. } => {
            previous_absolute_yearly(start, time, *interval)
        }
        RecurrencePattern::RelativeYearly {
            interval,
            days_of_week,
            index,
            ..
        } => previous_relative_yearly(start, time, *interval, days_of_week, *index),
    }
}

fn previous_daily(start: DateTime, time: DateTime, interval: i64) -> Option<Occurrence> {
    if interval < 1 {
        return None;
    }

    let gap = time.duration_since(start);
    // An interval too large to fit the calendar repeats never: only the
    // anchor itself has occurred.
    let n = whole_intervals(gap, interval).unwrap_or(0);
    let date = add_days(start.date(), n.checked_mul(interval)?)?;
    Some(Occurrence {
        start: date.to_datetime(start.time()),
        index: n,
    })
}

fn previous_weekly(
    start: DateTime,
    time: DateTime,
    interval: i64,
    days_of_week: &[DayOfWeek],
    first_day_of_week: DayOfWeek,
) -> Option<Occurrence> {
    if interval < 1 || days_of_week.is_empty() {
        return None;
    }

    let mask = weekday_mask(days_of_week);
    let per_week = i64::from(mask.count_ones());

    // Days from the anchor's weekday to the next interval boundary, 1..=7.
    let start_wd = start.date().weekday().to_sunday_zero_offset();
    let first = first_day_of_week.to_sunday_zero();
    let mut partial_days = i64::from((first - start_wd + 7).rem_euclid(7));
    if partial_days == 0 {
        partial_days = 7;
    }

    // Midnight at which the second interval begins: the end of the anchor's
    // partial week plus the skipped weeks of the first interval.
    let boundary = interval
        .checked_sub(1)
        .and_then(|w| w.checked_mul(7))
        .and_then(|skip| add_days(start.date(), partial_days.checked_add(skip)?))
        .map(|date| date.to_datetime(Time::midnight()));

    let Some(boundary) = boundary.filter(|b| time >= *b) else {
        // Still inside the first interval: only the partial first week has
        // occurrences.
        let (prev, index) = scan_partial_week(start, partial_days, mask, Some(time))?;
        return Some(Occurrence { start: prev, index });
    };

    let step_days = interval.checked_mul(7)?;
    let n = whole_intervals(time.duration_since(boundary), step_days)?;
    let week_start = add_days(boundary.date(), n.checked_mul(step_days)?)?;

    let (_, partial_count) = scan_partial_week(start, partial_days, mask, None)?;
    let first_week_occurrences = partial_count + 1;

    // Last occurrence of the current active week that is not after `time`.
    let (prev, matched) = scan_week(week_start, start.time(), mask, Some(time))?;
    if let Some(prev) = prev {
        let index = first_week_occurrences + n.checked_mul(per_week)? + (matched - 1);
        return Some(Occurrence { start: prev, index });
    }

    // `time` precedes every occurrence of the current active week; fall back
    // to the last occurrence of the previous active block.
    if n == 0 {
        let (prev, index) = scan_partial_week(start, partial_days, mask, None)?;
        Some(Occurrence { start: prev, index })
    } else {
        let previous_week = add_days(week_start, step_days.checked_neg()?)?;
        let (prev, _) = scan_week(previous_week, start.time(), mask, None)?;
        Some(Occurrence {
            start: prev?,
            index: first_week_occurrences + n.checked_mul(per_week)? - 1,
        })
    }
}

fn previous_absolute_monthly(start: DateTime, time: DateTime, interval: i64) -> Option<Occurrence> {
    if interval < 1 {
        return None;
    }

    let mut gap = month_gap(start, time);
    if (time.day(), time.time()) < (start.day(), start.time()) {
        gap -= 1;
    }
    if gap < 0 {
        return None;
    }

    let n = gap / interval;
    let date = add_months(start.date(), n.checked_mul(interval)?)?;
    Some(Occurrence {
        start: date.to_datetime(start.time()),
        index: n,
    })
}

fn previous_relative_monthly(
    start: DateTime,
    time: DateTime,
    interval: i64,
    days_of_week: &[DayOfWeek],
    index: WeekIndex,
) -> Option<Occurrence> {
    if interval < 1 || days_of_week.is_empty() {
        return None;
    }

    let mut gap = month_gap(start, time);
    if !nth_occurrence_passed(time, start.time(), time.year(), time.month(), days_of_week, index) {
        gap -= 1;
    }
    if gap < 0 {
        return None;
    }

    let n = gap / interval;
    let target = add_months(start.date(), n.checked_mul(interval)?)?;
    let date = earliest_nth_weekday(target.year(), target.month(), days_of_week, index)?;
    Some(Occurrence {
        start: date.to_datetime(start.time()),
        index: n,
    })
}

fn previous_absolute_yearly(start: DateTime, time: DateTime, interval: i64) -> Option<Occurrence> {
    if interval < 1 {
        return None;
    }

    let mut gap = i64::from(time.year()) - i64::from(start.year());
    if (time.date().day_of_year(), time.time()) < (start.date().day_of_year(), start.time()) {
        gap -= 1;
    }
    if gap < 0 {
        return None;
    }

    let n = gap / interval;
    let date = add_years(start.date(), n.checked_mul(interval)?)?;
    Some(Occurrence {
        start: date.to_datetime(start.time()),
        index: n,
    })
}

fn previous_relative_yearly(
    start: DateTime,
    time: DateTime,
    interval: i64,
    days_of_week: &[DayOfWeek],
    index: WeekIndex,
) -> Option<Occurrence> {
    if interval < 1 || days_of_week.is_empty() {
        return None;
    }

    let mut gap = i64::from(time.year()) - i64::from(start.year());
    if time.month() < start.month() {
        gap -= 1;
    } else if time.month() == start.month()
        && !nth_occurrence_passed(time, start.time(), time.year(), time.month(), days_of_week, index)
    {
        gap -= 1;
    }
    if gap < 0 {
        return None;
    }

    let n = gap / interval;
    let target = add_years(start.date(), n.checked_mul(interval)?)?;
    let date = earliest_nth_weekday(target.year(), target.month(), days_of_week, index)?;
    Some(Occurrence {
        start: date.to_datetime(start.time()),
        index: n,
    })
}

/// True when some selected weekday's nth occurrence in the given month,
/// taken at the anchor's time-of-day, is at or before `time`.
fn nth_occurrence_passed(
    time: DateTime,
    time_of_day: Time,
    year: i16,
    month: i8,
    days_of_week: &[DayOfWeek],
    index: WeekIndex,
) -> bool {
    days_of_week.iter().any(|&day| {
        nth_weekday_of_month(year, month, index, day)
            .is_some_and(|date| date.to_datetime(time_of_day) <= time)
    })
}

/// The earliest nth-weekday date among the selected weekdays. Later matching
/// dates in the same month are not occurrences; the pattern fires once per
/// interval.
fn earliest_nth_weekday(
    year: i16,
    month: i8,
    days_of_week: &[DayOfWeek],
    index: WeekIndex,
) -> Option<Date> {
    days_of_week
        .iter()
        .filter_map(|&day| nth_weekday_of_month(year, month, index, day))
        .min()
}

/// Scans the anchor's partial first week (the anchor date plus the
/// `partial_days - 1` days that finish its week). Returns the last
/// occurrence at or before `cap` and its zero-based index; the anchor itself
/// is occurrence 0 regardless of the weekday set.
fn scan_partial_week(
    start: DateTime,
    partial_days: i64,
    mask: u8,
    cap: Option<DateTime>,
) -> Option<(DateTime, i64)> {
    let mut prev = start;
    let mut index = 0;
    let mut date = start.date();
    for _ in 1..partial_days {
        date = date.tomorrow().ok()?;
        let occurrence = date.to_datetime(start.time());
        if cap.is_some_and(|cap| occurrence > cap) {
            break;
        }
        if mask_contains(mask, date.weekday()) {
            prev = occurrence;
            index += 1;
        }
    }
    Some((prev, index))
}

/// Scans the seven days of an active week. Returns the last occurrence at or
/// before `cap` (if any) and how many occurrences were seen.
fn scan_week(
    week_start: Date,
    time_of_day: Time,
    mask: u8,
    cap: Option<DateTime>,
) -> Option<(Option<DateTime>, i64)> {
    let mut prev = None;
    let mut matched = 0;
    let mut date = week_start;
    for day in 0..7 {
        if day > 0 {
            date = date.tomorrow().ok()?;
        }
        let occurrence = date.to_datetime(time_of_day);
        if cap.is_some_and(|cap| occurrence > cap) {
            break;
        }
        if mask_contains(mask, date.weekday()) {
            prev = Some(occurrence);
            matched += 1;
        }
    }
    Some((prev, matched))
}

fn weekday_mask(days_of_week: &[DayOfWeek]) -> u8 {
    days_of_week
        .iter()
        .fold(0, |mask, day| mask | 1 << day.to_sunday_zero())
}

fn mask_contains(mask: u8, weekday: Weekday) -> bool {
    mask & 1 << weekday.to_sunday_zero_offset() != 0
}

fn month_gap(start: DateTime, time: DateTime) -> i64 {
    12 * (i64::from(time.year()) - i64::from(start.year()))
        + (i64::from(time.month()) - i64::from(start.month()))
}

/// How many whole steps of `step_days` fit into `gap`.
fn whole_intervals(gap: SignedDuration, step_days: i64) -> Option<i64> {
    let step_seconds = step_days.checked_mul(86_400)?;
    if step_seconds <= 0 {
        return None;
    }
    let step = i128::from(step_seconds) * 1_000_000_000;
    i64::try_from(gap.as_nanos() / step).ok()
}

fn add_days(date: Date, days: i64) -> Option<Date> {
    let span = Span::new().try_days(days).ok()?;
    date.checked_add(span).ok()
}

fn add_months(date: Date, months: i64) -> Option<Date> {
    let span = Span::new().try_months(months).ok()?;
    date.checked_add(span).ok()
}

fn add_years(date: Date, years: i64) -> Option<Date> {
    let span = Span::new().try_years(years).ok()?;
    date.checked_add(span).ok()
}
