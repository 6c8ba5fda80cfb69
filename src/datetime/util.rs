// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Zoned;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;

use crate::datetime::day_of_week::{DayOfWeek, WeekIndex};

/// NOTE: Accepted at the configuration boundary, so they should be stable
/// across releases.
const FORMAT_DATEONLY: &str = "%Y-%m-%d";
const FORMAT_FLOATING: &str = "%Y-%m-%dT%H:%M:%S";
const FORMAT_FLOATING_MINUTES: &str = "%Y-%m-%dT%H:%M";
const FORMAT_OFFSET_COLON: &str = "%Y-%m-%dT%H:%M:%S%:z";
const FORMAT_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%z";
const FORMAT_OFFSET_MINUTES: &str = "%Y-%m-%dT%H:%M%:z";

/// The nth occurrence of `weekday` within the given month.
///
/// `Last` resolves to the fifth occurrence when the month has one, and
/// falls back to the fourth otherwise.
pub(crate) fn nth_weekday_of_month(
    year: i16,
    month: i8,
    index: WeekIndex,
    weekday: DayOfWeek,
) -> Option<Date> {
    let first = Date::new(year, month, 1).ok()?;
    let delta = (weekday.to_sunday_zero() - first.weekday().to_sunday_zero_offset() + 7) % 7;
    let mut day = 1 + delta + 7 * index.offset_weeks();
    if day > first.days_in_month() {
        day -= 7;
    }
    Date::new(year, month, day).ok()
}

/// Parses an instant with an explicit UTC offset.
///
/// Accepted forms, tried by shape: RFC 9557 (`2023-09-01T08:00:00+05:30[+05:30]`),
/// ISO 8601 with offset (`2023-09-01T08:00:00+05:30`, colon optional,
/// seconds optional), and the `Z` suffix for UTC.
pub(crate) fn parse_offset_datetime(s: &str) -> Option<Zoned> {
    if let Some(wall) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        let dt = DateTime::strptime(FORMAT_FLOATING, wall)
            .or_else(|_| DateTime::strptime(FORMAT_FLOATING_MINUTES, wall))
            .ok()?;
        return dt.to_zoned(TimeZone::UTC).ok();
    }

    s.parse::<Zoned>()
        .or_else(|_| Zoned::strptime(FORMAT_OFFSET_COLON, s))
        .or_else(|_| Zoned::strptime(FORMAT_OFFSET, s))
        .or_else(|_| Zoned::strptime(FORMAT_OFFSET_MINUTES, s))
        .ok()
}

/// Parses a calendar date of the form `2023-09-01`.
pub(crate) fn parse_civil_date(s: &str) -> Option<Date> {
    Date::strptime(FORMAT_DATEONLY, s).ok()
}
