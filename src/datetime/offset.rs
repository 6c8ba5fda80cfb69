// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::OnceLock;

use jiff::Zoned;
use jiff::civil::DateTime;
use jiff::tz::Offset;
use regex::Regex;

/// Parses a recurrence time zone of the stable form `UTC+HH:MM` or
/// `UTC-HH:MM` (hours 00-14, minutes 00-59). Any other form is rejected.
#[must_use]
pub fn parse_utc_offset(s: &str) -> Option<Offset> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^UTC([+-])(0\d|1[0-4]):([0-5]\d)$").unwrap());

    let caps = re.captures(s)?;
    let sign: i32 = if &caps[1] == "-" { -1 } else { 1 };
    let hours: i32 = caps[2].parse().ok()?;
    let minutes: i32 = caps[3].parse().ok()?;
    Offset::from_seconds(sign * (hours * 3600 + minutes * 60)).ok()
}

/// Re-expresses an instant in the given fixed offset, for calendar-field
/// extraction.
pub(crate) fn align(time: &Zoned, offset: Offset) -> DateTime {
    offset.to_datetime(time.timestamp())
}
