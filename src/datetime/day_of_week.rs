// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};

use jiff::civil::Weekday;

/// Day of the week.
///
/// Deserializes from the full English name (`"Monday"`); the three-letter
/// abbreviations used by crontab expressions are handled by
/// [`DayOfWeek::from_abbrev`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[expect(missing_docs)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// Sunday-based index, 0 (Sunday) through 6 (Saturday).
    #[must_use]
    pub fn to_sunday_zero(self) -> i8 {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }

    /// Parses a three-letter abbreviation (`"sun"`, `"MON"`, ...).
    #[must_use]
    pub fn from_abbrev(s: &str) -> Option<Self> {
        let day = match s.to_ascii_lowercase().as_str() {
            "sun" => DayOfWeek::Sunday,
            "mon" => DayOfWeek::Monday,
            "tue" => DayOfWeek::Tuesday,
            "wed" => DayOfWeek::Wednesday,
            "thu" => DayOfWeek::Thursday,
            "fri" => DayOfWeek::Friday,
            "sat" => DayOfWeek::Saturday,
            _ => return None,
        };
        Some(day)
    }

    pub(crate) fn matches(self, weekday: Weekday) -> bool {
        self.to_sunday_zero() == weekday.to_sunday_zero_offset()
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Sunday => Weekday::Sunday,
            DayOfWeek::Monday => Weekday::Monday,
            DayOfWeek::Tuesday => Weekday::Tuesday,
            DayOfWeek::Wednesday => Weekday::Wednesday,
            DayOfWeek::Thursday => Weekday::Thursday,
            DayOfWeek::Friday => Weekday::Friday,
            DayOfWeek::Saturday => Weekday::Saturday,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sunday => DayOfWeek::Sunday,
            Weekday::Monday => DayOfWeek::Monday,
            Weekday::Tuesday => DayOfWeek::Tuesday,
            Weekday::Wednesday => DayOfWeek::Wednesday,
            Weekday::Thursday => DayOfWeek::Thursday,
            Weekday::Friday => DayOfWeek::Friday,
            Weekday::Saturday => DayOfWeek::Saturday,
        }
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        };
        write!(f, "{name}")
    }
}

/// Which occurrence of a weekday within a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[expect(missing_docs)]
pub enum WeekIndex {
    #[default]
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekIndex {
    /// Whole weeks to skip past the first matching weekday of the month.
    pub(crate) fn offset_weeks(self) -> i8 {
        match self {
            WeekIndex::First => 0,
            WeekIndex::Second => 1,
            WeekIndex::Third => 2,
            WeekIndex::Fourth => 3,
            WeekIndex::Last => 4,
        }
    }
}

impl Display for WeekIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeekIndex::First => "First",
            WeekIndex::Second => "Second",
            WeekIndex::Third => "Third",
            WeekIndex::Fourth => "Fourth",
            WeekIndex::Last => "Last",
        };
        write!(f, "{name}")
    }
}
