// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

//! The typed settings model handed to the engine by the configuration
//! subsystem.

use jiff::Zoned;
use jiff::civil::Date;
use serde::de::{self, Deserialize};

use crate::datetime::{DayOfWeek, WeekIndex, parse_civil_date, parse_offset_datetime};

/// A time window that may recur.
///
/// Without a recurrence rule the window is the single interval
/// `[start, end)`; with one, the interval anchored at `start` repeats
/// according to the pattern, bounded by the range.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TimeWindowSettings {
    /// Start of the anchor window, with an explicit UTC offset.
    #[serde(deserialize_with = "deserialize_zoned")]
    pub start: Zoned,

    /// End of the anchor window. Must be after `start`.
    #[serde(deserialize_with = "deserialize_zoned")]
    pub end: Zoned,

    /// How the window repeats. Absent for a one-shot window.
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
}

/// A recurrence rule: how the window repeats and for how long.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Recurrence {
    /// The repetition scheme.
    #[serde(default)]
    pub pattern: RecurrencePattern,

    /// Bounds on the repetition.
    #[serde(default)]
    pub range: RecurrenceRange,
}

/// The repetition scheme of a recurring time window.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "type")]
pub enum RecurrencePattern {
    /// Repeats every `interval` days.
    Daily {
        /// Days between occurrences.
        #[serde(default = "default_interval")]
        interval: i64,
    },

    /// Repeats on the selected weekdays, every `interval` weeks.
    #[serde(rename_all = "camelCase")]
    Weekly {
        /// Weeks between active weeks.
        #[serde(default = "default_interval")]
        interval: i64,

        /// Weekdays on which the window activates. Must be non-empty and
        /// contain the weekday of `start`.
        #[serde(default)]
        days_of_week: Vec<DayOfWeek>,

        /// The weekday at which a new weekly interval begins. Determines
        /// interval boundaries, not which weekdays match.
        #[serde(default = "default_first_day_of_week")]
        first_day_of_week: DayOfWeek,
    },

    /// Repeats on a fixed day of the month, every `interval` months.
    #[serde(rename_all = "camelCase")]
    AbsoluteMonthly {
        /// Months between occurrences.
        #[serde(default = "default_interval")]
        interval: i64,

        /// Day of the month, 1-31.
        day_of_month: i8,
    },

    /// Repeats on the nth weekday of the month, every `interval` months.
    #[serde(rename_all = "camelCase")]
    RelativeMonthly {
        /// Months between occurrences.
        #[serde(default = "default_interval")]
        interval: i64,

        /// Candidate weekdays; the earliest matching date in the month is
        /// the occurrence.
        #[serde(default)]
        days_of_week: Vec<DayOfWeek>,

        /// Which occurrence of the weekday within the month.
        #[serde(default)]
        index: WeekIndex,
    },

    /// Repeats on a fixed month and day, every `interval` years.
    #[serde(rename_all = "camelCase")]
    AbsoluteYearly {
        /// Years between occurrences.
        #[serde(default = "default_interval")]
        interval: i64,

        /// Month of the year, 1-12.
        month: i8,

        /// Day of the month, 1-31.
        day_of_month: i8,
    },

    /// Repeats on the nth weekday of a fixed month, every `interval` years.
    #[serde(rename_all = "camelCase")]
    RelativeYearly {
        /// Years between occurrences.
        #[serde(default = "default_interval")]
        interval: i64,

        /// Candidate weekdays; the earliest matching date in the month is
        /// the occurrence.
        #[serde(default)]
        days_of_week: Vec<DayOfWeek>,

        /// Which occurrence of the weekday within the month.
        #[serde(default)]
        index: WeekIndex,

        /// Month of the year, 1-12.
        month: i8,
    },
}

impl RecurrencePattern {
    /// Days between occurrences for the pattern's scheme, taking `interval`
    /// into account. A conservative lower bound for month- and year-based
    /// patterns.
    #[must_use]
    pub fn minimum_gap_days(&self) -> i64 {
        match self {
            RecurrencePattern::Daily { interval } => *interval,
            RecurrencePattern::Weekly { interval, .. } => interval.saturating_mul(7),
            RecurrencePattern::AbsoluteMonthly { interval, .. }
            | RecurrencePattern::RelativeMonthly { interval, .. } => interval.saturating_mul(28),
            RecurrencePattern::AbsoluteYearly { interval, .. }
            | RecurrencePattern::RelativeYearly { interval, .. } => interval.saturating_mul(365),
        }
    }

    pub(crate) fn interval(&self) -> i64 {
        match self {
            RecurrencePattern::Daily { interval }
            | RecurrencePattern::Weekly { interval, .. }
            | RecurrencePattern::AbsoluteMonthly { interval, .. }
            | RecurrencePattern::RelativeMonthly { interval, .. }
            | RecurrencePattern::AbsoluteYearly { interval, .. }
            | RecurrencePattern::RelativeYearly { interval, .. } => *interval,
        }
    }
}

impl Default for RecurrencePattern {
    fn default() -> Self {
        RecurrencePattern::Daily { interval: 1 }
    }
}

/// Bounds on how long a recurrence keeps producing occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRange {
    /// How the recurrence ends.
    #[serde(flatten)]
    pub bound: RecurrenceBound,

    /// Time zone in which calendar arithmetic is performed, of the form
    /// `UTC+HH:MM` / `UTC-HH:MM`. Defaults to the offset of `start`.
    #[serde(default)]
    pub recurrence_time_zone: Option<String>,
}

/// How a recurrence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(tag = "type")]
pub enum RecurrenceBound {
    /// The recurrence repeats forever.
    #[default]
    NoEnd,

    /// The recurrence stops after a calendar date.
    #[serde(rename_all = "camelCase")]
    EndDate {
        /// Last date (in the recurrence time zone) on which an occurrence
        /// may start.
        #[serde(deserialize_with = "deserialize_date")]
        end_date: Date,
    },

    /// The recurrence stops after a fixed number of occurrences.
    #[serde(rename_all = "camelCase")]
    Numbered {
        /// How many occurrences are produced, counting the one at `start`.
        number_of_occurrences: u32,
    },
}

fn default_interval() -> i64 {
    1
}

fn default_first_day_of_week() -> DayOfWeek {
    DayOfWeek::Sunday
}

fn deserialize_zoned<'de, D>(deserializer: D) -> Result<Zoned, D::Error>
where
    D: de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_offset_datetime(&s)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {s:?}")))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_civil_date(&s).ok_or_else(|| de::Error::custom(format!("invalid date: {s:?}")))
}
