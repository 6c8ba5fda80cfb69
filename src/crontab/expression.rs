// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::civil::DateTime;

use crate::crontab::field::{CrontabField, CrontabFieldKind, FieldError};

/// A crontab expression failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The expression did not contain exactly five fields.
    #[error("expected 5 fields (minute hour day-of-month month day-of-week), found {found}")]
    FieldCount {
        /// How many fields were present.
        found: usize,
    },

    /// A field failed to parse.
    #[error("{field} field (position {position}): {reason}")]
    Field {
        /// Which field was malformed.
        field: CrontabFieldKind,
        /// Zero-based position of the field in the expression.
        position: usize,
        /// Why the field was rejected.
        reason: FieldError,
    },
}

/// A parsed five-field crontab expression: minute, hour, day-of-month,
/// month, day-of-week.
///
/// Matching is a pure wall-clock test; the caller decides which time zone
/// the tested `DateTime` is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrontabExpression {
    minute: CrontabField,
    hour: CrontabField,
    day_of_month: CrontabField,
    month: CrontabField,
    day_of_week: CrontabField,
}

impl CrontabExpression {
    /// Parses a whitespace-separated five-field expression. Empty tokens
    /// are ignored; each field is parsed independently against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::FieldCount`] unless exactly five fields are
    /// present, or [`ParseError::Field`] for the first malformed field.
    pub fn parse(expression: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = expression.split_whitespace().collect();
        let [minute, hour, day_of_month, month, day_of_week] = tokens[..] else {
            return Err(ParseError::FieldCount {
                found: tokens.len(),
            });
        };

        let parse = |kind: CrontabFieldKind, token: &str, position: usize| {
            CrontabField::parse(kind, token).map_err(|reason| ParseError::Field {
                field: kind,
                position,
                reason,
            })
        };

        Ok(CrontabExpression {
            minute: parse(CrontabFieldKind::Minute, minute, 0)?,
            hour: parse(CrontabFieldKind::Hour, hour, 1)?,
            day_of_month: parse(CrontabFieldKind::DayOfMonth, day_of_month, 2)?,
            month: parse(CrontabFieldKind::Month, month, 3)?,
            day_of_week: parse(CrontabFieldKind::DayOfWeek, day_of_week, 4)?,
        })
    }

    /// Whether the wall-clock components of `time` satisfy all five fields.
    #[must_use]
    pub fn matches(&self, time: DateTime) -> bool {
        self.minute.contains(time.minute().unsigned_abs())
            && self.hour.contains(time.hour().unsigned_abs())
            && self.day_of_month.contains(time.day().unsigned_abs())
            && self.month.contains(time.month().unsigned_abs())
            && self
                .day_of_week
                .contains(time.date().weekday().to_sunday_zero_offset().unsigned_abs())
    }

    /// The five fields in expression order.
    #[must_use]
    pub fn fields(&self) -> [&CrontabField; 5] {
        [
            &self.minute,
            &self.hour,
            &self.day_of_month,
            &self.month,
            &self.day_of_week,
        ]
    }
}

impl FromStr for CrontabExpression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrontabExpression::parse(s)
    }
}

impl Display for CrontabExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}
