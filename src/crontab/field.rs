// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};

use crate::datetime::DayOfWeek;

/// Which of the five crontab fields a value belongs to. Each kind knows its
/// numeric domain and named aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrontabFieldKind {
    /// Minute of the hour, 0-59.
    Minute,
    /// Hour of the day, 0-23.
    Hour,
    /// Day of the month, 1-31.
    DayOfMonth,
    /// Month of the year, 1-12, with `jan`..`dec` aliases.
    Month,
    /// Day of the week, 0-7 with `sun`..`sat` aliases; 0 and 7 both mean
    /// Sunday.
    DayOfWeek,
}

impl CrontabFieldKind {
    /// The inclusive numeric domain accepted while parsing.
    #[must_use]
    pub fn domain(self) -> (u8, u8) {
        match self {
            CrontabFieldKind::Minute => (0, 59),
            CrontabFieldKind::Hour => (0, 23),
            CrontabFieldKind::DayOfMonth => (1, 31),
            CrontabFieldKind::Month => (1, 12),
            CrontabFieldKind::DayOfWeek => (0, 7),
        }
    }

    fn alias(self, token: &str) -> Option<u8> {
        match self {
            CrontabFieldKind::Month => {
                let month = match token.to_ascii_lowercase().as_str() {
                    "jan" => 1,
                    "feb" => 2,
                    "mar" => 3,
                    "apr" => 4,
                    "may" => 5,
                    "jun" => 6,
                    "jul" => 7,
                    "aug" => 8,
                    "sep" => 9,
                    "oct" => 10,
                    "nov" => 11,
                    "dec" => 12,
                    _ => return None,
                };
                Some(month)
            }
            CrontabFieldKind::DayOfWeek => {
                DayOfWeek::from_abbrev(token).map(|day| day.to_sunday_zero().unsigned_abs())
            }
            _ => None,
        }
    }
}

impl Display for CrontabFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrontabFieldKind::Minute => "minute",
            CrontabFieldKind::Hour => "hour",
            CrontabFieldKind::DayOfMonth => "day-of-month",
            CrontabFieldKind::Month => "month",
            CrontabFieldKind::DayOfWeek => "day-of-week",
        };
        write!(f, "{name}")
    }
}

/// Why a crontab field failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A comma-separated segment was empty.
    #[error("empty segment")]
    EmptySegment,

    /// A token was neither a number nor a recognized name.
    #[error("`{token}` is not a number or a recognized name")]
    InvalidNumber {
        /// The offending token.
        token: String,
    },

    /// A value fell outside the field's domain.
    #[error("value {value} is outside {lo}..={hi}")]
    OutOfRange {
        /// The offending value.
        value: u8,
        /// Lower end of the domain.
        lo: u8,
        /// Upper end of the domain.
        hi: u8,
    },

    /// A step of zero was given.
    #[error("step must be at least 1")]
    ZeroStep,

    /// A range ran backwards.
    #[error("range start {start} is greater than end {end}")]
    InvertedRange {
        /// Start of the range.
        start: u8,
        /// End of the range.
        end: u8,
    },
}

/// One parsed crontab field: the set of values it accepts, stored as a bit
/// set over the field's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrontabField {
    kind: CrontabFieldKind,
    values: u64,
}

impl CrontabField {
    /// Parses a single field token against the domain of `kind`.
    pub(crate) fn parse(kind: CrontabFieldKind, token: &str) -> Result<Self, FieldError> {
        let (lo, hi) = kind.domain();
        let mut values = 0u64;

        for segment in token.split(',') {
            if segment.is_empty() {
                return Err(FieldError::EmptySegment);
            }

            let (range, step, stepped) = match segment.split_once('/') {
                Some((range, step)) => (range, parse_step(step)?, true),
                None => (segment, 1, false),
            };

            let (first, last) = if range == "*" {
                (lo, hi)
            } else if let Some((a, b)) = range.split_once('-') {
                (parse_value(kind, a, lo, hi)?, parse_value(kind, b, lo, hi)?)
            } else {
                let value = parse_value(kind, range, lo, hi)?;
                // A bare value with a step means "from the value to the end
                // of the domain".
                if stepped { (value, hi) } else { (value, value) }
            };

            if first > last {
                return Err(FieldError::InvertedRange {
                    start: first,
                    end: last,
                });
            }

            let mut value = first;
            while value <= last {
                values |= 1 << value;
                match value.checked_add(step) {
                    Some(next) => value = next,
                    None => break,
                }
            }
        }

        // 0 and 7 both mean Sunday.
        if kind == CrontabFieldKind::DayOfWeek && values & 1 << 7 != 0 {
            values = (values & !(1 << 7)) | 1;
        }

        Ok(CrontabField { kind, values })
    }

    /// The field kind this value set belongs to.
    #[must_use]
    pub fn kind(&self) -> CrontabFieldKind {
        self.kind
    }

    /// Whether the field accepts the value.
    #[must_use]
    pub fn contains(&self, value: u8) -> bool {
        value < 64 && self.values & 1 << value != 0
    }

    /// The accepted values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        (0..64u8).filter(|value| self.contains(*value))
    }

    fn domain_mask(&self) -> u64 {
        let (lo, hi) = match self.kind {
            // Day-of-week normalizes 7 to 0, so its rendered domain is 0-6.
            CrontabFieldKind::DayOfWeek => (0, 6),
            kind => kind.domain(),
        };
        (lo..=hi).fold(0u64, |mask, value| mask | 1 << value)
    }
}

impl Display for CrontabField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.values == self.domain_mask() {
            return write!(f, "*");
        }
        let mut first = true;
        for value in self.values() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{value}")?;
            first = false;
        }
        Ok(())
    }
}

fn parse_step(token: &str) -> Result<u8, FieldError> {
    if token.is_empty() {
        return Err(FieldError::EmptySegment);
    }
    let step: u8 = token.parse().map_err(|_| FieldError::InvalidNumber {
        token: token.to_string(),
    })?;
    if step == 0 {
        return Err(FieldError::ZeroStep);
    }
    Ok(step)
}

fn parse_value(kind: CrontabFieldKind, token: &str, lo: u8, hi: u8) -> Result<u8, FieldError> {
    if token.is_empty() {
        return Err(FieldError::EmptySegment);
    }
    let value = match kind.alias(token) {
        Some(value) => value,
        None => token.parse().map_err(|_| FieldError::InvalidNumber {
            token: token.to_string(),
        })?,
    };
    if value < lo || value > hi {
        return Err(FieldError::OutOfRange { value, lo, hi });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kind: CrontabFieldKind, token: &str) -> CrontabField {
        CrontabField::parse(kind, token).unwrap()
    }

    #[test]
    fn asterisk_covers_the_whole_domain() {
        let field = parse(CrontabFieldKind::Hour, "*");
        for hour in 0..=23 {
            assert!(field.contains(hour));
        }
        assert!(!field.contains(24));
    }

    #[test]
    fn single_values_and_ranges() {
        let field = parse(CrontabFieldKind::Minute, "5");
        assert!(field.contains(5));
        assert!(!field.contains(4));

        let field = parse(CrontabFieldKind::Hour, "9-17");
        assert!(field.contains(9));
        assert!(field.contains(17));
        assert!(!field.contains(8));
        assert!(!field.contains(18));
    }

    #[test]
    fn steps_select_every_nth_value() {
        let field = parse(CrontabFieldKind::Minute, "*/15");
        assert_eq!(field.values().collect::<Vec<_>>(), vec![0, 15, 30, 45]);

        let field = parse(CrontabFieldKind::Minute, "10-30/10");
        assert_eq!(field.values().collect::<Vec<_>>(), vec![10, 20, 30]);

        // A bare value with a step runs to the end of the domain.
        let field = parse(CrontabFieldKind::Hour, "8/4");
        assert_eq!(field.values().collect::<Vec<_>>(), vec![8, 12, 16, 20]);
    }

    #[test]
    fn lists_union_their_segments() {
        let field = parse(CrontabFieldKind::Minute, "0,30,45-47");
        assert_eq!(
            field.values().collect::<Vec<_>>(),
            vec![0, 30, 45, 46, 47]
        );
    }

    #[test]
    fn month_names_are_aliases() {
        let field = parse(CrontabFieldKind::Month, "jan,JUL,Dec");
        assert_eq!(field.values().collect::<Vec<_>>(), vec![1, 7, 12]);

        let field = parse(CrontabFieldKind::Month, "mar-may");
        assert_eq!(field.values().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn weekday_names_are_aliases() {
        let field = parse(CrontabFieldKind::DayOfWeek, "mon-fri");
        assert_eq!(field.values().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn seven_normalizes_to_sunday() {
        let field = parse(CrontabFieldKind::DayOfWeek, "7");
        assert!(field.contains(0));
        assert!(!field.contains(7));

        // A range ending at 7 folds into Sunday as well.
        let field = parse(CrontabFieldKind::DayOfWeek, "5-7");
        assert_eq!(field.values().collect::<Vec<_>>(), vec![0, 5, 6]);
    }

    #[test]
    fn rejects_out_of_domain_values() {
        assert_eq!(
            CrontabField::parse(CrontabFieldKind::Minute, "60"),
            Err(FieldError::OutOfRange {
                value: 60,
                lo: 0,
                hi: 59
            })
        );
        assert_eq!(
            CrontabField::parse(CrontabFieldKind::Month, "0"),
            Err(FieldError::OutOfRange {
                value: 0,
                lo: 1,
                hi: 12
            })
        );
    }

    #[test]
    fn rejects_malformed_segments() {
        assert_eq!(
            CrontabField::parse(CrontabFieldKind::Minute, "a"),
            Err(FieldError::InvalidNumber {
                token: "a".to_string()
            })
        );
        assert_eq!(
            CrontabField::parse(CrontabFieldKind::Minute, "1,,2"),
            Err(FieldError::EmptySegment)
        );
        assert_eq!(
            CrontabField::parse(CrontabFieldKind::Minute, "*/0"),
            Err(FieldError::ZeroStep)
        );
        assert_eq!(
            CrontabField::parse(CrontabFieldKind::Minute, "10-5"),
            Err(FieldError::InvertedRange { start: 10, end: 5 })
        );
        assert_eq!(
            CrontabField::parse(CrontabFieldKind::Minute, "5-"),
            Err(FieldError::EmptySegment)
        );
    }

    #[test]
    fn renders_a_normalized_form() {
        assert_eq!(parse(CrontabFieldKind::Hour, "*").to_string(), "*");
        assert_eq!(parse(CrontabFieldKind::Hour, "0-23").to_string(), "*");
        assert_eq!(parse(CrontabFieldKind::Minute, "*/20").to_string(), "0,20,40");
        assert_eq!(
            parse(CrontabFieldKind::DayOfWeek, "sat,sun").to_string(),
            "0,6"
        );
        // Day-of-week covering 0-7 still renders as the whole domain.
        assert_eq!(parse(CrontabFieldKind::DayOfWeek, "0-7").to_string(), "*");
    }
}
