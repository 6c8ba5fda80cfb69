// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

//! Temporal activation predicates for feature management.
//!
//! Two independent engines decide whether an instant falls inside an active
//! time window:
//!
//! - [`TimeWindowSettings`] describes an anchor window with an optional
//!   recurrence rule (daily, weekly, monthly, or yearly, absolute or
//!   relative, bounded by an end date or an occurrence count, in an
//!   explicit fixed time zone). [`TimeWindowSettings::validate`] checks the
//!   record once; [`TimeWindowSettings::is_active`] answers the predicate.
//! - [`CrontabExpression`] parses a five-field crontab expression and
//!   matches wall-clock instants against it.
//!
//! Both engines are pure: they own no state, perform no I/O, and never read
//! the system clock. The caller supplies the timestamp and a settings value
//! the configuration layer has already materialized.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::pedantic
)]
#![allow(clippy::similar_names, clippy::single_match_else)]

mod crontab;
mod datetime;
mod recurrence;

pub use crate::crontab::{CrontabExpression, CrontabField, CrontabFieldKind, FieldError, ParseError};
pub use crate::datetime::{DayOfWeek, WeekIndex, parse_utc_offset};
pub use crate::recurrence::{
    Recurrence, RecurrenceBound, RecurrencePattern, RecurrenceRange, TimeWindowSettings,
    ValidationError, ValidationFailure,
};
