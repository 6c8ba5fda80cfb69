// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

mod evaluator;
mod occurrence;
mod settings;
mod validate;

pub use settings::{
    Recurrence, RecurrenceBound, RecurrencePattern, RecurrenceRange, TimeWindowSettings,
};
pub use validate::{ValidationError, ValidationFailure};
