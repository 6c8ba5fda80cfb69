// SPDX-FileCopyrightText: 2026 The timegate authors
//
// SPDX-License-Identifier: Apache-2.0

mod day_of_week;
mod offset;
mod util;

pub use day_of_week::{DayOfWeek, WeekIndex};
pub use offset::parse_utc_offset;
pub(crate) use offset::align;
pub(crate) use util::{nth_weekday_of_month, parse_civil_date, parse_offset_datetime};
