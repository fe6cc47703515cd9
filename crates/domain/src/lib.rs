// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod dispatch;
mod duty_log;
mod error;
mod inactivity;
mod settings;
mod status;
mod types;
mod unit;
mod validation;

#[cfg(test)]
mod tests;

pub use dispatch::{Assignment, AssignmentTarget, Call, Incident, TargetKind};
pub use duty_log::DutyLog;
pub use error::DomainError;
pub use inactivity::{ActiveType, is_stale};
pub use settings::{CadSettings, InactivityTimeouts};
pub use status::{ShouldDo, StatusCode};
pub use types::{
    AssignmentId, CallId, Discipline, DutyLogId, IncidentId, StatusCodeId, UnitId, UnitRef,
    format_timestamp, parse_timestamp,
};
pub use unit::{CombinedUnit, PrimaryUnit, Unit};
pub use validation::{
    MAX_CALLSIGN_LENGTH, MAX_PAGE_SIZE, Pagination, derive_combined_callsign, validate_callsign,
    validate_merge_members, validate_pagination, validate_required_text, validate_same_discipline,
};
