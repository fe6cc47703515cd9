// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Unit and incident coordination engine for computer-aided dispatch.
//!
//! The engine tracks which units are on duty, the status each one holds,
//! which call or incident it is attached to, and which primary units are
//! merged into combined units. Every operation runs against a
//! [`UnitRepository`] inside one store transaction and returns an
//! [`Outcome`]: the updated view plus the [`DispatchEvent`]s to publish
//! once the transaction commits.
//!
//! Operations:
//!
//! - [`set_unit_status`] applies a status and its duty, assignment and panic
//!   side effects.
//! - [`merge_units`] and [`unmerge_unit`] form and dissolve combined units.
//! - [`change_assignment`], [`end_call`] and [`end_incident`] attach units to
//!   calls and incidents under a per-target cap.
//! - [`list_calls`], [`list_incidents`] and [`list_units`] page through
//!   records with stale entries filtered out at read time.

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

mod assignment;
mod command;
mod duty;
mod error;
mod events;
mod listing;
mod merge;
mod notification;
mod repository;
mod resolve;
mod seed;
mod status_machine;
mod views;

#[cfg(test)]
mod tests;

pub use assignment::{assign_unit, change_assignment, end_call, end_incident, unassign_unit};
pub use command::{AssignmentChange, AssignmentMode, MergeRequest, StatusChange};
pub use error::CoreError;
pub use events::{DispatchEvent, Outcome};
pub use listing::{Page, get_unit, list_calls, list_duty_logs, list_incidents, list_units};
pub use merge::{merge_units, unmerge_unit};
pub use notification::webhook_payload;
pub use repository::{StoreError, UnitRepository};
pub use resolve::{ResolvedUnit, resolve_unit};
pub use seed::{create_call, create_incident, create_status_code, create_unit, list_status_codes};
pub use status_machine::set_unit_status;
pub use views::{
    CallView, DutyLogView, IncidentView, StatusView, TargetView, UnitKind, UnitSummary, UnitView,
};
