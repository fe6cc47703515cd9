// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport-agnostic API for the CAD coordination engine.
//!
//! Handlers accept string identifiers and request DTOs, run one engine
//! operation per persistence transaction, and return a response together
//! with the [`cad_dispatch::DispatchEvent`]s the caller must publish after
//! commit. Every failure is an [`ApiError`] carrying a stable code.

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

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    ApiResult, change_assignment, create_call, create_incident, create_status_code, create_unit,
    end_target, get_unit, list_calls, list_duty_logs, list_incidents, list_status_codes,
    list_units, merge_units, set_unit_status, unmerge_unit,
};
pub use request_response::{
    AssignmentRequest, CreateCallRequest, CreateIncidentRequest, CreateStatusCodeRequest,
    CreateUnitRequest, ErrorResponse, ListQuery, MergeUnitsRequest, SetUnitStatusRequest,
};
