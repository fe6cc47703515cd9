// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Identifiers arrive as strings and are parsed by the handlers so that a
//! malformed id is reported as `INVALID_INPUT` rather than a decode failure.

use serde::{Deserialize, Serialize};

/// API request to change a unit's status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetUnitStatusRequest {
    /// The status code to apply.
    pub status_id: String,
    /// True when a dispatcher, rather than the unit's owner, makes the change.
    #[serde(default)]
    pub is_dispatch: bool,
    /// Who asked for the change. Logged only.
    pub requested_by: String,
}

/// API request to merge primary units into a combined unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MergeUnitsRequest {
    /// The units to merge, in the order they appear on the combined unit.
    pub unit_ids: Vec<String>,
    /// The on-duty unit performing the merge. Its secondary callsign names
    /// the combined unit.
    pub acting_unit_id: String,
}

/// API request to attach a unit to, or detach it from, a call or incident.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignmentRequest {
    pub unit_id: String,
    /// Evict the unit's oldest assignments when it is at its cap.
    #[serde(default)]
    pub force: bool,
}

/// Query parameters shared by the call, incident and unit listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    /// `active` (default), `inactive` or `all`.
    pub active_type: Option<String>,
    pub skip: Option<u32>,
    /// Page size, at most 100.
    pub take: Option<u32>,
}

/// API request to add a status code to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateStatusCodeRequest {
    /// The label shown to dispatchers.
    pub value: String,
    /// The behavioral effect, e.g. `SET_ON_DUTY`.
    pub should_do: String,
    /// Optional `#rrggbb` color.
    pub color: Option<String>,
    #[serde(default)]
    pub position: i32,
}

/// API request to register a primary unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUnitRequest {
    /// `LEO` or `EMS_FD`.
    pub discipline: String,
    pub callsign: String,
    pub callsign2: String,
    /// The owning user.
    pub user_id: String,
}

/// API request to open a call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCallRequest {
    pub location: String,
    pub description: Option<String>,
}

/// API request to open an incident.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateIncidentRequest {
    pub description: String,
}

/// Error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always true.
    pub error: bool,
    /// The stable machine-readable code.
    pub code: String,
    /// A human-readable description.
    pub message: String,
}
