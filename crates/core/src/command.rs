// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::{AssignmentTarget, StatusCodeId, UnitId};

/// A request to change a unit's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// The unit the caller addressed. May be a combined-unit member when
    /// `is_dispatch` is set.
    pub unit_id: UnitId,
    pub status_id: StatusCodeId,
    /// Who asked for the change. Recorded in logs only.
    pub requested_by: String,
    /// Set when a dispatcher, not the unit's owner, makes the change.
    pub is_dispatch: bool,
}

/// A request to merge primary units into a combined unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Two or more distinct primary units.
    pub unit_ids: Vec<UnitId>,
    /// The invoking officer's active unit. Its `callsign2` names the result.
    pub acting_unit_id: UnitId,
}

/// Attach or detach a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentMode {
    Assign {
        /// Evict the oldest assignments instead of failing at the cap.
        force: bool,
    },
    Unassign,
}

/// A request to change a unit's attachment to a call or incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentChange {
    pub target: AssignmentTarget,
    pub unit_id: UnitId,
    pub mode: AssignmentMode,
}
