// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::repository::StoreError;
use cad_dispatch_domain::{AssignmentTarget, DomainError, TargetKind, UnitId};

/// Errors that can occur during coordination operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No primary or combined unit has this id.
    #[error("Unit {0} not found")]
    UnitNotFound(UnitId),
    /// The unit is suspended and cannot change state.
    #[error("Unit {0} is suspended")]
    UnitSuspended(UnitId),
    /// The unit is a member of a combined unit and cannot act on its own.
    #[error("Unit {unit_id} is part of combined unit {combined_unit_id}")]
    UnitIsCombined {
        /// The member unit.
        unit_id: UnitId,
        /// The combined unit carrying its status.
        combined_unit_id: UnitId,
    },
    /// A status code could not be resolved.
    #[error("Status not found: {0}")]
    StatusNotFound(String),
    /// A unit in a merge request already belongs to a combined unit.
    #[error("One or more units are already part of a combined unit")]
    OfficerAlreadyMerged,
    /// The call or incident does not exist, or is closed.
    #[error("{0} not found")]
    TargetNotFound(AssignmentTarget),
    /// The unit is already attached to the target.
    #[error("Unit {unit_id} is already assigned to {target}")]
    AlreadyAssigned {
        /// The unit.
        unit_id: UnitId,
        /// The target.
        target: AssignmentTarget,
    },
    /// The unit is not attached to the target.
    #[error("Unit {unit_id} is not assigned to {target}")]
    NotAssigned {
        /// The unit.
        unit_id: UnitId,
        /// The target.
        target: AssignmentTarget,
    },
    /// The unit has reached its assignment cap for this kind of target.
    #[error("Unit {unit_id} may be assigned to at most {limit} {kind}(s)")]
    TooManyAssignments {
        /// The unit.
        unit_id: UnitId,
        /// The kind of target.
        kind: TargetKind,
        /// The configured cap.
        limit: u32,
    },
    /// The acting unit is missing or off duty.
    #[error("No active unit: {0}")]
    NoActiveUnit(String),
    /// Off-duty units cannot be assigned.
    #[error("Unit {0} is off duty")]
    UnitOffDuty(UnitId),
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(DomainError),
    /// The record store failed.
    #[error(transparent)]
    Store(StoreError),
}

impl CoreError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "UNIT_NOT_FOUND",
            Self::UnitSuspended(_) => "UNIT_SUSPENDED",
            Self::UnitIsCombined { .. } => "UNIT_IS_COMBINED",
            Self::StatusNotFound(_) => "STATUS_NOT_FOUND",
            Self::OfficerAlreadyMerged => "OFFICER_ALREADY_MERGED",
            Self::TargetNotFound(_) => "TARGET_NOT_FOUND",
            Self::AlreadyAssigned { .. } => "ALREADY_ASSIGNED",
            Self::NotAssigned { .. } => "NOT_ASSIGNED",
            Self::TooManyAssignments { .. } => "TOO_MANY_ASSIGNMENTS",
            Self::NoActiveUnit(_) => "NO_ACTIVE_UNIT",
            Self::UnitOffDuty(_) => "UNIT_OFF_DUTY",
            Self::DomainViolation(DomainError::DisciplineMismatch { .. }) => "DISCIPLINE_MISMATCH",
            Self::DomainViolation(_) => "INVALID_INPUT",
            Self::Store(StoreError::Conflict { .. }) => "CONFLICT",
            Self::Store(_) => "INTERNAL",
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
