// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use cad_dispatch::{CoreError, StoreError};
use cad_dispatch_domain::{DomainError, TargetKind};

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant carries the stable machine-readable code clients match on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// `INVALID_INPUT` or `DISCIPLINE_MISMATCH`.
        code: &'static str,
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        code: &'static str,
        /// The type of resource that was not found.
        resource_type: String,
        message: String,
    },
    /// The request conflicts with the current coordination state.
    #[error("{message}")]
    Conflict { code: &'static str, message: String },
    /// The unit may not perform this action in its current state.
    #[error("{message}")]
    Forbidden { code: &'static str, message: String },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the stable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { code, .. }
            | Self::ResourceNotFound { code, .. }
            | Self::Conflict { code, .. }
            | Self::Forbidden { code, .. } => *code,
            Self::Internal { .. } => "INTERNAL",
        }
    }

    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: "INVALID_INPUT",
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidId { kind, .. } => {
            ApiError::invalid(&format!("{}_id", kind.replace(' ', "_")), message)
        }
        DomainError::InvalidDiscipline(_) => ApiError::invalid("discipline", message),
        DomainError::InvalidShouldDo(_) => ApiError::invalid("should_do", message),
        DomainError::InvalidActiveType(_) => ApiError::invalid("active_type", message),
        DomainError::InvalidCallsign(_) => ApiError::invalid("callsign", message),
        DomainError::InvalidField { field, .. } => ApiError::invalid(field, message),
        DomainError::NotEnoughUnitsToMerge { .. } | DomainError::DuplicateMergeMember { .. } => {
            ApiError::invalid("unit_ids", message)
        }
        DomainError::DisciplineMismatch { .. } => ApiError::InvalidInput {
            code: "DISCIPLINE_MISMATCH",
            field: String::from("unit_ids"),
            message,
        },
        DomainError::InvalidPagination(_) => ApiError::invalid("take", message),
        DomainError::InvalidTimestamp { .. } => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let code: &'static str = err.code();
    let message: String = err.to_string();
    match err {
        CoreError::UnitNotFound(_) => ApiError::ResourceNotFound {
            code,
            resource_type: String::from("Unit"),
            message,
        },
        CoreError::StatusNotFound(_) => ApiError::ResourceNotFound {
            code,
            resource_type: String::from("Status code"),
            message,
        },
        CoreError::TargetNotFound(target) => ApiError::ResourceNotFound {
            code,
            resource_type: match target.kind() {
                TargetKind::Call => String::from("Call"),
                TargetKind::Incident => String::from("Incident"),
            },
            message,
        },
        CoreError::UnitSuspended(_) | CoreError::UnitIsCombined { .. } => {
            ApiError::Forbidden { code, message }
        }
        CoreError::OfficerAlreadyMerged
        | CoreError::AlreadyAssigned { .. }
        | CoreError::NotAssigned { .. }
        | CoreError::TooManyAssignments { .. }
        | CoreError::NoActiveUnit(_)
        | CoreError::UnitOffDuty(_) => ApiError::Conflict { code, message },
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Store(StoreError::Conflict { .. }) => ApiError::Conflict { code, message },
        CoreError::Store(StoreError::NotFound { .. } | StoreError::Backend(_)) => {
            ApiError::Internal { message }
        }
    }
}
