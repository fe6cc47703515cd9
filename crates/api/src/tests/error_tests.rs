// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error translation into stable codes.

use cad_dispatch::{CoreError, StoreError};
use cad_dispatch_domain::{AssignmentTarget, CallId, Discipline, DomainError, UnitId};

use crate::{ApiError, translate_core_error, translate_domain_error};

#[test]
fn test_core_codes_survive_translation() {
    let unit_id: UnitId = UnitId::new();
    let cases: Vec<(CoreError, &str)> = vec![
        (CoreError::UnitNotFound(unit_id), "UNIT_NOT_FOUND"),
        (CoreError::UnitSuspended(unit_id), "UNIT_SUSPENDED"),
        (CoreError::OfficerAlreadyMerged, "OFFICER_ALREADY_MERGED"),
        (
            CoreError::TargetNotFound(AssignmentTarget::Call(CallId::new())),
            "TARGET_NOT_FOUND",
        ),
        (CoreError::UnitOffDuty(unit_id), "UNIT_OFF_DUTY"),
        (
            CoreError::NoActiveUnit(String::from("nobody")),
            "NO_ACTIVE_UNIT",
        ),
    ];

    for (err, code) in cases {
        assert_eq!(translate_core_error(err).code(), code);
    }
}

#[test]
fn test_store_conflict_is_conflict() {
    let err: ApiError = translate_core_error(CoreError::Store(StoreError::Conflict {
        constraint: String::from("assigned_units.call_id, assigned_units.unit_id"),
    }));

    assert!(matches!(err, ApiError::Conflict { code: "CONFLICT", .. }));
}

#[test]
fn test_backend_failure_is_internal() {
    let failure: CoreError = CoreError::Store(StoreError::Backend(String::from("disk full")));
    let err: ApiError = translate_core_error(failure);

    assert_eq!(err.code(), "INTERNAL");
}

#[test]
fn test_invalid_id_names_the_field() {
    let err: ApiError = translate_domain_error(UnitId::parse("xyz").unwrap_err());

    assert!(matches!(
        err,
        ApiError::InvalidInput { code: "INVALID_INPUT", ref field, .. } if field == "unit_id"
    ));
}

#[test]
fn test_discipline_mismatch_keeps_its_code() {
    let err: ApiError = translate_core_error(CoreError::DomainViolation(
        DomainError::DisciplineMismatch {
            unit_id: UnitId::new(),
            expected: Discipline::Leo,
            found: Discipline::EmsFd,
        },
    ));

    assert_eq!(err.code(), "DISCIPLINE_MISMATCH");
}
