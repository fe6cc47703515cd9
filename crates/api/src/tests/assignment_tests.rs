// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attaching units to calls and incidents through the API.

use cad_dispatch::{DispatchEvent, TargetView, UnitView};
use cad_dispatch_domain::{CadSettings, TargetKind};

use super::helpers::{Fixture, at};
use crate::{ApiError, ApiResult, AssignmentRequest, change_assignment, end_target, get_unit};

fn attach(
    fixture: &mut Fixture,
    kind: TargetKind,
    target_id: &str,
    unit_id: &str,
    force: bool,
) -> Result<ApiResult<TargetView>, ApiError> {
    let request: AssignmentRequest = AssignmentRequest {
        unit_id: unit_id.to_string(),
        force,
    };
    change_assignment(
        &mut fixture.db,
        &CadSettings::default(),
        kind,
        target_id,
        &request,
        true,
        at(3),
    )
}

fn detach(
    fixture: &mut Fixture,
    kind: TargetKind,
    target_id: &str,
    unit_id: &str,
) -> Result<ApiResult<TargetView>, ApiError> {
    let request: AssignmentRequest = AssignmentRequest {
        unit_id: unit_id.to_string(),
        force: false,
    };
    change_assignment(
        &mut fixture.db,
        &CadSettings::default(),
        kind,
        target_id,
        &request,
        false,
        at(4),
    )
}

#[test]
fn test_assign_to_call_sets_active_call() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.on_duty_unit("A-24", "user-1");
    let call_id: String = fixture.call("Main St").id.to_string();

    let result = attach(&mut fixture, TargetKind::Call, &call_id, &unit, false).unwrap();

    let TargetView::Call(call) = result.response else {
        panic!("expected a call view");
    };
    assert_eq!(call.units.len(), 1);
    assert!(
        result
            .events
            .iter()
            .any(|e| matches!(e, DispatchEvent::CallUpdated { .. }))
    );
    let view: UnitView = get_unit(&mut fixture.db, &unit).unwrap();
    assert_eq!(view.active_call_id.map(|id| id.to_string()), Some(call_id));
}

#[test]
fn test_assign_to_incident_sets_active_incident() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.on_duty_unit("A-24", "user-1");
    let incident_id: String = fixture.incident("Structure fire").id.to_string();

    let result = attach(
        &mut fixture,
        TargetKind::Incident,
        &incident_id,
        &unit,
        false,
    )
    .unwrap();

    assert!(matches!(result.response, TargetView::Incident(_)));
    let view: UnitView = get_unit(&mut fixture.db, &unit).unwrap();
    assert_eq!(
        view.active_incident_id.map(|id| id.to_string()),
        Some(incident_id)
    );
}

#[test]
fn test_assign_twice_is_conflict() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.on_duty_unit("A-24", "user-1");
    let call_id: String = fixture.call("Main St").id.to_string();
    attach(&mut fixture, TargetKind::Call, &call_id, &unit, false).unwrap();

    let err: ApiError = attach(&mut fixture, TargetKind::Call, &call_id, &unit, false).unwrap_err();

    assert_eq!(err.code(), "ALREADY_ASSIGNED");
}

#[test]
fn test_assign_off_duty_unit_is_refused() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.unit("LEO", "A-24", "user-1");
    let call_id: String = fixture.call("Main St").id.to_string();

    let err: ApiError = attach(&mut fixture, TargetKind::Call, &call_id, &unit, false).unwrap_err();

    assert_eq!(err.code(), "UNIT_OFF_DUTY");
}

#[test]
fn test_assign_over_cap_needs_force() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.on_duty_unit("A-24", "user-1");
    let first: String = fixture.call("Main St").id.to_string();
    let second: String = fixture.call("Oak Ave").id.to_string();
    attach(&mut fixture, TargetKind::Call, &first, &unit, false).unwrap();

    let err: ApiError = attach(&mut fixture, TargetKind::Call, &second, &unit, false).unwrap_err();
    assert_eq!(err.code(), "TOO_MANY_ASSIGNMENTS");

    attach(&mut fixture, TargetKind::Call, &second, &unit, true).unwrap();
    let view: UnitView = get_unit(&mut fixture.db, &unit).unwrap();
    assert_eq!(view.active_call_id.map(|id| id.to_string()), Some(second));
}

#[test]
fn test_assign_to_missing_call_is_not_found() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.on_duty_unit("A-24", "user-1");

    let err: ApiError = attach(
        &mut fixture,
        TargetKind::Call,
        "00000000-0000-4000-8000-000000000000",
        &unit,
        false,
    )
    .unwrap_err();

    assert_eq!(err.code(), "TARGET_NOT_FOUND");
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_unassign_clears_active_call() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.on_duty_unit("A-24", "user-1");
    let call_id: String = fixture.call("Main St").id.to_string();
    attach(&mut fixture, TargetKind::Call, &call_id, &unit, false).unwrap();

    let result = detach(&mut fixture, TargetKind::Call, &call_id, &unit).unwrap();

    let TargetView::Call(call) = result.response else {
        panic!("expected a call view");
    };
    assert!(call.units.is_empty());
    assert_eq!(
        get_unit(&mut fixture.db, &unit).unwrap().active_call_id,
        None
    );
}

#[test]
fn test_unassign_unattached_unit_is_conflict() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.on_duty_unit("A-24", "user-1");
    let call_id: String = fixture.call("Main St").id.to_string();

    let err: ApiError = detach(&mut fixture, TargetKind::Call, &call_id, &unit).unwrap_err();

    assert_eq!(err.code(), "NOT_ASSIGNED");
}

#[test]
fn test_end_call_detaches_units() {
    let mut fixture: Fixture = Fixture::new();
    let unit: String = fixture.on_duty_unit("A-24", "user-1");
    let call_id: String = fixture.call("Main St").id.to_string();
    attach(&mut fixture, TargetKind::Call, &call_id, &unit, false).unwrap();

    let result = end_target(&mut fixture.db, TargetKind::Call, &call_id, at(5)).unwrap();

    let TargetView::Call(call) = result.response else {
        panic!("expected a call view");
    };
    assert!(call.ended);
    assert!(call.units.is_empty());
    assert_eq!(
        get_unit(&mut fixture.db, &unit).unwrap().active_call_id,
        None
    );
}

#[test]
fn test_end_incident_marks_inactive() {
    let mut fixture: Fixture = Fixture::new();
    let incident_id: String = fixture.incident("Structure fire").id.to_string();

    let result = end_target(&mut fixture.db, TargetKind::Incident, &incident_id, at(5)).unwrap();

    let TargetView::Incident(incident) = result.response else {
        panic!("expected an incident view");
    };
    assert!(!incident.is_active);
}

#[test]
fn test_malformed_target_id_is_invalid_input() {
    let mut fixture: Fixture = Fixture::new();

    let err: ApiError = end_target(&mut fixture.db, TargetKind::Call, "nope", at(5)).unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
}
