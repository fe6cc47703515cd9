// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status changes and merges through the API.

use cad_dispatch::{DispatchEvent, UnitKind, UnitView};
use cad_dispatch_domain::CadSettings;

use super::helpers::{Fixture, at};
use crate::{
    ApiError, ApiResult, MergeUnitsRequest, SetUnitStatusRequest, get_unit, list_duty_logs,
    merge_units, set_unit_status, unmerge_unit,
};

fn merge(
    fixture: &mut Fixture,
    ids: &[&str],
    acting: &str,
) -> Result<ApiResult<UnitView>, ApiError> {
    let request: MergeUnitsRequest = MergeUnitsRequest {
        unit_ids: ids.iter().map(ToString::to_string).collect(),
        acting_unit_id: acting.to_string(),
    };
    merge_units(&mut fixture.db, &CadSettings::default(), &request, at(2))
}

#[test]
fn test_set_status_puts_unit_on_duty_and_opens_log() {
    let mut fixture: Fixture = Fixture::new();
    let id: String = fixture.unit("LEO", "A-24", "user-1");
    let on_duty: String = fixture.on_duty.clone();

    let view: UnitView = fixture.set_status(&id, &on_duty, 1);

    assert!(view.on_duty);
    assert_eq!(view.status.map(|s| s.value), Some(String::from("10-8")));
    let logs = list_duty_logs(&mut fixture.db, &id).unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].ended_at.is_none());
}

#[test]
fn test_set_status_emits_unit_status_changed() {
    let mut fixture: Fixture = Fixture::new();
    let id: String = fixture.unit("LEO", "A-24", "user-1");
    let request: SetUnitStatusRequest = SetUnitStatusRequest {
        status_id: fixture.on_duty.clone(),
        is_dispatch: false,
        requested_by: String::from("tester"),
    };

    let result = set_unit_status(&mut fixture.db, &id, request, at(1)).unwrap();

    assert!(
        result
            .events
            .iter()
            .any(|e| matches!(e, DispatchEvent::UnitStatusChanged { .. }))
    );
}

#[test]
fn test_panic_status_emits_panic_event() {
    let mut fixture: Fixture = Fixture::new();
    let id: String = fixture.on_duty_unit("A-24", "user-1");
    let request: SetUnitStatusRequest = SetUnitStatusRequest {
        status_id: fixture.panic.clone(),
        is_dispatch: true,
        requested_by: String::from("dispatcher"),
    };

    let result = set_unit_status(&mut fixture.db, &id, request, at(2)).unwrap();

    assert!(
        result
            .events
            .iter()
            .any(|e| matches!(e, DispatchEvent::PanicButton { on: true, .. }))
    );
}

#[test]
fn test_set_status_rejects_malformed_unit_id() {
    let mut fixture: Fixture = Fixture::new();
    let request: SetUnitStatusRequest = SetUnitStatusRequest {
        status_id: fixture.on_duty.clone(),
        is_dispatch: false,
        requested_by: String::from("tester"),
    };

    let err: ApiError = set_unit_status(&mut fixture.db, "not-a-uuid", request, at(1)).unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
}

#[test]
fn test_set_status_unknown_unit_is_not_found() {
    let mut fixture: Fixture = Fixture::new();
    let request: SetUnitStatusRequest = SetUnitStatusRequest {
        status_id: fixture.on_duty.clone(),
        is_dispatch: false,
        requested_by: String::from("tester"),
    };

    let err: ApiError = set_unit_status(
        &mut fixture.db,
        "00000000-0000-4000-8000-000000000000",
        request,
        at(1),
    )
    .unwrap_err();

    assert_eq!(err.code(), "UNIT_NOT_FOUND");
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_set_status_unknown_status_is_not_found() {
    let mut fixture: Fixture = Fixture::new();
    let id: String = fixture.unit("LEO", "A-24", "user-1");
    let request: SetUnitStatusRequest = SetUnitStatusRequest {
        status_id: String::from("00000000-0000-4000-8000-000000000000"),
        is_dispatch: false,
        requested_by: String::from("tester"),
    };

    let err: ApiError = set_unit_status(&mut fixture.db, &id, request, at(1)).unwrap_err();

    assert_eq!(err.code(), "STATUS_NOT_FOUND");
}

#[test]
fn test_going_off_duty_closes_duty_log() {
    let mut fixture: Fixture = Fixture::new();
    let id: String = fixture.on_duty_unit("A-24", "user-1");
    let off_duty: String = fixture.off_duty.clone();

    let view: UnitView = fixture.set_status(&id, &off_duty, 5);

    assert!(!view.on_duty);
    let logs = list_duty_logs(&mut fixture.db, &id).unwrap();
    assert!(logs.iter().all(|l| l.ended_at.is_some()));
}

#[test]
fn test_merge_creates_combined_unit() {
    let mut fixture: Fixture = Fixture::new();
    let a: String = fixture.on_duty_unit("A-24", "user-1");
    let b: String = fixture.on_duty_unit("B-31", "user-2");

    let result = merge(&mut fixture, &[&a, &b], &a).unwrap();

    assert_eq!(result.response.kind, UnitKind::Combined);
    assert_eq!(result.response.callsign, "1A24");
    assert_eq!(result.response.members.len(), 2);
    assert!(matches!(
        result.events.first(),
        Some(DispatchEvent::CombinedUnitCreated { .. })
    ));

    let member: UnitView = get_unit(&mut fixture.db, &a).unwrap();
    assert_eq!(member.combined_unit_id, Some(result.response.id));
}

#[test]
fn test_merge_twice_is_conflict() {
    let mut fixture: Fixture = Fixture::new();
    let a: String = fixture.on_duty_unit("A-24", "user-1");
    let b: String = fixture.on_duty_unit("B-31", "user-2");
    merge(&mut fixture, &[&a, &b], &a).unwrap();

    let err: ApiError = merge(&mut fixture, &[&a, &b], &b).unwrap_err();

    assert_eq!(err.code(), "OFFICER_ALREADY_MERGED");
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_merge_needs_two_units() {
    let mut fixture: Fixture = Fixture::new();
    let a: String = fixture.on_duty_unit("A-24", "user-1");

    let err: ApiError = merge(&mut fixture, &[&a], &a).unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
}

#[test]
fn test_merge_rejects_mixed_disciplines() {
    let mut fixture: Fixture = Fixture::new();
    let a: String = fixture.on_duty_unit("A-24", "user-1");
    let medic: String = fixture.unit("EMS_FD", "M-12", "user-2");

    let err: ApiError = merge(&mut fixture, &[&a, &medic], &a).unwrap_err();

    assert_eq!(err.code(), "DISCIPLINE_MISMATCH");
}

#[test]
fn test_merge_requires_on_duty_acting_unit() {
    let mut fixture: Fixture = Fixture::new();
    let a: String = fixture.unit("LEO", "A-24", "user-1");
    let b: String = fixture.unit("LEO", "B-31", "user-2");

    let err: ApiError = merge(&mut fixture, &[&a, &b], &a).unwrap_err();

    assert_eq!(err.code(), "NO_ACTIVE_UNIT");
}

#[test]
fn test_member_cannot_change_own_status() {
    let mut fixture: Fixture = Fixture::new();
    let a: String = fixture.on_duty_unit("A-24", "user-1");
    let b: String = fixture.on_duty_unit("B-31", "user-2");
    merge(&mut fixture, &[&a, &b], &a).unwrap();
    let request: SetUnitStatusRequest = SetUnitStatusRequest {
        status_id: fixture.panic.clone(),
        is_dispatch: false,
        requested_by: String::from("user-1"),
    };

    let err: ApiError = set_unit_status(&mut fixture.db, &a, request, at(3)).unwrap_err();

    assert_eq!(err.code(), "UNIT_IS_COMBINED");
    assert!(matches!(err, ApiError::Forbidden { .. }));
}

#[test]
fn test_unmerge_returns_members_on_duty() {
    let mut fixture: Fixture = Fixture::new();
    let a: String = fixture.on_duty_unit("A-24", "user-1");
    let b: String = fixture.on_duty_unit("B-31", "user-2");
    let combined: String = merge(&mut fixture, &[&a, &b], &a)
        .unwrap()
        .response
        .id
        .to_string();

    let result = unmerge_unit(&mut fixture.db, &combined, at(4)).unwrap();

    assert!(matches!(
        result.events.first(),
        Some(DispatchEvent::CombinedUnitDissolved { .. })
    ));
    let member: UnitView = get_unit(&mut fixture.db, &b).unwrap();
    assert_eq!(member.combined_unit_id, None);
    assert!(member.on_duty);
    assert_eq!(
        get_unit(&mut fixture.db, &combined).unwrap_err().code(),
        "UNIT_NOT_FOUND"
    );
}

#[test]
fn test_unmerge_primary_unit_is_not_found() {
    let mut fixture: Fixture = Fixture::new();
    let a: String = fixture.on_duty_unit("A-24", "user-1");

    let err: ApiError = unmerge_unit(&mut fixture.db, &a, at(2)).unwrap_err();

    assert_eq!(err.code(), "UNIT_NOT_FOUND");
}
