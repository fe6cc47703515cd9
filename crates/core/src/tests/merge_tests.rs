// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{Fixture, at};
use crate::{CoreError, DispatchEvent, UnitKind, UnitView, get_unit, unmerge_unit};
use cad_dispatch_domain::{AssignmentTarget, CallId, Discipline, DomainError, UnitId};

#[test]
fn test_merge_creates_combined_unit() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");
    let b: UnitId = fx.add_on_duty_unit("B-31", "user-2");

    let outcome = fx.merge(&[a, b], a).unwrap();
    let view = outcome.value;

    assert_eq!(view.kind, UnitKind::Combined);
    assert_eq!(view.callsign, "1A24");
    assert_eq!(view.status.unwrap().id, fx.on_duty);
    assert_eq!(view.members.len(), 2);
    for member in [a, b] {
        assert!(fx.repo.units[&member].status_id.is_none());
        assert_eq!(fx.open_logs(member), 1);
        assert_eq!(
            get_unit(&mut fx.repo, member).unwrap().combined_unit_id,
            Some(view.id)
        );
    }
    assert!(matches!(
        outcome.events.first(),
        Some(DispatchEvent::CombinedUnitCreated { .. })
    ));
}

#[test]
fn test_merge_uses_configured_symbol() {
    let mut fx: Fixture = Fixture::new();
    fx.settings.paired_unit_symbol = String::from("2B");
    let a: UnitId = fx.add_on_duty_unit("A-7", "user-1");
    let b: UnitId = fx.add_on_duty_unit("B-9", "user-2");

    let view = fx.merge(&[a, b], b).unwrap().value;
    assert_eq!(view.callsign, "2B9");
}

#[test]
fn test_merge_moves_member_assignments_away() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");
    let b: UnitId = fx.add_on_duty_unit("B-31", "user-2");
    let call: CallId = fx.add_call();
    fx.assign(AssignmentTarget::Call(call), a, false).unwrap();

    let outcome = fx.merge(&[a, b], a).unwrap();

    assert!(fx.repo.assignments.is_empty());
    assert!(fx.repo.units[&a].active_call_id.is_none());
    assert!(
        outcome
            .events
            .iter()
            .any(|e| matches!(e, DispatchEvent::CallUpdated { call: c } if c.id == call))
    );
}

#[test]
fn test_merge_of_already_merged_unit_fails() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");
    let b: UnitId = fx.add_on_duty_unit("B-31", "user-2");
    let c: UnitId = fx.add_on_duty_unit("C-40", "user-3");
    fx.merge(&[a, b], a).unwrap();

    let result = fx.merge(&[a, c], c);
    assert_eq!(result.unwrap_err(), CoreError::OfficerAlreadyMerged);
    assert_eq!(fx.repo.combined.len(), 1);
}

#[test]
fn test_merge_including_combined_unit_fails() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");
    let b: UnitId = fx.add_on_duty_unit("B-31", "user-2");
    let c: UnitId = fx.add_on_duty_unit("C-40", "user-3");
    let combined: UnitId = fx.merge(&[a, b], a).unwrap().value.id;

    let result = fx.merge(&[combined, c], c);
    assert_eq!(result.unwrap_err(), CoreError::OfficerAlreadyMerged);
}

#[test]
fn test_merge_requires_two_distinct_units() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");

    assert_eq!(
        fx.merge(&[a], a).unwrap_err(),
        CoreError::DomainViolation(DomainError::NotEnoughUnitsToMerge { count: 1 })
    );
    assert_eq!(
        fx.merge(&[a, a], a).unwrap_err(),
        CoreError::DomainViolation(DomainError::DuplicateMergeMember { unit_id: a })
    );
}

#[test]
fn test_merge_rejects_mixed_disciplines() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");
    let medic: UnitId = fx.add_unit_with(Discipline::EmsFd, "M-5", "user-2");

    let err: CoreError = fx.merge(&[a, medic], a).unwrap_err();
    assert_eq!(err.code(), "DISCIPLINE_MISMATCH");
    assert!(fx.repo.combined.is_empty());
}

#[test]
fn test_merge_requires_on_duty_acting_unit() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_unit("A-24", "user-1");
    let b: UnitId = fx.add_unit("B-31", "user-2");

    let result = fx.merge(&[a, b], a);
    assert!(matches!(result, Err(CoreError::NoActiveUnit(_))));
}

#[test]
fn test_merge_of_unknown_unit_fails() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");
    let missing: UnitId = UnitId::new();

    assert_eq!(
        fx.merge(&[a, missing], a).unwrap_err(),
        CoreError::UnitNotFound(missing)
    );
}

#[test]
fn test_unmerge_restores_members() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");
    let b: UnitId = fx.add_on_duty_unit("B-31", "user-2");
    let combined: UnitId = fx.merge(&[a, b], a).unwrap().value.id;
    fx.dispatch_status(combined, fx.en_route).unwrap();

    let outcome = unmerge_unit(&mut fx.repo, combined, at(10)).unwrap();

    assert!(fx.repo.combined.is_empty());
    for member in [a, b] {
        assert_eq!(fx.repo.units[&member].status_id, Some(fx.en_route));
        assert_eq!(fx.open_logs(member), 1);
        let view: UnitView = get_unit(&mut fx.repo, member).unwrap();
        assert!(view.combined_unit_id.is_none());
    }
    assert!(matches!(
        outcome.events.first(),
        Some(DispatchEvent::CombinedUnitDissolved { .. })
    ));
}

#[test]
fn test_unmerge_keeps_one_active_unit_per_owner() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-a");
    let b: UnitId = fx.add_on_duty_unit("B-31", "user-b");
    let combined: UnitId = fx.merge(&[a, b], a).unwrap().value.id;
    let spare: UnitId = fx.add_on_duty_unit("A-25", "user-a");

    unmerge_unit(&mut fx.repo, combined, at(10)).unwrap();

    let active: Vec<UnitId> = fx
        .repo
        .units
        .values()
        .filter(|u| u.user_id == "user-a" && u.status_id.is_some())
        .map(|u| u.id)
        .collect();
    assert_eq!(active, vec![spare]);
    assert_eq!(fx.open_logs(a), 0);
    assert_eq!(fx.repo.units[&b].status_id, Some(fx.on_duty));
    assert_eq!(fx.open_logs(b), 1);
}

#[test]
fn test_unmerge_of_same_owner_members_restores_only_one() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_unit("A-24", "user-a");
    let b: UnitId = fx.add_unit("A-25", "user-a");
    let acting: UnitId = fx.add_on_duty_unit("B-31", "user-b");
    fx.dispatch_status(a, fx.on_duty).unwrap();
    let combined: UnitId = fx.merge(&[a, b, acting], a).unwrap().value.id;

    unmerge_unit(&mut fx.repo, combined, at(10)).unwrap();

    assert_eq!(fx.repo.units[&a].status_id, Some(fx.on_duty));
    assert!(fx.repo.units[&b].status_id.is_none());
    assert_eq!(fx.open_logs(b), 0);
    assert_eq!(fx.repo.units[&acting].status_id, Some(fx.on_duty));
}

#[test]
fn test_merge_unmerge_round_trip_leaves_no_combined_unit() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");
    let b: UnitId = fx.add_on_duty_unit("B-31", "user-2");
    let call: CallId = fx.add_call();

    let combined: UnitId = fx.merge(&[a, b], a).unwrap().value.id;
    fx.assign(AssignmentTarget::Call(call), combined, false)
        .unwrap();
    unmerge_unit(&mut fx.repo, combined, at(10)).unwrap();

    assert!(fx.repo.combined.is_empty());
    assert!(fx.repo.assignments.is_empty());
    assert_eq!(
        get_unit(&mut fx.repo, combined).unwrap_err(),
        CoreError::UnitNotFound(combined)
    );

    // Members can merge again afterwards.
    assert!(fx.merge(&[a, b], b).is_ok());
}

#[test]
fn test_unmerge_of_primary_unit_fails() {
    let mut fx: Fixture = Fixture::new();
    let a: UnitId = fx.add_on_duty_unit("A-24", "user-1");

    assert_eq!(
        unmerge_unit(&mut fx.repo, a, at(10)).unwrap_err(),
        CoreError::UnitNotFound(a)
    );
}
