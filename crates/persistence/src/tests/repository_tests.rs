// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Direct `UnitRepository` behavior against `SQLite`.

use super::{Seeded, T0, at};
use crate::SqliteRepository;
use cad_dispatch::{StoreError, UnitRepository};
use cad_dispatch_domain::{
    Assignment, AssignmentId, AssignmentTarget, Call, CombinedUnit, Discipline, DutyLog, Incident,
    PrimaryUnit, ShouldDo, StatusCode, TargetKind, UnitId, UnitRef,
};

fn combined(members: Vec<UnitId>, status: cad_dispatch_domain::StatusCodeId) -> CombinedUnit {
    CombinedUnit {
        id: UnitId::new(),
        discipline: Discipline::Leo,
        callsign: String::from("1A24"),
        status_id: status,
        members,
        last_status_change_at: Some(T0),
        active_call_id: None,
        active_incident_id: None,
        created_at: T0,
    }
}

fn assignment(target: AssignmentTarget, unit: UnitRef, minutes: i64) -> Assignment {
    Assignment {
        id: AssignmentId::new(),
        target,
        unit,
        created_at: at(minutes),
    }
}

#[test]
fn test_unit_round_trips_through_rows() {
    let mut seeded: Seeded = Seeded::new();
    let on_duty = seeded.on_duty;

    let stored: PrimaryUnit = seeded
        .db
        .transaction(|repo: &mut SqliteRepository<'_>| {
            let mut unit: PrimaryUnit = PrimaryUnit::new(Discipline::EmsFd, "M-12", "12", "user-9");
            unit.status_id = Some(on_duty);
            unit.last_status_change_at = Some(at(5));
            repo.insert_unit(&unit)?;
            let found: Option<PrimaryUnit> = repo.find_unit(unit.id)?;
            assert_eq!(found.as_ref(), Some(&unit));
            Ok::<_, StoreError>(unit)
        })
        .unwrap();

    assert_eq!(stored.discipline, Discipline::EmsFd);
}

#[test]
fn test_status_catalog_orders_by_position() {
    let mut seeded: Seeded = Seeded::new();

    let (first_on_duty, catalog) = seeded
        .db
        .transaction(|repo: &mut SqliteRepository<'_>| {
            repo.insert_status_code(&StatusCode::new("10-41", ShouldDo::SetOnDuty, None, 0))?;
            let first: Option<StatusCode> = repo.first_status_with_effect(ShouldDo::SetOnDuty)?;
            let catalog: Vec<StatusCode> = repo.list_status_codes()?;
            Ok::<_, StoreError>((first, catalog))
        })
        .unwrap();

    assert_eq!(first_on_duty.unwrap().value, "10-41");
    let positions: Vec<i32> = catalog.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
}

#[test]
fn test_member_can_belong_to_one_combined_unit() {
    let mut seeded: Seeded = Seeded::new();
    let a: UnitId = seeded.add_unit("A-24", "user-1");
    let b: UnitId = seeded.add_unit("B-31", "user-2");
    let c: UnitId = seeded.add_unit("C-40", "user-3");
    let on_duty = seeded.on_duty;

    let result = seeded.db.transaction(|repo: &mut SqliteRepository<'_>| {
        let first: CombinedUnit = combined(vec![a, b], on_duty);
        repo.insert_combined_unit(&first)?;

        assert!(repo.any_merge_conflict(&[b, c])?);
        assert!(repo.any_merge_conflict(&[first.id])?);
        assert!(!repo.any_merge_conflict(&[c])?);

        let found: CombinedUnit = repo.find_combined_unit_containing(b)?.unwrap();
        assert_eq!(found.members, vec![a, b]);

        repo.insert_combined_unit(&combined(vec![c, a], on_duty))
    });

    assert!(matches!(result, Err(StoreError::Conflict { .. })));
}

#[test]
fn test_deleting_combined_unit_cascades() {
    let mut seeded: Seeded = Seeded::new();
    let a: UnitId = seeded.add_unit("A-24", "user-1");
    let b: UnitId = seeded.add_unit("B-31", "user-2");
    let on_duty = seeded.on_duty;

    seeded
        .db
        .transaction(|repo: &mut SqliteRepository<'_>| {
            let unit: CombinedUnit = combined(vec![a, b], on_duty);
            repo.insert_combined_unit(&unit)?;
            let call: Call = repo.insert_call("Main St", None, T0)?;
            let target: AssignmentTarget = AssignmentTarget::Call(call.id);
            repo.insert_assignment(&assignment(target, UnitRef::Combined(unit.id), 1))?;

            repo.delete_combined_unit(unit.id)?;

            assert!(repo.find_combined_unit(unit.id)?.is_none());
            assert!(repo.find_combined_unit_containing(a)?.is_none());
            assert!(repo.list_target_assignments(target)?.is_empty());
            assert!(repo.list_combined_units()?.is_empty());
            Ok::<_, StoreError>(())
        })
        .unwrap();
}

#[test]
fn test_only_one_open_duty_log_per_unit() {
    let mut seeded: Seeded = Seeded::new();
    let a: UnitId = seeded.add_unit("A-24", "user-1");

    let result = seeded.db.transaction(|repo: &mut SqliteRepository<'_>| {
        let log: DutyLog = DutyLog::open(a, at(1));
        repo.insert_duty_log(&log)?;
        assert_eq!(repo.find_open_duty_log(a)?.map(|l| l.id), Some(log.id));

        repo.close_duty_log(log.id, at(10))?;
        assert!(repo.find_open_duty_log(a)?.is_none());

        repo.insert_duty_log(&DutyLog::open(a, at(20)))?;
        repo.insert_duty_log(&DutyLog::open(a, at(30)))
    });
    assert!(matches!(result, Err(StoreError::Conflict { .. })));

    let logs: Vec<DutyLog> = seeded
        .db
        .read(|repo: &mut SqliteRepository<'_>| repo.list_duty_logs(a))
        .unwrap();
    assert!(logs.is_empty(), "the failed transaction rolled back");
}

#[test]
fn test_duty_logs_list_most_recent_first() {
    let mut seeded: Seeded = Seeded::new();
    let a: UnitId = seeded.add_unit("A-24", "user-1");

    let starts = seeded
        .db
        .transaction(|repo: &mut SqliteRepository<'_>| {
            for (start, end) in [(1, 2), (10, 20), (30, 31)] {
                let log: DutyLog = DutyLog::open(a, at(start));
                repo.insert_duty_log(&log)?;
                repo.close_duty_log(log.id, at(end))?;
            }
            let logs: Vec<DutyLog> = repo.list_duty_logs(a)?;
            Ok::<_, StoreError>(logs.into_iter().map(|l| l.started_at).collect::<Vec<_>>())
        })
        .unwrap();

    assert_eq!(starts, vec![at(30), at(10), at(1)]);
}

#[test]
fn test_case_numbers_increase_per_table() {
    let mut seeded: Seeded = Seeded::new();

    let (calls, incident) = seeded
        .db
        .transaction(|repo: &mut SqliteRepository<'_>| {
            let first: Call = repo.insert_call("Main St", Some("Alarm"), T0)?;
            let second: Call = repo.insert_call("Oak Ave", None, T0)?;
            let incident: Incident = repo.insert_incident("Structure fire", T0)?;
            Ok::<_, StoreError>(((first, second), incident))
        })
        .unwrap();

    assert_eq!(calls.0.case_number, 1);
    assert_eq!(calls.1.case_number, 2);
    assert_eq!(calls.1.description, None);
    assert_eq!(incident.case_number, 1);
}

#[test]
fn test_assignments_keep_insertion_order_and_reject_duplicates() {
    let mut seeded: Seeded = Seeded::new();
    let a: UnitId = seeded.add_unit("A-24", "user-1");

    let result = seeded.db.transaction(|repo: &mut SqliteRepository<'_>| {
        let unit: UnitRef = UnitRef::Primary(a);
        let first: Call = repo.insert_call("Main St", None, T0)?;
        let second: Call = repo.insert_call("Oak Ave", None, T0)?;
        let incident: Incident = repo.insert_incident("Flood", T0)?;

        repo.insert_assignment(&assignment(AssignmentTarget::Call(second.id), unit, 1))?;
        repo.insert_assignment(&assignment(AssignmentTarget::Call(first.id), unit, 1))?;
        let incident_target: AssignmentTarget = AssignmentTarget::Incident(incident.id);
        repo.insert_assignment(&assignment(incident_target, unit, 1))?;

        let calls: Vec<Assignment> = repo.list_unit_assignments(unit, TargetKind::Call)?;
        let targets: Vec<AssignmentTarget> = calls.iter().map(|a| a.target).collect();
        assert_eq!(
            targets,
            vec![
                AssignmentTarget::Call(second.id),
                AssignmentTarget::Call(first.id)
            ]
        );
        let incidents: Vec<Assignment> = repo.list_unit_assignments(unit, TargetKind::Incident)?;
        assert_eq!(incidents.len(), 1);

        let existing: Assignment = repo
            .find_assignment(AssignmentTarget::Call(first.id), unit)?
            .unwrap();
        repo.delete_assignment(&existing)?;
        assert!(
            repo.find_assignment(AssignmentTarget::Call(first.id), unit)?
                .is_none()
        );

        repo.insert_assignment(&assignment(AssignmentTarget::Call(second.id), unit, 2))
    });

    assert!(matches!(result, Err(StoreError::Conflict { .. })));
}

#[test]
fn test_updates_on_missing_rows_report_not_found() {
    let mut seeded: Seeded = Seeded::new();
    let on_duty = seeded.on_duty;

    let result = seeded.db.transaction(|repo: &mut SqliteRepository<'_>| {
        repo.update_unit_status(UnitId::new(), Some(on_duty), T0)
    });
    assert!(matches!(
        result,
        Err(StoreError::NotFound { entity: "unit", .. })
    ));

    let result = seeded.db.transaction(|repo: &mut SqliteRepository<'_>| {
        repo.set_active_call(UnitRef::Combined(UnitId::new()), None)
    });
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}
