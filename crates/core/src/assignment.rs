// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{AssignmentChange, AssignmentMode};
use crate::duty::{repoint_after_removal, set_pointer};
use crate::error::CoreError;
use crate::events::{DispatchEvent, Outcome, TouchedTargets};
use crate::repository::{StoreError, UnitRepository};
use crate::resolve::{ResolvedUnit, resolve_unit};
use crate::views::{TargetView, target_view, unit_view};
use cad_dispatch_domain::{
    Assignment, AssignmentId, AssignmentTarget, CadSettings, CallId, IncidentId, TargetKind,
    UnitId, UnitRef,
};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Attaches a unit to, or detaches it from, a call or incident.
///
/// # Errors
///
/// See [`assign_unit`] and [`unassign_unit`].
pub fn change_assignment<R: UnitRepository + ?Sized>(
    repo: &mut R,
    settings: &CadSettings,
    change: &AssignmentChange,
    now: OffsetDateTime,
) -> Result<Outcome<TargetView>, CoreError> {
    match change.mode {
        AssignmentMode::Assign { force } => {
            assign_unit(repo, settings, change.target, change.unit_id, force, now)
        }
        AssignmentMode::Unassign => unassign_unit(repo, change.target, change.unit_id, now),
    }
}

/// Fails unless the target exists and is still open.
fn ensure_open_target<R: UnitRepository + ?Sized>(
    repo: &mut R,
    target: AssignmentTarget,
) -> Result<(), CoreError> {
    let open: bool = match target {
        AssignmentTarget::Call(id) => repo.find_call(id)?.is_some_and(|c| !c.ended),
        AssignmentTarget::Incident(id) => repo.find_incident(id)?.is_some_and(|i| i.is_active),
    };
    if open {
        Ok(())
    } else {
        Err(CoreError::TargetNotFound(target))
    }
}

fn ensure_target_exists<R: UnitRepository + ?Sized>(
    repo: &mut R,
    target: AssignmentTarget,
) -> Result<(), CoreError> {
    let exists: bool = match target {
        AssignmentTarget::Call(id) => repo.find_call(id)?.is_some(),
        AssignmentTarget::Incident(id) => repo.find_incident(id)?.is_some(),
    };
    if exists {
        Ok(())
    } else {
        Err(CoreError::TargetNotFound(target))
    }
}

/// Attaches a unit to an open call or incident.
///
/// When the unit is at its cap for this kind of target, `force` evicts its
/// oldest assignments until the new one fits; without `force` the request
/// fails. The unit's active pointer moves to the new target.
///
/// # Errors
///
/// Returns an error if:
/// - The unit does not exist (`UnitNotFound`)
/// - The unit is a combined-unit member (`UnitIsCombined`)
/// - The unit is suspended (`UnitSuspended`) or off duty (`UnitOffDuty`)
/// - The target does not exist or is closed (`TargetNotFound`)
/// - The unit is already attached (`AlreadyAssigned`)
/// - The cap is reached and `force` is not set (`TooManyAssignments`)
pub fn assign_unit<R: UnitRepository + ?Sized>(
    repo: &mut R,
    settings: &CadSettings,
    target: AssignmentTarget,
    unit_id: UnitId,
    force: bool,
    now: OffsetDateTime,
) -> Result<Outcome<TargetView>, CoreError> {
    let unit: UnitRef = match resolve_unit(repo, unit_id)? {
        ResolvedUnit::Member { unit, combined } => {
            return Err(CoreError::UnitIsCombined {
                unit_id: unit.id,
                combined_unit_id: combined.id,
            });
        }
        ResolvedUnit::Primary(unit) if unit.suspended => {
            return Err(CoreError::UnitSuspended(unit.id));
        }
        ResolvedUnit::Primary(unit) if !unit.is_on_duty() => {
            return Err(CoreError::UnitOffDuty(unit.id));
        }
        resolved => resolved.unit_ref(),
    };

    ensure_open_target(repo, target)?;

    if repo.find_assignment(target, unit)?.is_some() {
        return Err(CoreError::AlreadyAssigned { unit_id, target });
    }

    let kind: TargetKind = target.kind();
    let mut touched: TouchedTargets = TouchedTargets::default();

    if let Some(limit) = settings.assignment_cap(kind) {
        let existing: Vec<Assignment> = repo.list_unit_assignments(unit, kind)?;
        let cap: usize = usize::try_from(limit).unwrap_or(usize::MAX);
        if existing.len() >= cap {
            if !force {
                return Err(CoreError::TooManyAssignments {
                    unit_id,
                    kind,
                    limit,
                });
            }

            // Oldest first, so the head of the list is evicted.
            let excess: usize = existing.len() + 1 - cap;
            for evicted in existing.iter().take(excess) {
                repo.delete_assignment(evicted)?;
                touched.insert(evicted.target);
                info!(
                    unit_id = %unit_id,
                    evicted = %evicted.target,
                    "Evicted oldest assignment to make room"
                );
            }
        }
    }

    let assignment: Assignment = Assignment {
        id: AssignmentId::new(),
        target,
        unit,
        created_at: now,
    };
    repo.insert_assignment(&assignment)
        .map_err(|err| match err {
            StoreError::Conflict { .. } => CoreError::AlreadyAssigned { unit_id, target },
            other => CoreError::Store(other),
        })?;
    set_pointer(repo, unit, target)?;

    info!(unit_id = %unit_id, target = %target, force, "Assigned unit");

    touched.insert(target);
    finish(repo, unit, target, touched, now)
}

/// Detaches a unit from a call or incident.
///
/// If the unit's active pointer named the target it moves to the unit's most
/// recent remaining assignment of that kind, or is cleared.
///
/// # Errors
///
/// Returns an error if:
/// - The unit does not exist (`UnitNotFound`)
/// - The target does not exist (`TargetNotFound`)
/// - The unit is not attached to the target (`NotAssigned`)
pub fn unassign_unit<R: UnitRepository + ?Sized>(
    repo: &mut R,
    target: AssignmentTarget,
    unit_id: UnitId,
    now: OffsetDateTime,
) -> Result<Outcome<TargetView>, CoreError> {
    let unit: UnitRef = resolve_unit(repo, unit_id)?.unit_ref();
    ensure_target_exists(repo, target)?;

    let assignment: Assignment = repo
        .find_assignment(target, unit)?
        .ok_or(CoreError::NotAssigned { unit_id, target })?;

    repo.delete_assignment(&assignment)?;
    repoint_after_removal(repo, unit, target)?;

    info!(unit_id = %unit_id, target = %target, "Unassigned unit");

    let mut touched: TouchedTargets = TouchedTargets::default();
    touched.insert(target);
    finish(repo, unit, target, touched, now)
}

fn finish<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: UnitRef,
    target: AssignmentTarget,
    touched: TouchedTargets,
    now: OffsetDateTime,
) -> Result<Outcome<TargetView>, CoreError> {
    let mut events: Vec<DispatchEvent> = vec![DispatchEvent::UnitUpdated {
        unit: unit_view(repo, unit)?,
    }];
    touched.finish(repo, now, &mut events)?;
    let view: TargetView = target_view(repo, target)?;
    Ok(Outcome::new(view, events))
}

/// Ends a call, detaching every unit from it.
///
/// Ending an already-ended call succeeds without changes.
///
/// # Errors
///
/// Returns `CoreError::TargetNotFound` if the call does not exist.
pub fn end_call<R: UnitRepository + ?Sized>(
    repo: &mut R,
    call_id: CallId,
    now: OffsetDateTime,
) -> Result<Outcome<TargetView>, CoreError> {
    let target: AssignmentTarget = AssignmentTarget::Call(call_id);
    let call = repo
        .find_call(call_id)?
        .ok_or(CoreError::TargetNotFound(target))?;
    if call.ended {
        debug!(call_id = %call_id, "Call already ended");
        return Ok(Outcome::new(target_view(repo, target)?, Vec::new()));
    }

    let events: Vec<DispatchEvent> = close_target(repo, target)?;
    repo.end_call(call_id, now)?;
    info!(call_id = %call_id, case_number = call.case_number, "Ended call");
    finish_close(repo, target, events)
}

/// Marks an incident inactive, detaching every unit from it.
///
/// Ending an already-inactive incident succeeds without changes.
///
/// # Errors
///
/// Returns `CoreError::TargetNotFound` if the incident does not exist.
pub fn end_incident<R: UnitRepository + ?Sized>(
    repo: &mut R,
    incident_id: IncidentId,
    now: OffsetDateTime,
) -> Result<Outcome<TargetView>, CoreError> {
    let target: AssignmentTarget = AssignmentTarget::Incident(incident_id);
    let incident = repo
        .find_incident(incident_id)?
        .ok_or(CoreError::TargetNotFound(target))?;
    if !incident.is_active {
        debug!(incident_id = %incident_id, "Incident already inactive");
        return Ok(Outcome::new(target_view(repo, target)?, Vec::new()));
    }

    let events: Vec<DispatchEvent> = close_target(repo, target)?;
    repo.end_incident(incident_id, now)?;
    info!(
        incident_id = %incident_id,
        case_number = incident.case_number,
        "Ended incident"
    );
    finish_close(repo, target, events)
}

/// Detaches every unit from a target and returns one update event per unit.
fn close_target<R: UnitRepository + ?Sized>(
    repo: &mut R,
    target: AssignmentTarget,
) -> Result<Vec<DispatchEvent>, CoreError> {
    let mut events: Vec<DispatchEvent> = Vec::new();
    for assignment in repo.list_target_assignments(target)? {
        repo.delete_assignment(&assignment)?;
        repoint_after_removal(repo, assignment.unit, target)?;
        events.push(DispatchEvent::UnitUpdated {
            unit: unit_view(repo, assignment.unit)?,
        });
    }
    Ok(events)
}

fn finish_close<R: UnitRepository + ?Sized>(
    repo: &mut R,
    target: AssignmentTarget,
    mut events: Vec<DispatchEvent>,
) -> Result<Outcome<TargetView>, CoreError> {
    let view: TargetView = target_view(repo, target)?;
    events.push(DispatchEvent::from(view.clone()));
    Ok(Outcome::new(view, events))
}
