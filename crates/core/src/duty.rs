// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duty-log and assignment bookkeeping shared by the status machine, the
//! merger and the assignment coordinator.

use crate::error::CoreError;
use crate::events::TouchedTargets;
use crate::repository::UnitRepository;
use cad_dispatch_domain::{
    Assignment, AssignmentTarget, CallId, DutyLog, IncidentId, TargetKind, UnitId, UnitRef,
};
use time::OffsetDateTime;
use tracing::debug;

/// Opens a duty log for a primary unit unless one is already open.
pub(crate) fn ensure_duty_log<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit_id: UnitId,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    if repo.find_open_duty_log(unit_id)?.is_none() {
        repo.insert_duty_log(&DutyLog::open(unit_id, now))?;
        debug!(unit_id = %unit_id, "Opened duty log");
    }
    Ok(())
}

/// Closes a primary unit's open duty log, if any.
pub(crate) fn close_duty_log<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit_id: UnitId,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    if let Some(log) = repo.find_open_duty_log(unit_id)? {
        repo.close_duty_log(log.id, now)?;
        debug!(unit_id = %unit_id, duty_log_id = %log.id, "Closed duty log");
    }
    Ok(())
}

/// Removes every call and incident join row of a unit and clears both of its
/// active pointers.
pub(crate) fn release_assignments<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: UnitRef,
    touched: &mut TouchedTargets,
) -> Result<(), CoreError> {
    for kind in [TargetKind::Call, TargetKind::Incident] {
        for assignment in repo.list_unit_assignments(unit, kind)? {
            repo.delete_assignment(&assignment)?;
            touched.insert(assignment.target);
        }
    }
    repo.set_active_call(unit, None)?;
    repo.set_active_incident(unit, None)?;
    Ok(())
}

/// Releases a primary unit from duty: status cleared, log closed,
/// assignments removed.
pub(crate) fn take_off_duty<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit_id: UnitId,
    now: OffsetDateTime,
    touched: &mut TouchedTargets,
) -> Result<(), CoreError> {
    release_assignments(repo, UnitRef::Primary(unit_id), touched)?;
    repo.update_unit_status(unit_id, None, now)?;
    close_duty_log(repo, unit_id, now)
}

fn current_pointer<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: UnitRef,
    kind: TargetKind,
) -> Result<Option<AssignmentTarget>, CoreError> {
    let (call, incident): (Option<CallId>, Option<IncidentId>) = match unit {
        UnitRef::Primary(id) => match repo.find_unit(id)? {
            Some(u) => (u.active_call_id, u.active_incident_id),
            None => return Ok(None),
        },
        UnitRef::Combined(id) => match repo.find_combined_unit(id)? {
            Some(u) => (u.active_call_id, u.active_incident_id),
            None => return Ok(None),
        },
    };
    Ok(match kind {
        TargetKind::Call => call.map(AssignmentTarget::Call),
        TargetKind::Incident => incident.map(AssignmentTarget::Incident),
    })
}

/// Points a unit at `target`.
pub(crate) fn set_pointer<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: UnitRef,
    target: AssignmentTarget,
) -> Result<(), CoreError> {
    match target {
        AssignmentTarget::Call(id) => repo.set_active_call(unit, Some(id))?,
        AssignmentTarget::Incident(id) => repo.set_active_incident(unit, Some(id))?,
    }
    Ok(())
}

/// After `removed` was detached from `unit`, moves the unit's pointer to its
/// most recent remaining assignment of that kind, or clears it.
pub(crate) fn repoint_after_removal<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: UnitRef,
    removed: AssignmentTarget,
) -> Result<(), CoreError> {
    let kind: TargetKind = removed.kind();
    if current_pointer(repo, unit, kind)? != Some(removed) {
        return Ok(());
    }

    let remaining: Vec<Assignment> = repo.list_unit_assignments(unit, kind)?;
    match (kind, remaining.last().map(|a| a.target)) {
        (_, Some(next)) => set_pointer(repo, unit, next)?,
        (TargetKind::Call, None) => repo.set_active_call(unit, None)?,
        (TargetKind::Incident, None) => repo.set_active_incident(unit, None)?,
    }
    Ok(())
}
