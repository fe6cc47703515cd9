// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::StatusChange;
use crate::duty::{close_duty_log, ensure_duty_log, release_assignments, take_off_duty};
use crate::error::CoreError;
use crate::events::{DispatchEvent, Outcome, TouchedTargets};
use crate::repository::UnitRepository;
use crate::resolve::{ResolvedUnit, resolve_unit};
use crate::views::{UnitView, combined_unit_view, primary_unit_view, unit_view};
use cad_dispatch_domain::{CombinedUnit, PrimaryUnit, StatusCode, Unit, UnitRef};
use time::OffsetDateTime;
use tracing::info;

/// Applies a status change to one unit.
///
/// The owner's other primary units are reset to off duty first, then the
/// new status is written, duty logs opened or closed, and (on off duty)
/// every assignment of the unit removed. Setting a combined unit off duty
/// dissolves it and releases its members off duty.
///
/// A dispatcher addressing a combined-unit member changes the combined
/// unit instead, since status is carried there.
///
/// # Arguments
///
/// * `repo` - The transaction-scoped repository
/// * `change` - The requested change
/// * `now` - The time of the change
///
/// # Returns
///
/// The updated unit. When a combined unit is dissolved, the returned view
/// is the combined unit as it stood, marked off duty.
///
/// # Errors
///
/// Returns an error if:
/// - The unit does not exist (`UnitNotFound`)
/// - The unit is suspended (`UnitSuspended`)
/// - The unit is a combined member and the caller is not dispatch (`UnitIsCombined`)
/// - The status code does not exist (`StatusNotFound`)
pub fn set_unit_status<R: UnitRepository + ?Sized>(
    repo: &mut R,
    change: &StatusChange,
    now: OffsetDateTime,
) -> Result<Outcome<UnitView>, CoreError> {
    let target: Unit = match resolve_unit(repo, change.unit_id)? {
        ResolvedUnit::Primary(unit) | ResolvedUnit::Member { unit, .. } if unit.suspended => {
            return Err(CoreError::UnitSuspended(unit.id));
        }
        ResolvedUnit::Member { unit, combined } if !change.is_dispatch => {
            return Err(CoreError::UnitIsCombined {
                unit_id: unit.id,
                combined_unit_id: combined.id,
            });
        }
        ResolvedUnit::Primary(unit) => Unit::Primary(unit),
        ResolvedUnit::Member { combined, .. } | ResolvedUnit::Combined(combined) => {
            Unit::Combined(combined)
        }
    };

    let status: StatusCode = repo
        .find_status_code(change.status_id)?
        .ok_or_else(|| CoreError::StatusNotFound(change.status_id.to_string()))?;

    let previous_status: Option<StatusCode> = match target.status_id() {
        Some(id) => repo.find_status_code(id)?,
        None => None,
    };

    let mut events: Vec<DispatchEvent> = Vec::new();
    let mut touched: TouchedTargets = TouchedTargets::default();

    let view: UnitView = match target {
        Unit::Primary(unit) => {
            reset_other_units(repo, &unit, now, &mut touched, &mut events)?;
            apply_to_primary(repo, &unit, &status, now, &mut touched)?;
            unit_view(repo, UnitRef::Primary(unit.id))?
        }
        Unit::Combined(combined) => {
            apply_to_combined(repo, &combined, &status, now, &mut touched, &mut events)?
        }
    };

    info!(
        unit_id = %view.id,
        status_id = %status.id,
        should_do = %status.should_do,
        requested_by = %change.requested_by,
        is_dispatch = change.is_dispatch,
        "Unit status changed"
    );

    events.push(DispatchEvent::UnitStatusChanged { unit: view.clone() });

    let was_panic: bool = previous_status.is_some_and(|s| s.should_do.is_panic());
    let is_panic: bool = status.should_do.is_panic();
    if was_panic != is_panic {
        events.push(DispatchEvent::PanicButton {
            unit: view.clone(),
            on: is_panic,
        });
    }

    touched.finish(repo, now, &mut events)?;

    Ok(Outcome::new(view, events))
}

/// Resets every other on-duty primary unit of the same owner to off duty.
/// Combined units and their members are exempt.
fn reset_other_units<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: &PrimaryUnit,
    now: OffsetDateTime,
    touched: &mut TouchedTargets,
    events: &mut Vec<DispatchEvent>,
) -> Result<(), CoreError> {
    for other in repo.list_user_units(&unit.user_id)? {
        if other.id == unit.id || other.status_id.is_none() {
            continue;
        }
        if repo.find_combined_unit_containing(other.id)?.is_some() {
            continue;
        }

        take_off_duty(repo, other.id, now, touched)?;
        info!(unit_id = %other.id, user_id = %unit.user_id, "Reset unit off duty");

        let view: UnitView = unit_view(repo, UnitRef::Primary(other.id))?;
        events.push(DispatchEvent::UnitStatusChanged { unit: view });
    }
    Ok(())
}

fn apply_to_primary<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: &PrimaryUnit,
    status: &StatusCode,
    now: OffsetDateTime,
    touched: &mut TouchedTargets,
) -> Result<(), CoreError> {
    if status.is_off_duty() {
        take_off_duty(repo, unit.id, now, touched)
    } else {
        repo.update_unit_status(unit.id, Some(status.id), now)?;
        ensure_duty_log(repo, unit.id, now)
    }
}

fn apply_to_combined<R: UnitRepository + ?Sized>(
    repo: &mut R,
    combined: &CombinedUnit,
    status: &StatusCode,
    now: OffsetDateTime,
    touched: &mut TouchedTargets,
    events: &mut Vec<DispatchEvent>,
) -> Result<UnitView, CoreError> {
    if !status.is_off_duty() {
        repo.update_combined_status(combined.id, status.id, now)?;
        for member_id in &combined.members {
            ensure_duty_log(repo, *member_id, now)?;
        }
        return unit_view(repo, UnitRef::Combined(combined.id));
    }

    // Capture the view before the row disappears.
    release_assignments(repo, UnitRef::Combined(combined.id), touched)?;
    let mut view: UnitView = combined_unit_view(repo, combined)?;
    view.status = None;
    view.on_duty = false;

    repo.delete_combined_unit(combined.id)?;
    for member_id in &combined.members {
        repo.update_unit_status(*member_id, None, now)?;
        close_duty_log(repo, *member_id, now)?;
    }

    info!(
        combined_unit_id = %combined.id,
        members = combined.members.len(),
        "Dissolved combined unit on off duty"
    );

    events.push(DispatchEvent::CombinedUnitDissolved {
        combined_unit_id: combined.id,
        members: combined.members.clone(),
    });
    for member_id in &combined.members {
        if let Some(member) = repo.find_unit(*member_id)? {
            let member_view: UnitView = primary_unit_view(repo, &member)?;
            events.push(DispatchEvent::UnitStatusChanged { unit: member_view });
        }
    }

    Ok(view)
}
