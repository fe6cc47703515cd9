// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::MergeRequest;
use crate::duty::{close_duty_log, ensure_duty_log, release_assignments};
use crate::error::CoreError;
use crate::events::{DispatchEvent, Outcome, TouchedTargets};
use crate::repository::{StoreError, UnitRepository};
use crate::views::{UnitView, combined_unit_view, unit_view};
use cad_dispatch_domain::{
    CadSettings, CombinedUnit, Discipline, PrimaryUnit, ShouldDo, StatusCode, UnitId, UnitRef,
    derive_combined_callsign, validate_merge_members, validate_same_discipline,
};
use time::OffsetDateTime;
use tracing::info;

/// Merges two or more primary units into a new combined unit.
///
/// The combined unit takes the first on-duty status in the catalog and a
/// callsign derived from the paired-unit symbol and the acting unit's
/// secondary callsign. Members lose their own status and assignments and
/// keep an open duty log for as long as they are merged.
///
/// # Errors
///
/// Returns an error if:
/// - Fewer than two distinct ids are supplied, or disciplines differ (`DomainViolation`)
/// - A unit is already merged or is itself a combined unit (`OfficerAlreadyMerged`)
/// - A unit does not exist (`UnitNotFound`)
/// - A unit is suspended (`UnitSuspended`)
/// - The acting unit is missing or off duty (`NoActiveUnit`)
/// - No status code has the `SET_ON_DUTY` effect (`StatusNotFound`)
pub fn merge_units<R: UnitRepository + ?Sized>(
    repo: &mut R,
    settings: &CadSettings,
    request: &MergeRequest,
    now: OffsetDateTime,
) -> Result<Outcome<UnitView>, CoreError> {
    validate_merge_members(&request.unit_ids)?;

    if repo.any_merge_conflict(&request.unit_ids)? {
        return Err(CoreError::OfficerAlreadyMerged);
    }

    let mut units: Vec<PrimaryUnit> = Vec::with_capacity(request.unit_ids.len());
    for unit_id in &request.unit_ids {
        let unit: PrimaryUnit = repo
            .find_unit(*unit_id)?
            .ok_or(CoreError::UnitNotFound(*unit_id))?;
        if unit.suspended {
            return Err(CoreError::UnitSuspended(unit.id));
        }
        units.push(unit);
    }

    let disciplines: Vec<(UnitId, Discipline)> =
        units.iter().map(|u| (u.id, u.discipline)).collect();
    validate_same_discipline(&disciplines)?;

    let acting: PrimaryUnit = repo
        .find_unit(request.acting_unit_id)?
        .filter(PrimaryUnit::is_on_duty)
        .ok_or_else(|| {
            CoreError::NoActiveUnit(format!(
                "unit {} is not an on-duty unit",
                request.acting_unit_id
            ))
        })?;

    let on_duty: StatusCode = repo
        .first_status_with_effect(ShouldDo::SetOnDuty)?
        .ok_or_else(|| CoreError::StatusNotFound(String::from(ShouldDo::SetOnDuty.as_str())))?;

    let combined: CombinedUnit = CombinedUnit {
        id: UnitId::new(),
        discipline: disciplines[0].1,
        callsign: derive_combined_callsign(&settings.paired_unit_symbol, &acting.callsign2),
        status_id: on_duty.id,
        members: request.unit_ids.clone(),
        last_status_change_at: Some(now),
        active_call_id: None,
        active_incident_id: None,
        created_at: now,
    };

    repo.insert_combined_unit(&combined)
        .map_err(|err| match err {
            StoreError::Conflict { .. } => CoreError::OfficerAlreadyMerged,
            other => CoreError::Store(other),
        })?;

    let mut touched: TouchedTargets = TouchedTargets::default();
    for unit in &units {
        release_assignments(repo, UnitRef::Primary(unit.id), &mut touched)?;
        repo.update_unit_status(unit.id, None, now)?;
        ensure_duty_log(repo, unit.id, now)?;
    }

    info!(
        combined_unit_id = %combined.id,
        callsign = %combined.callsign,
        members = combined.members.len(),
        acting_unit_id = %acting.id,
        "Merged units"
    );

    let view: UnitView = combined_unit_view(repo, &combined)?;
    let mut events: Vec<DispatchEvent> = vec![DispatchEvent::CombinedUnitCreated {
        unit: view.clone(),
    }];
    for unit in &units {
        events.push(DispatchEvent::UnitStatusChanged {
            unit: unit_view(repo, UnitRef::Primary(unit.id))?,
        });
    }
    touched.finish(repo, now, &mut events)?;

    Ok(Outcome::new(view, events))
}

/// Dissolves a combined unit, handing its status back to every member.
///
/// The combined unit's own assignments are removed with it. A member whose
/// owner already has another independent unit on duty stays off duty and
/// its duty log is closed, so no owner ends up with two active units.
///
/// # Errors
///
/// Returns `CoreError::UnitNotFound` if `combined_unit_id` is not a combined unit.
pub fn unmerge_unit<R: UnitRepository + ?Sized>(
    repo: &mut R,
    combined_unit_id: UnitId,
    now: OffsetDateTime,
) -> Result<Outcome<()>, CoreError> {
    let combined: CombinedUnit = repo
        .find_combined_unit(combined_unit_id)?
        .ok_or(CoreError::UnitNotFound(combined_unit_id))?;

    let mut touched: TouchedTargets = TouchedTargets::default();
    release_assignments(repo, UnitRef::Combined(combined.id), &mut touched)?;
    repo.delete_combined_unit(combined.id)?;

    for member_id in &combined.members {
        if owner_on_duty_elsewhere(repo, *member_id)? {
            repo.update_unit_status(*member_id, None, now)?;
            close_duty_log(repo, *member_id, now)?;
            info!(unit_id = %member_id, "Owner already on duty, member left off duty");
        } else {
            repo.update_unit_status(*member_id, Some(combined.status_id), now)?;
            ensure_duty_log(repo, *member_id, now)?;
        }
    }

    info!(combined_unit_id = %combined.id, "Unmerged combined unit");

    let mut events: Vec<DispatchEvent> = vec![DispatchEvent::CombinedUnitDissolved {
        combined_unit_id: combined.id,
        members: combined.members.clone(),
    }];
    for member_id in &combined.members {
        events.push(DispatchEvent::UnitStatusChanged {
            unit: unit_view(repo, UnitRef::Primary(*member_id))?,
        });
    }
    touched.finish(repo, now, &mut events)?;

    Ok(Outcome::new((), events))
}

/// True when the member's owner has another independent primary unit with
/// a status.
fn owner_on_duty_elsewhere<R: UnitRepository + ?Sized>(
    repo: &mut R,
    member_id: UnitId,
) -> Result<bool, CoreError> {
    let Some(member) = repo.find_unit(member_id)? else {
        return Ok(false);
    };
    for other in repo.list_user_units(&member.user_id)? {
        if other.id == member.id || other.status_id.is_none() {
            continue;
        }
        if repo.find_combined_unit_containing(other.id)?.is_none() {
            return Ok(true);
        }
    }
    Ok(false)
}
