// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side operations. Staleness is evaluated here, at read time, and
//! never written back.

use crate::error::CoreError;
use crate::repository::UnitRepository;
use crate::resolve::{ResolvedUnit, resolve_unit};
use crate::views::{
    CallView, DutyLogView, IncidentView, UnitView, call_view, combined_unit_view, incident_view,
    primary_unit_view,
};
use cad_dispatch_domain::{
    ActiveType, CadSettings, Call, CombinedUnit, Incident, Pagination, PrimaryUnit, Unit, UnitId,
    is_stale,
};
use serde::Serialize;
use std::collections::HashSet;
use time::OffsetDateTime;
use tracing::debug;

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Matching records before pagination.
    pub total_count: usize,
    pub items: Vec<T>,
}

fn paginate<T>(items: Vec<T>, page: Pagination) -> (usize, Vec<T>) {
    let total: usize = items.len();
    let skip: usize = usize::try_from(page.skip).unwrap_or(usize::MAX);
    let take: usize = usize::try_from(page.take).unwrap_or(usize::MAX);
    (total, items.into_iter().skip(skip).take(take).collect())
}

/// Lists calls, newest case first.
///
/// A call is active when it has not ended and has been touched within the
/// configured call inactivity timeout.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_calls<R: UnitRepository + ?Sized>(
    repo: &mut R,
    settings: &CadSettings,
    active_type: ActiveType,
    page: Pagination,
    now: OffsetDateTime,
) -> Result<Page<CallView>, CoreError> {
    let timeout: Option<u32> = settings.inactivity.call_minutes;
    let mut calls: Vec<Call> = repo
        .list_calls()?
        .into_iter()
        .filter(|c| active_type.includes(!c.ended && !is_stale(c.updated_at, timeout, now)))
        .collect();
    calls.sort_by(|a, b| b.case_number.cmp(&a.case_number));

    let (total_count, calls) = paginate(calls, page);
    debug!(total_count, ?active_type, "Listed calls");

    let mut items: Vec<CallView> = Vec::with_capacity(calls.len());
    for call in &calls {
        items.push(call_view(repo, call)?);
    }
    Ok(Page { total_count, items })
}

/// Lists incidents, newest case first.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_incidents<R: UnitRepository + ?Sized>(
    repo: &mut R,
    settings: &CadSettings,
    active_type: ActiveType,
    page: Pagination,
    now: OffsetDateTime,
) -> Result<Page<IncidentView>, CoreError> {
    let timeout: Option<u32> = settings.inactivity.incident_minutes;
    let mut incidents: Vec<Incident> = repo
        .list_incidents()?
        .into_iter()
        .filter(|i| active_type.includes(i.is_active && !is_stale(i.updated_at, timeout, now)))
        .collect();
    incidents.sort_by(|a, b| b.case_number.cmp(&a.case_number));

    let (total_count, incidents) = paginate(incidents, page);
    debug!(total_count, ?active_type, "Listed incidents");

    let mut items: Vec<IncidentView> = Vec::with_capacity(incidents.len());
    for incident in &incidents {
        items.push(incident_view(repo, incident)?);
    }
    Ok(Page { total_count, items })
}

/// Lists independent primary units and combined units, by callsign.
///
/// Combined-unit members are listed only inside their combined unit. A unit
/// is active when it is on duty and its last status change falls within the
/// unit inactivity timeout; units that never changed status are never stale.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_units<R: UnitRepository + ?Sized>(
    repo: &mut R,
    settings: &CadSettings,
    active_type: ActiveType,
    page: Pagination,
    now: OffsetDateTime,
) -> Result<Page<UnitView>, CoreError> {
    let timeout: Option<u32> = settings.inactivity.unit_minutes;
    let combined: Vec<CombinedUnit> = repo.list_combined_units()?;
    let merged: HashSet<UnitId> = combined
        .iter()
        .flat_map(|c| c.members.iter().copied())
        .collect();

    let mut units: Vec<Unit> = repo
        .list_units()?
        .into_iter()
        .filter(|u: &PrimaryUnit| !merged.contains(&u.id))
        .map(Unit::Primary)
        .chain(combined.into_iter().map(Unit::Combined))
        .filter(|u| {
            let fresh: bool = u
                .last_status_change_at()
                .is_none_or(|at| !is_stale(at, timeout, now));
            active_type.includes(u.status_id().is_some() && fresh)
        })
        .collect();
    units.sort_by(|a, b| a.callsign().cmp(b.callsign()));

    let (total_count, units) = paginate(units, page);
    debug!(total_count, ?active_type, "Listed units");

    let mut items: Vec<UnitView> = Vec::with_capacity(units.len());
    for unit in &units {
        items.push(match unit {
            Unit::Primary(primary) => primary_unit_view(repo, primary)?,
            Unit::Combined(combined) => combined_unit_view(repo, combined)?,
        });
    }
    Ok(Page { total_count, items })
}

/// Returns the view of any unit, primary or combined.
///
/// # Errors
///
/// Returns `CoreError::UnitNotFound` if no unit has the id.
pub fn get_unit<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit_id: UnitId,
) -> Result<UnitView, CoreError> {
    match resolve_unit(repo, unit_id)? {
        ResolvedUnit::Primary(unit) | ResolvedUnit::Member { unit, .. } => {
            primary_unit_view(repo, &unit)
        }
        ResolvedUnit::Combined(combined) => combined_unit_view(repo, &combined),
    }
}

/// Lists a primary unit's duty logs, most recent first.
///
/// # Errors
///
/// Returns `CoreError::UnitNotFound` if no primary unit has the id.
pub fn list_duty_logs<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit_id: UnitId,
) -> Result<Vec<DutyLogView>, CoreError> {
    if repo.find_unit(unit_id)?.is_none() {
        return Err(CoreError::UnitNotFound(unit_id));
    }
    repo.list_duty_logs(unit_id)?
        .into_iter()
        .map(DutyLogView::try_from)
        .collect()
}
