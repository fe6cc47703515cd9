// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Administrative inserts for reference data and dispatch records.
//! These validate and insert; they have no coordination side effects.

use crate::error::CoreError;
use crate::repository::UnitRepository;
use crate::views::{
    CallView, IncidentView, StatusView, UnitView, call_view, incident_view, primary_unit_view,
};
use cad_dispatch_domain::{
    Call, Discipline, Incident, PrimaryUnit, ShouldDo, StatusCode, validate_callsign,
    validate_required_text,
};
use time::OffsetDateTime;
use tracing::info;

/// Adds a status code to the catalog.
///
/// # Errors
///
/// Returns an error if the label is blank or the write fails.
pub fn create_status_code<R: UnitRepository + ?Sized>(
    repo: &mut R,
    value: &str,
    should_do: ShouldDo,
    color: Option<String>,
    position: i32,
) -> Result<StatusView, CoreError> {
    validate_required_text("value", value)?;
    let status: StatusCode = StatusCode::new(value.trim(), should_do, color, position);
    repo.insert_status_code(&status)?;
    info!(status_id = %status.id, value = %status.value, %should_do, "Created status code");
    Ok(StatusView::from(status))
}

/// Lists the status catalog in position order.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_status_codes<R: UnitRepository + ?Sized>(
    repo: &mut R,
) -> Result<Vec<StatusView>, CoreError> {
    Ok(repo
        .list_status_codes()?
        .into_iter()
        .map(StatusView::from)
        .collect())
}

/// Registers a new, off-duty primary unit.
///
/// # Errors
///
/// Returns an error if a callsign or the owner is invalid, or the write fails.
pub fn create_unit<R: UnitRepository + ?Sized>(
    repo: &mut R,
    discipline: Discipline,
    callsign: &str,
    callsign2: &str,
    user_id: &str,
) -> Result<UnitView, CoreError> {
    validate_callsign(callsign)?;
    validate_callsign(callsign2)?;
    validate_required_text("user_id", user_id)?;

    let unit: PrimaryUnit = PrimaryUnit::new(
        discipline,
        callsign.trim(),
        callsign2.trim(),
        user_id.trim(),
    );
    repo.insert_unit(&unit)?;
    info!(unit_id = %unit.id, callsign = %unit.callsign, %discipline, "Created unit");
    primary_unit_view(repo, &unit)
}

/// Opens a new call.
///
/// # Errors
///
/// Returns an error if the location is blank or the write fails.
pub fn create_call<R: UnitRepository + ?Sized>(
    repo: &mut R,
    location: &str,
    description: Option<&str>,
    now: OffsetDateTime,
) -> Result<CallView, CoreError> {
    validate_required_text("location", location)?;
    let description: Option<&str> = description.map(str::trim).filter(|d| !d.is_empty());
    let call: Call = repo.insert_call(location.trim(), description, now)?;
    info!(call_id = %call.id, case_number = call.case_number, "Created call");
    call_view(repo, &call)
}

/// Opens a new incident.
///
/// # Errors
///
/// Returns an error if the description is blank or the write fails.
pub fn create_incident<R: UnitRepository + ?Sized>(
    repo: &mut R,
    description: &str,
    now: OffsetDateTime,
) -> Result<IncidentView, CoreError> {
    validate_required_text("description", description)?;
    let incident: Incident = repo.insert_incident(description.trim(), now)?;
    info!(
        incident_id = %incident.id,
        case_number = incident.case_number,
        "Created incident"
    );
    incident_view(repo, &incident)
}
