// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Each state-changing handler parses its request, runs one engine operation
//! inside a single persistence transaction and returns the response together
//! with the events to publish. Publishing is the caller's job and must happen
//! only after the handler has returned `Ok`, which is after commit.

use std::str::FromStr;

use cad_dispatch::{
    AssignmentChange, AssignmentMode, CallView, CoreError, DispatchEvent, DutyLogView,
    IncidentView, MergeRequest, Outcome, Page, StatusChange, StatusView, TargetView, UnitView,
};
use cad_dispatch_domain::{
    ActiveType, AssignmentTarget, CadSettings, CallId, Discipline, IncidentId, Pagination,
    ShouldDo, StatusCodeId, TargetKind, UnitId, validate_pagination,
};
use cad_dispatch_persistence::{Persistence, SqliteRepository};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AssignmentRequest, CreateCallRequest, CreateIncidentRequest, CreateStatusCodeRequest,
    CreateUnitRequest, ListQuery, MergeUnitsRequest, SetUnitStatusRequest,
};

/// The result of a state-changing API operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// Events to publish once the transaction has committed.
    pub events: Vec<DispatchEvent>,
}

impl<T> From<Outcome<T>> for ApiResult<T> {
    fn from(outcome: Outcome<T>) -> Self {
        Self {
            response: outcome.value,
            events: outcome.events,
        }
    }
}

fn parse_unit_id(value: &str) -> Result<UnitId, ApiError> {
    UnitId::parse(value).map_err(translate_domain_error)
}

fn parse_target(kind: TargetKind, value: &str) -> Result<AssignmentTarget, ApiError> {
    match kind {
        TargetKind::Call => CallId::parse(value).map(AssignmentTarget::Call),
        TargetKind::Incident => IncidentId::parse(value).map(AssignmentTarget::Incident),
    }
    .map_err(translate_domain_error)
}

fn parse_listing(query: &ListQuery) -> Result<(ActiveType, Pagination), ApiError> {
    let active_type: ActiveType = match query.active_type.as_deref() {
        Some(value) => ActiveType::from_str(value).map_err(translate_domain_error)?,
        None => ActiveType::default(),
    };
    let page: Pagination =
        validate_pagination(query.skip, query.take).map_err(translate_domain_error)?;
    Ok((active_type, page))
}

/// Runs an engine operation in a write transaction and translates its error.
fn write<T, F>(persistence: &mut Persistence, operation: F) -> Result<ApiResult<T>, ApiError>
where
    F: FnOnce(&mut SqliteRepository<'_>) -> Result<Outcome<T>, CoreError>,
{
    persistence
        .transaction(operation)
        .map(ApiResult::from)
        .map_err(translate_core_error)
}

/// Runs a read-only engine operation and translates its error.
fn read<T, F>(persistence: &mut Persistence, operation: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut SqliteRepository<'_>) -> Result<T, CoreError>,
{
    persistence.read(operation).map_err(translate_core_error)
}

/// Changes a unit's status.
///
/// Setting a primary unit's status first takes the owner's other units off
/// duty. A dispatcher may change the status of a combined-unit member, which
/// applies the status to its combined unit instead.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `unit_id` - The unit whose status changes (path parameter)
/// * `request` - The status change
/// * `now` - The time of the change
///
/// # Errors
///
/// Returns an error if:
/// - An id is malformed (`INVALID_INPUT`)
/// - The unit or status does not exist (`UNIT_NOT_FOUND`, `STATUS_NOT_FOUND`)
/// - The unit is suspended or merged (`UNIT_SUSPENDED`, `UNIT_IS_COMBINED`)
pub fn set_unit_status(
    persistence: &mut Persistence,
    unit_id: &str,
    request: SetUnitStatusRequest,
    now: OffsetDateTime,
) -> Result<ApiResult<UnitView>, ApiError> {
    let change: StatusChange = StatusChange {
        unit_id: parse_unit_id(unit_id)?,
        status_id: StatusCodeId::parse(&request.status_id).map_err(translate_domain_error)?,
        requested_by: request.requested_by,
        is_dispatch: request.is_dispatch,
    };

    info!(
        unit_id = %change.unit_id,
        status_id = %change.status_id,
        requested_by = %change.requested_by,
        is_dispatch = change.is_dispatch,
        "Setting unit status"
    );

    write(persistence, |repo| {
        cad_dispatch::set_unit_status(repo, &change, now)
    })
}

/// Merges primary units into a new combined unit.
///
/// # Errors
///
/// Returns an error if:
/// - An id is malformed, fewer than two units are given, or a unit repeats
///   (`INVALID_INPUT`)
/// - The units are of different disciplines (`DISCIPLINE_MISMATCH`)
/// - A unit is already merged (`OFFICER_ALREADY_MERGED`)
/// - A unit does not exist (`UNIT_NOT_FOUND`)
/// - The acting unit is not on duty (`NO_ACTIVE_UNIT`)
pub fn merge_units(
    persistence: &mut Persistence,
    settings: &CadSettings,
    request: &MergeUnitsRequest,
    now: OffsetDateTime,
) -> Result<ApiResult<UnitView>, ApiError> {
    let unit_ids: Vec<UnitId> = request
        .unit_ids
        .iter()
        .map(|id| parse_unit_id(id))
        .collect::<Result<_, _>>()?;
    let merge: MergeRequest = MergeRequest {
        unit_ids,
        acting_unit_id: parse_unit_id(&request.acting_unit_id)?,
    };

    write(persistence, |repo| {
        cad_dispatch::merge_units(repo, settings, &merge, now)
    })
}

/// Dissolves a combined unit. Members go back on duty with its status.
///
/// # Errors
///
/// Returns `UNIT_NOT_FOUND` if the id is not a combined unit.
pub fn unmerge_unit(
    persistence: &mut Persistence,
    combined_unit_id: &str,
    now: OffsetDateTime,
) -> Result<ApiResult<()>, ApiError> {
    let combined_unit_id: UnitId = parse_unit_id(combined_unit_id)?;
    write(persistence, |repo| {
        cad_dispatch::unmerge_unit(repo, combined_unit_id, now)
    })
}

/// Attaches a unit to, or detaches it from, a call or incident.
///
/// # Arguments
///
/// * `kind` - Whether `target_id` names a call or an incident
/// * `target_id` - The call or incident (path parameter)
/// * `request` - The unit and the `force` flag
/// * `assign` - True to attach, false to detach
///
/// # Errors
///
/// Returns an error if:
/// - An id is malformed (`INVALID_INPUT`)
/// - The unit or target does not exist (`UNIT_NOT_FOUND`, `TARGET_NOT_FOUND`)
/// - The unit is merged or suspended (`UNIT_IS_COMBINED`, `UNIT_SUSPENDED`)
/// - The unit is off duty (`UNIT_OFF_DUTY`)
/// - The unit is already, or not, attached (`ALREADY_ASSIGNED`, `NOT_ASSIGNED`)
/// - The unit is at its cap and `force` is not set (`TOO_MANY_ASSIGNMENTS`)
pub fn change_assignment(
    persistence: &mut Persistence,
    settings: &CadSettings,
    kind: TargetKind,
    target_id: &str,
    request: &AssignmentRequest,
    assign: bool,
    now: OffsetDateTime,
) -> Result<ApiResult<TargetView>, ApiError> {
    let change: AssignmentChange = AssignmentChange {
        target: parse_target(kind, target_id)?,
        unit_id: parse_unit_id(&request.unit_id)?,
        mode: if assign {
            AssignmentMode::Assign {
                force: request.force,
            }
        } else {
            AssignmentMode::Unassign
        },
    };

    write(persistence, |repo| {
        cad_dispatch::change_assignment(repo, settings, &change, now)
    })
}

/// Ends a call or marks an incident inactive, detaching all of its units.
///
/// # Errors
///
/// Returns `TARGET_NOT_FOUND` if the call or incident does not exist.
pub fn end_target(
    persistence: &mut Persistence,
    kind: TargetKind,
    target_id: &str,
    now: OffsetDateTime,
) -> Result<ApiResult<TargetView>, ApiError> {
    match parse_target(kind, target_id)? {
        AssignmentTarget::Call(call_id) => write(persistence, |repo| {
            cad_dispatch::end_call(repo, call_id, now)
        }),
        AssignmentTarget::Incident(incident_id) => write(persistence, |repo| {
            cad_dispatch::end_incident(repo, incident_id, now)
        }),
    }
}

/// Lists calls.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the filter or pagination is invalid.
pub fn list_calls(
    persistence: &mut Persistence,
    settings: &CadSettings,
    query: &ListQuery,
    now: OffsetDateTime,
) -> Result<Page<CallView>, ApiError> {
    let (active_type, page) = parse_listing(query)?;
    read(persistence, |repo| {
        cad_dispatch::list_calls(repo, settings, active_type, page, now)
    })
}

/// Lists incidents.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the filter or pagination is invalid.
pub fn list_incidents(
    persistence: &mut Persistence,
    settings: &CadSettings,
    query: &ListQuery,
    now: OffsetDateTime,
) -> Result<Page<IncidentView>, ApiError> {
    let (active_type, page) = parse_listing(query)?;
    read(persistence, |repo| {
        cad_dispatch::list_incidents(repo, settings, active_type, page, now)
    })
}

/// Lists independent primary units and combined units.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the filter or pagination is invalid.
pub fn list_units(
    persistence: &mut Persistence,
    settings: &CadSettings,
    query: &ListQuery,
    now: OffsetDateTime,
) -> Result<Page<UnitView>, ApiError> {
    let (active_type, page) = parse_listing(query)?;
    read(persistence, |repo| {
        cad_dispatch::list_units(repo, settings, active_type, page, now)
    })
}

/// Returns one unit, primary or combined.
///
/// # Errors
///
/// Returns `UNIT_NOT_FOUND` if no unit has the id.
pub fn get_unit(persistence: &mut Persistence, unit_id: &str) -> Result<UnitView, ApiError> {
    let unit_id: UnitId = parse_unit_id(unit_id)?;
    debug!(%unit_id, "Fetching unit");
    read(persistence, |repo| cad_dispatch::get_unit(repo, unit_id))
}

/// Lists a primary unit's duty logs, most recent first.
///
/// # Errors
///
/// Returns `UNIT_NOT_FOUND` if no primary unit has the id.
pub fn list_duty_logs(
    persistence: &mut Persistence,
    unit_id: &str,
) -> Result<Vec<DutyLogView>, ApiError> {
    let unit_id: UnitId = parse_unit_id(unit_id)?;
    read(persistence, |repo| {
        cad_dispatch::list_duty_logs(repo, unit_id)
    })
}

/// Adds a status code to the catalog.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the label or effect is invalid.
pub fn create_status_code(
    persistence: &mut Persistence,
    request: CreateStatusCodeRequest,
) -> Result<StatusView, ApiError> {
    let should_do: ShouldDo =
        ShouldDo::from_str(&request.should_do).map_err(translate_domain_error)?;
    persistence
        .transaction(|repo| {
            cad_dispatch::create_status_code(
                repo,
                &request.value,
                should_do,
                request.color,
                request.position,
            )
        })
        .map_err(translate_core_error)
}

/// Lists the status catalog.
///
/// # Errors
///
/// Returns `INTERNAL` if the store cannot be read.
pub fn list_status_codes(persistence: &mut Persistence) -> Result<Vec<StatusView>, ApiError> {
    read(persistence, |repo| cad_dispatch::list_status_codes(repo))
}

/// Registers a new, off-duty primary unit.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the discipline, a callsign or the owner is
/// invalid.
pub fn create_unit(
    persistence: &mut Persistence,
    request: &CreateUnitRequest,
) -> Result<UnitView, ApiError> {
    let discipline: Discipline =
        Discipline::from_str(&request.discipline).map_err(translate_domain_error)?;
    persistence
        .transaction(|repo| {
            cad_dispatch::create_unit(
                repo,
                discipline,
                &request.callsign,
                &request.callsign2,
                &request.user_id,
            )
        })
        .map_err(translate_core_error)
}

/// Opens a call.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the location is blank.
pub fn create_call(
    persistence: &mut Persistence,
    request: &CreateCallRequest,
    now: OffsetDateTime,
) -> Result<CallView, ApiError> {
    let description: Option<&str> = request.description.as_deref();
    persistence
        .transaction(|repo| cad_dispatch::create_call(repo, &request.location, description, now))
        .map_err(translate_core_error)
}

/// Opens an incident.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the description is blank.
pub fn create_incident(
    persistence: &mut Persistence,
    request: &CreateIncidentRequest,
    now: OffsetDateTime,
) -> Result<IncidentView, ApiError> {
    persistence
        .transaction(|repo| cad_dispatch::create_incident(repo, &request.description, now))
        .map_err(translate_core_error)
}
