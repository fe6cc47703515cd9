// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Denormalized read models returned to callers and carried by events.
//!
//! Views are always built inside the same transaction as the write that
//! produced them, so they reflect committed state exactly.

use crate::error::CoreError;
use crate::repository::UnitRepository;
use cad_dispatch_domain::{
    Assignment, AssignmentTarget, Call, CallId, CombinedUnit, Discipline, DutyLog, DutyLogId,
    Incident, IncidentId, PrimaryUnit, ShouldDo, StatusCode, StatusCodeId, UnitId, UnitRef,
    format_timestamp,
};
use serde::Serialize;
use time::OffsetDateTime;

/// Which identity space a unit lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Primary,
    Combined,
}

/// A status code as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub id: StatusCodeId,
    pub value: String,
    pub should_do: ShouldDo,
    pub color: Option<String>,
    pub position: i32,
}

impl From<StatusCode> for StatusView {
    fn from(status: StatusCode) -> Self {
        Self {
            id: status.id,
            value: status.value,
            should_do: status.should_do,
            color: status.color,
            position: status.position,
        }
    }
}

/// A short unit reference embedded in call, incident and member listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSummary {
    pub id: UnitId,
    pub kind: UnitKind,
    pub callsign: String,
    pub discipline: Discipline,
    pub status: Option<String>,
}

/// A fully resolved unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitView {
    pub id: UnitId,
    pub kind: UnitKind,
    pub discipline: Discipline,
    pub callsign: String,
    pub callsign2: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<StatusView>,
    pub on_duty: bool,
    pub suspended: bool,
    /// Set on a primary unit while it belongs to a combined unit.
    pub combined_unit_id: Option<UnitId>,
    pub members: Vec<UnitSummary>,
    pub active_call_id: Option<CallId>,
    pub active_incident_id: Option<IncidentId>,
    pub last_status_change_at: Option<String>,
}

/// A call with its attached units resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallView {
    pub id: CallId,
    pub case_number: i64,
    pub location: String,
    pub description: Option<String>,
    pub ended: bool,
    pub units: Vec<UnitSummary>,
    pub created_at: String,
    pub updated_at: String,
}

/// An incident with its involved units resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentView {
    pub id: IncidentId,
    pub case_number: i64,
    pub description: String,
    pub is_active: bool,
    pub units: Vec<UnitSummary>,
    pub created_at: String,
    pub updated_at: String,
}

/// Either kind of assignment target, resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TargetView {
    Call(CallView),
    Incident(IncidentView),
}

/// A duty interval as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyLogView {
    pub id: DutyLogId,
    pub unit_id: UnitId,
    pub started_at: String,
    pub ended_at: Option<String>,
}

impl TryFrom<DutyLog> for DutyLogView {
    type Error = CoreError;

    fn try_from(log: DutyLog) -> Result<Self, Self::Error> {
        Ok(Self {
            id: log.id,
            unit_id: log.unit_id,
            started_at: format_timestamp(log.started_at)?,
            ended_at: format_optional(log.ended_at)?,
        })
    }
}

fn format_optional(timestamp: Option<OffsetDateTime>) -> Result<Option<String>, CoreError> {
    Ok(timestamp.map(format_timestamp).transpose()?)
}

fn status_view<R: UnitRepository + ?Sized>(
    repo: &mut R,
    status_id: Option<StatusCodeId>,
) -> Result<Option<StatusView>, CoreError> {
    match status_id {
        Some(id) => Ok(repo.find_status_code(id)?.map(StatusView::from)),
        None => Ok(None),
    }
}

fn status_label<R: UnitRepository + ?Sized>(
    repo: &mut R,
    status_id: Option<StatusCodeId>,
) -> Result<Option<String>, CoreError> {
    Ok(status_view(repo, status_id)?.map(|status| status.value))
}

/// Builds the view of a primary unit.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn primary_unit_view<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: &PrimaryUnit,
) -> Result<UnitView, CoreError> {
    let combined: Option<CombinedUnit> = repo.find_combined_unit_containing(unit.id)?;
    let status: Option<StatusView> = status_view(repo, unit.status_id)?;

    Ok(UnitView {
        id: unit.id,
        kind: UnitKind::Primary,
        discipline: unit.discipline,
        callsign: unit.callsign.clone(),
        callsign2: Some(unit.callsign2.clone()),
        user_id: Some(unit.user_id.clone()),
        status,
        on_duty: unit.status_id.is_some() || combined.is_some(),
        suspended: unit.suspended,
        combined_unit_id: combined.map(|c| c.id),
        members: Vec::new(),
        active_call_id: unit.active_call_id,
        active_incident_id: unit.active_incident_id,
        last_status_change_at: format_optional(unit.last_status_change_at)?,
    })
}

/// Builds the view of a combined unit, resolving its members.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn combined_unit_view<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: &CombinedUnit,
) -> Result<UnitView, CoreError> {
    let mut members: Vec<UnitSummary> = Vec::with_capacity(unit.members.len());
    for member_id in &unit.members {
        if let Some(member) = repo.find_unit(*member_id)? {
            members.push(UnitSummary {
                id: member.id,
                kind: UnitKind::Primary,
                callsign: member.callsign,
                discipline: member.discipline,
                status: None,
            });
        }
    }

    Ok(UnitView {
        id: unit.id,
        kind: UnitKind::Combined,
        discipline: unit.discipline,
        callsign: unit.callsign.clone(),
        callsign2: None,
        user_id: None,
        status: status_view(repo, Some(unit.status_id))?,
        on_duty: true,
        suspended: false,
        combined_unit_id: None,
        members,
        active_call_id: unit.active_call_id,
        active_incident_id: unit.active_incident_id,
        last_status_change_at: format_optional(unit.last_status_change_at)?,
    })
}

/// Re-reads a unit by reference and builds its view.
///
/// # Errors
///
/// Returns `CoreError::UnitNotFound` if the unit no longer exists.
pub fn unit_view<R: UnitRepository + ?Sized>(
    repo: &mut R,
    unit: UnitRef,
) -> Result<UnitView, CoreError> {
    match unit {
        UnitRef::Primary(id) => {
            let primary: PrimaryUnit = repo.find_unit(id)?.ok_or(CoreError::UnitNotFound(id))?;
            primary_unit_view(repo, &primary)
        }
        UnitRef::Combined(id) => {
            let combined: CombinedUnit = repo
                .find_combined_unit(id)?
                .ok_or(CoreError::UnitNotFound(id))?;
            combined_unit_view(repo, &combined)
        }
    }
}

fn assigned_units<R: UnitRepository + ?Sized>(
    repo: &mut R,
    target: AssignmentTarget,
) -> Result<Vec<UnitSummary>, CoreError> {
    let assignments: Vec<Assignment> = repo.list_target_assignments(target)?;
    let mut units: Vec<UnitSummary> = Vec::with_capacity(assignments.len());

    for assignment in assignments {
        match assignment.unit {
            UnitRef::Primary(id) => {
                if let Some(unit) = repo.find_unit(id)? {
                    let status: Option<String> = status_label(repo, unit.status_id)?;
                    units.push(UnitSummary {
                        id: unit.id,
                        kind: UnitKind::Primary,
                        callsign: unit.callsign,
                        discipline: unit.discipline,
                        status,
                    });
                }
            }
            UnitRef::Combined(id) => {
                if let Some(unit) = repo.find_combined_unit(id)? {
                    let status: Option<String> = status_label(repo, Some(unit.status_id))?;
                    units.push(UnitSummary {
                        id: unit.id,
                        kind: UnitKind::Combined,
                        callsign: unit.callsign,
                        discipline: unit.discipline,
                        status,
                    });
                }
            }
        }
    }

    Ok(units)
}

/// Builds the view of a call.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn call_view<R: UnitRepository + ?Sized>(
    repo: &mut R,
    call: &Call,
) -> Result<CallView, CoreError> {
    Ok(CallView {
        id: call.id,
        case_number: call.case_number,
        location: call.location.clone(),
        description: call.description.clone(),
        ended: call.ended,
        units: assigned_units(repo, AssignmentTarget::Call(call.id))?,
        created_at: format_timestamp(call.created_at)?,
        updated_at: format_timestamp(call.updated_at)?,
    })
}

/// Builds the view of an incident.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn incident_view<R: UnitRepository + ?Sized>(
    repo: &mut R,
    incident: &Incident,
) -> Result<IncidentView, CoreError> {
    Ok(IncidentView {
        id: incident.id,
        case_number: incident.case_number,
        description: incident.description.clone(),
        is_active: incident.is_active,
        units: assigned_units(repo, AssignmentTarget::Incident(incident.id))?,
        created_at: format_timestamp(incident.created_at)?,
        updated_at: format_timestamp(incident.updated_at)?,
    })
}

/// Re-reads a target and builds its view.
///
/// # Errors
///
/// Returns `CoreError::TargetNotFound` if the target does not exist.
pub fn target_view<R: UnitRepository + ?Sized>(
    repo: &mut R,
    target: AssignmentTarget,
) -> Result<TargetView, CoreError> {
    match target {
        AssignmentTarget::Call(id) => {
            let call: Call = repo
                .find_call(id)?
                .ok_or(CoreError::TargetNotFound(target))?;
            Ok(TargetView::Call(call_view(repo, &call)?))
        }
        AssignmentTarget::Incident(id) => {
            let incident: Incident = repo
                .find_incident(id)?
                .ok_or(CoreError::TargetNotFound(target))?;
            Ok(TargetView::Incident(incident_view(repo, &incident)?))
        }
    }
}
