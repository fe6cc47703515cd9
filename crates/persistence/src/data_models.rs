// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversions to and from domain values.
//!
//! Identifiers are stored as hyphenated UUID text and timestamps as RFC 3339
//! text in UTC.

use std::str::FromStr;

use cad_dispatch_domain::{
    Assignment, AssignmentId, AssignmentTarget, Call, CallId, CombinedUnit, Discipline, DutyLog,
    DutyLogId, Incident, IncidentId, PrimaryUnit, ShouldDo, StatusCode, StatusCodeId, UnitId,
    UnitRef, format_timestamp, parse_timestamp,
};
use diesel::prelude::*;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{
    assigned_units, calls, combined_units, duty_logs, incidents, involved_units, status_codes,
    units,
};
use crate::error::PersistenceError;

/// Formats a timestamp for storage.
pub(crate) fn stamp(table: &'static str, at: OffsetDateTime) -> Result<String, PersistenceError> {
    format_timestamp(at.to_offset(UtcOffset::UTC)).map_err(|e| PersistenceError::corrupt(table, &e))
}

pub(crate) fn stamp_opt(
    table: &'static str,
    at: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    at.map(|at| stamp(table, at)).transpose()
}

fn read_stamp(table: &'static str, value: &str) -> Result<OffsetDateTime, PersistenceError> {
    parse_timestamp(value).map_err(|e| PersistenceError::corrupt(table, &e))
}

fn read_stamp_opt(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(|v| read_stamp(table, v)).transpose()
}

macro_rules! read_id {
    ($ty:ty, $table:expr, $value:expr) => {
        <$ty>::parse($value).map_err(|e| PersistenceError::corrupt($table, &e))
    };
}

macro_rules! read_id_opt {
    ($ty:ty, $table:expr, $value:expr) => {
        $value
            .as_deref()
            .map(|v| read_id!($ty, $table, v))
            .transpose()
    };
}

fn read_discipline(table: &'static str, value: &str) -> Result<Discipline, PersistenceError> {
    Discipline::from_str(value).map_err(|e| PersistenceError::corrupt(table, &e))
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = status_codes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatusCodeRow {
    pub status_code_id: String,
    pub value: String,
    pub should_do: String,
    pub color: Option<String>,
    pub position: i32,
}

impl StatusCodeRow {
    pub fn from_domain(status: &StatusCode) -> Self {
        Self {
            status_code_id: status.id.to_string(),
            value: status.value.clone(),
            should_do: status.should_do.as_str().to_string(),
            color: status.color.clone(),
            position: status.position,
        }
    }

    pub fn into_domain(self) -> Result<StatusCode, PersistenceError> {
        const TABLE: &str = "status_codes";
        Ok(StatusCode {
            id: read_id!(StatusCodeId, TABLE, &self.status_code_id)?,
            value: self.value,
            should_do: ShouldDo::from_str(&self.should_do)
                .map_err(|e| PersistenceError::corrupt(TABLE, &e))?,
            color: self.color,
            position: self.position,
        })
    }
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = units)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UnitRow {
    pub unit_id: String,
    pub discipline: String,
    pub callsign: String,
    pub callsign2: String,
    pub user_id: String,
    pub status_code_id: Option<String>,
    pub suspended: bool,
    pub last_status_change_at: Option<String>,
    pub active_call_id: Option<String>,
    pub active_incident_id: Option<String>,
}

impl UnitRow {
    pub fn from_domain(unit: &PrimaryUnit) -> Result<Self, PersistenceError> {
        Ok(Self {
            unit_id: unit.id.to_string(),
            discipline: unit.discipline.as_str().to_string(),
            callsign: unit.callsign.clone(),
            callsign2: unit.callsign2.clone(),
            user_id: unit.user_id.clone(),
            status_code_id: unit.status_id.map(|id| id.to_string()),
            suspended: unit.suspended,
            last_status_change_at: stamp_opt("units", unit.last_status_change_at)?,
            active_call_id: unit.active_call_id.map(|id| id.to_string()),
            active_incident_id: unit.active_incident_id.map(|id| id.to_string()),
        })
    }

    pub fn into_domain(self) -> Result<PrimaryUnit, PersistenceError> {
        const TABLE: &str = "units";
        Ok(PrimaryUnit {
            id: read_id!(UnitId, TABLE, &self.unit_id)?,
            discipline: read_discipline(TABLE, &self.discipline)?,
            callsign: self.callsign,
            callsign2: self.callsign2,
            user_id: self.user_id,
            status_id: read_id_opt!(StatusCodeId, TABLE, self.status_code_id)?,
            suspended: self.suspended,
            last_status_change_at: read_stamp_opt(TABLE, self.last_status_change_at.as_deref())?,
            active_call_id: read_id_opt!(CallId, TABLE, self.active_call_id)?,
            active_incident_id: read_id_opt!(IncidentId, TABLE, self.active_incident_id)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = combined_units)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CombinedUnitRow {
    pub combined_unit_id: String,
    pub discipline: String,
    pub callsign: String,
    pub status_code_id: String,
    pub last_status_change_at: Option<String>,
    pub active_call_id: Option<String>,
    pub active_incident_id: Option<String>,
    pub created_at: String,
}

impl CombinedUnitRow {
    pub fn from_domain(unit: &CombinedUnit) -> Result<Self, PersistenceError> {
        const TABLE: &str = "combined_units";
        Ok(Self {
            combined_unit_id: unit.id.to_string(),
            discipline: unit.discipline.as_str().to_string(),
            callsign: unit.callsign.clone(),
            status_code_id: unit.status_id.to_string(),
            last_status_change_at: stamp_opt(TABLE, unit.last_status_change_at)?,
            active_call_id: unit.active_call_id.map(|id| id.to_string()),
            active_incident_id: unit.active_incident_id.map(|id| id.to_string()),
            created_at: stamp(TABLE, unit.created_at)?,
        })
    }

    /// Builds the domain value. `members` must already be in merge order.
    pub fn into_domain(self, members: Vec<UnitId>) -> Result<CombinedUnit, PersistenceError> {
        const TABLE: &str = "combined_units";
        Ok(CombinedUnit {
            id: read_id!(UnitId, TABLE, &self.combined_unit_id)?,
            discipline: read_discipline(TABLE, &self.discipline)?,
            callsign: self.callsign,
            status_id: read_id!(StatusCodeId, TABLE, &self.status_code_id)?,
            members,
            last_status_change_at: read_stamp_opt(TABLE, self.last_status_change_at.as_deref())?,
            active_call_id: read_id_opt!(CallId, TABLE, self.active_call_id)?,
            active_incident_id: read_id_opt!(IncidentId, TABLE, self.active_incident_id)?,
            created_at: read_stamp(TABLE, &self.created_at)?,
        })
    }
}

/// Parses a member id read from `combined_unit_members`.
pub fn read_member_id(value: &str) -> Result<UnitId, PersistenceError> {
    read_id!(UnitId, "combined_unit_members", value)
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = duty_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DutyLogRow {
    pub duty_log_id: String,
    pub unit_id: String,
    pub started_at: String,
    pub ended_at: Option<String>,
}

impl DutyLogRow {
    pub fn from_domain(log: &DutyLog) -> Result<Self, PersistenceError> {
        const TABLE: &str = "duty_logs";
        Ok(Self {
            duty_log_id: log.id.to_string(),
            unit_id: log.unit_id.to_string(),
            started_at: stamp(TABLE, log.started_at)?,
            ended_at: stamp_opt(TABLE, log.ended_at)?,
        })
    }

    pub fn into_domain(self) -> Result<DutyLog, PersistenceError> {
        const TABLE: &str = "duty_logs";
        Ok(DutyLog {
            id: read_id!(DutyLogId, TABLE, &self.duty_log_id)?,
            unit_id: read_id!(UnitId, TABLE, &self.unit_id)?,
            started_at: read_stamp(TABLE, &self.started_at)?,
            ended_at: read_stamp_opt(TABLE, self.ended_at.as_deref())?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = calls)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CallRow {
    pub call_id: String,
    pub case_number: i64,
    pub location: String,
    pub description: Option<String>,
    pub ended: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl CallRow {
    pub fn into_domain(self) -> Result<Call, PersistenceError> {
        const TABLE: &str = "calls";
        Ok(Call {
            id: read_id!(CallId, TABLE, &self.call_id)?,
            case_number: self.case_number,
            location: self.location,
            description: self.description,
            ended: self.ended,
            created_at: read_stamp(TABLE, &self.created_at)?,
            updated_at: read_stamp(TABLE, &self.updated_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = incidents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IncidentRow {
    pub incident_id: String,
    pub case_number: i64,
    pub description: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl IncidentRow {
    pub fn into_domain(self) -> Result<Incident, PersistenceError> {
        const TABLE: &str = "incidents";
        Ok(Incident {
            id: read_id!(IncidentId, TABLE, &self.incident_id)?,
            case_number: self.case_number,
            description: self.description,
            is_active: self.is_active,
            created_at: read_stamp(TABLE, &self.created_at)?,
            updated_at: read_stamp(TABLE, &self.updated_at)?,
        })
    }
}

/// Shared decoding for `assigned_units` and `involved_units` rows.
fn assignment_unit(
    table: &'static str,
    unit_id: Option<&str>,
    combined_unit_id: Option<&str>,
) -> Result<UnitRef, PersistenceError> {
    match (unit_id, combined_unit_id) {
        (Some(id), None) => Ok(UnitRef::Primary(read_id!(UnitId, table, id)?)),
        (None, Some(id)) => Ok(UnitRef::Combined(read_id!(UnitId, table, id)?)),
        _ => Err(PersistenceError::CorruptRow {
            table,
            message: String::from("exactly one of unit_id and combined_unit_id must be set"),
        }),
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = assigned_units)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssignedUnitRow {
    pub assignment_id: String,
    pub call_id: String,
    pub unit_id: Option<String>,
    pub combined_unit_id: Option<String>,
    pub created_at: String,
}

impl AssignedUnitRow {
    pub fn into_domain(self) -> Result<Assignment, PersistenceError> {
        const TABLE: &str = "assigned_units";
        Ok(Assignment {
            id: read_id!(AssignmentId, TABLE, &self.assignment_id)?,
            target: AssignmentTarget::Call(read_id!(CallId, TABLE, &self.call_id)?),
            unit: assignment_unit(
                TABLE,
                self.unit_id.as_deref(),
                self.combined_unit_id.as_deref(),
            )?,
            created_at: read_stamp(TABLE, &self.created_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = involved_units)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvolvedUnitRow {
    pub assignment_id: String,
    pub incident_id: String,
    pub unit_id: Option<String>,
    pub combined_unit_id: Option<String>,
    pub created_at: String,
}

impl InvolvedUnitRow {
    pub fn into_domain(self) -> Result<Assignment, PersistenceError> {
        const TABLE: &str = "involved_units";
        Ok(Assignment {
            id: read_id!(AssignmentId, TABLE, &self.assignment_id)?,
            target: AssignmentTarget::Incident(read_id!(IncidentId, TABLE, &self.incident_id)?),
            unit: assignment_unit(
                TABLE,
                self.unit_id.as_deref(),
                self.combined_unit_id.as_deref(),
            )?,
            created_at: read_stamp(TABLE, &self.created_at)?,
        })
    }
}
