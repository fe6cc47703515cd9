// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::{AssignmentTarget, Call, CallId, Incident, IncidentId};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;

use crate::data_models::stamp;
use crate::diesel_schema::{calls, incidents};
use crate::error::PersistenceError;
use crate::mutations::expect_row;
use crate::queries::dispatch::{next_call_case_number, next_incident_case_number};

/// Inserts a call with the next case number.
///
/// Must run inside a write transaction so two callers cannot read the same
/// highest case number.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_call(
    conn: &mut SqliteConnection,
    location: &str,
    description: Option<&str>,
    created_at: OffsetDateTime,
) -> Result<Call, PersistenceError> {
    let call: Call = Call {
        id: CallId::new(),
        case_number: next_call_case_number(conn)?,
        location: location.to_string(),
        description: description.map(str::to_string),
        ended: false,
        created_at,
        updated_at: created_at,
    };
    let created: String = stamp("calls", created_at)?;

    diesel::insert_into(calls::table)
        .values((
            calls::call_id.eq(call.id.to_string()),
            calls::case_number.eq(call.case_number),
            calls::location.eq(&call.location),
            calls::description.eq(call.description.as_deref()),
            calls::ended.eq(false),
            calls::created_at.eq(&created),
            calls::updated_at.eq(&created),
        ))
        .execute(conn)?;

    info!(call_id = %call.id, case_number = call.case_number, "Inserted call");
    Ok(call)
}

/// Marks a call ended.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the call does not exist.
pub fn end_call(
    conn: &mut SqliteConnection,
    call_id: CallId,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(calls::table)
        .filter(calls::call_id.eq(call_id.to_string()))
        .set((
            calls::ended.eq(true),
            calls::updated_at.eq(stamp("calls", at)?),
        ))
        .execute(conn)?;
    expect_row(affected, "call", call_id)
}

/// Inserts an incident with the next case number.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_incident(
    conn: &mut SqliteConnection,
    description: &str,
    created_at: OffsetDateTime,
) -> Result<Incident, PersistenceError> {
    let incident: Incident = Incident {
        id: IncidentId::new(),
        case_number: next_incident_case_number(conn)?,
        description: description.to_string(),
        is_active: true,
        created_at,
        updated_at: created_at,
    };
    let created: String = stamp("incidents", created_at)?;

    diesel::insert_into(incidents::table)
        .values((
            incidents::incident_id.eq(incident.id.to_string()),
            incidents::case_number.eq(incident.case_number),
            incidents::description.eq(&incident.description),
            incidents::is_active.eq(true),
            incidents::created_at.eq(&created),
            incidents::updated_at.eq(&created),
        ))
        .execute(conn)?;

    info!(
        incident_id = %incident.id,
        case_number = incident.case_number,
        "Inserted incident"
    );
    Ok(incident)
}

/// Marks an incident inactive.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the incident does not exist.
pub fn end_incident(
    conn: &mut SqliteConnection,
    incident_id: IncidentId,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(incidents::table)
        .filter(incidents::incident_id.eq(incident_id.to_string()))
        .set((
            incidents::is_active.eq(false),
            incidents::updated_at.eq(stamp("incidents", at)?),
        ))
        .execute(conn)?;
    expect_row(affected, "incident", incident_id)
}

/// Bumps a call's or incident's `updated_at`.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the target does not exist.
pub fn touch_target(
    conn: &mut SqliteConnection,
    target: AssignmentTarget,
    at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let affected: usize = match target {
        AssignmentTarget::Call(id) => diesel::update(calls::table)
            .filter(calls::call_id.eq(id.to_string()))
            .set(calls::updated_at.eq(stamp("calls", at)?))
            .execute(conn)?,
        AssignmentTarget::Incident(id) => diesel::update(incidents::table)
            .filter(incidents::incident_id.eq(id.to_string()))
            .set(incidents::updated_at.eq(stamp("incidents", at)?))
            .execute(conn)?,
    };
    expect_row(affected, "target", target)
}
