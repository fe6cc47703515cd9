// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::{Call, CallId, Incident, IncidentId};
use diesel::SqliteConnection;
use diesel::dsl::max;
use diesel::prelude::*;

use crate::data_models::{CallRow, IncidentRow};
use crate::diesel_schema::{calls, incidents};
use crate::error::PersistenceError;

/// Retrieves a call.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_call(
    conn: &mut SqliteConnection,
    call_id: CallId,
) -> Result<Option<Call>, PersistenceError> {
    calls::table
        .filter(calls::call_id.eq(call_id.to_string()))
        .select(CallRow::as_select())
        .first::<CallRow>(conn)
        .optional()?
        .map(CallRow::into_domain)
        .transpose()
}

/// Lists all calls, newest case first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_calls(conn: &mut SqliteConnection) -> Result<Vec<Call>, PersistenceError> {
    let rows: Vec<CallRow> = calls::table
        .order(calls::case_number.desc())
        .select(CallRow::as_select())
        .load(conn)?;
    rows.into_iter().map(CallRow::into_domain).collect()
}

/// Returns the case number the next call will receive.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn next_call_case_number(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let highest: Option<i64> = calls::table
        .select(max(calls::case_number))
        .first(conn)?;
    Ok(highest.unwrap_or(0) + 1)
}

/// Retrieves an incident.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_incident(
    conn: &mut SqliteConnection,
    incident_id: IncidentId,
) -> Result<Option<Incident>, PersistenceError> {
    incidents::table
        .filter(incidents::incident_id.eq(incident_id.to_string()))
        .select(IncidentRow::as_select())
        .first::<IncidentRow>(conn)
        .optional()?
        .map(IncidentRow::into_domain)
        .transpose()
}

/// Lists all incidents, newest case first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_incidents(conn: &mut SqliteConnection) -> Result<Vec<Incident>, PersistenceError> {
    let rows: Vec<IncidentRow> = incidents::table
        .order(incidents::case_number.desc())
        .select(IncidentRow::as_select())
        .load(conn)?;
    rows.into_iter().map(IncidentRow::into_domain).collect()
}

/// Returns the case number the next incident will receive.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn next_incident_case_number(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let highest: Option<i64> = incidents::table
        .select(max(incidents::case_number))
        .first(conn)?;
    Ok(highest.unwrap_or(0) + 1)
}
