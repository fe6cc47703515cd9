// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Call (`assigned_units`) and incident (`involved_units`) join rows.
//!
//! Rows come back in insertion order, which is the order the engine relies
//! on for oldest-first eviction.

use cad_dispatch_domain::{Assignment, AssignmentTarget, CallId, IncidentId, TargetKind, UnitRef};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{AssignedUnitRow, InvolvedUnitRow};
use crate::diesel_schema::{assigned_units, involved_units};
use crate::error::PersistenceError;

fn call_assignments(
    conn: &mut SqliteConnection,
    call_id: Option<CallId>,
    unit: Option<UnitRef>,
) -> Result<Vec<Assignment>, PersistenceError> {
    let mut query = assigned_units::table
        .select(AssignedUnitRow::as_select())
        .order(assigned_units::id.asc())
        .into_boxed();

    if let Some(call_id) = call_id {
        query = query.filter(assigned_units::call_id.eq(call_id.to_string()));
    }
    match unit {
        Some(UnitRef::Primary(id)) => {
            query = query.filter(assigned_units::unit_id.eq(id.to_string()));
        }
        Some(UnitRef::Combined(id)) => {
            query = query.filter(assigned_units::combined_unit_id.eq(id.to_string()));
        }
        None => {}
    }

    let rows: Vec<AssignedUnitRow> = query.load(conn)?;
    rows.into_iter().map(AssignedUnitRow::into_domain).collect()
}

fn incident_assignments(
    conn: &mut SqliteConnection,
    incident_id: Option<IncidentId>,
    unit: Option<UnitRef>,
) -> Result<Vec<Assignment>, PersistenceError> {
    let mut query = involved_units::table
        .select(InvolvedUnitRow::as_select())
        .order(involved_units::id.asc())
        .into_boxed();

    if let Some(incident_id) = incident_id {
        query = query.filter(involved_units::incident_id.eq(incident_id.to_string()));
    }
    match unit {
        Some(UnitRef::Primary(id)) => {
            query = query.filter(involved_units::unit_id.eq(id.to_string()));
        }
        Some(UnitRef::Combined(id)) => {
            query = query.filter(involved_units::combined_unit_id.eq(id.to_string()));
        }
        None => {}
    }

    let rows: Vec<InvolvedUnitRow> = query.load(conn)?;
    rows.into_iter().map(InvolvedUnitRow::into_domain).collect()
}

/// Retrieves the join row linking `unit` to `target`.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_assignment(
    conn: &mut SqliteConnection,
    target: AssignmentTarget,
    unit: UnitRef,
) -> Result<Option<Assignment>, PersistenceError> {
    let rows: Vec<Assignment> = match target {
        AssignmentTarget::Call(id) => call_assignments(conn, Some(id), Some(unit))?,
        AssignmentTarget::Incident(id) => incident_assignments(conn, Some(id), Some(unit))?,
    };
    Ok(rows.into_iter().next())
}

/// Lists a unit's calls or incidents, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_unit_assignments(
    conn: &mut SqliteConnection,
    unit: UnitRef,
    kind: TargetKind,
) -> Result<Vec<Assignment>, PersistenceError> {
    match kind {
        TargetKind::Call => call_assignments(conn, None, Some(unit)),
        TargetKind::Incident => incident_assignments(conn, None, Some(unit)),
    }
}

/// Lists the units on a call or incident, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_target_assignments(
    conn: &mut SqliteConnection,
    target: AssignmentTarget,
) -> Result<Vec<Assignment>, PersistenceError> {
    match target {
        AssignmentTarget::Call(id) => call_assignments(conn, Some(id), None),
        AssignmentTarget::Incident(id) => incident_assignments(conn, Some(id), None),
    }
}
