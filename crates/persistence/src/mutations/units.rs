// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::{
    CallId, CombinedUnit, IncidentId, PrimaryUnit, StatusCodeId, UnitId, UnitRef,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::{CombinedUnitRow, UnitRow, stamp};
use crate::diesel_schema::{combined_unit_members, combined_units, units};
use crate::error::PersistenceError;
use crate::mutations::expect_row;

/// Inserts a primary unit.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_unit(
    conn: &mut SqliteConnection,
    unit: &PrimaryUnit,
) -> Result<(), PersistenceError> {
    diesel::insert_into(units::table)
        .values(UnitRow::from_domain(unit)?)
        .execute(conn)?;
    debug!(unit_id = %unit.id, "Inserted unit");
    Ok(())
}

/// Writes a primary unit's status and status-change timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the unit does not exist.
pub fn update_unit_status(
    conn: &mut SqliteConnection,
    unit_id: UnitId,
    status_id: Option<StatusCodeId>,
    changed_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(units::table)
        .filter(units::unit_id.eq(unit_id.to_string()))
        .set((
            units::status_code_id.eq(status_id.map(|id| id.to_string())),
            units::last_status_change_at.eq(Some(stamp("units", changed_at)?)),
        ))
        .execute(conn)?;
    expect_row(affected, "unit", unit_id)
}

/// Inserts a combined unit and one membership row per member, in order.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if a member already
/// belongs to a combined unit.
pub fn insert_combined_unit(
    conn: &mut SqliteConnection,
    unit: &CombinedUnit,
) -> Result<(), PersistenceError> {
    diesel::insert_into(combined_units::table)
        .values(CombinedUnitRow::from_domain(unit)?)
        .execute(conn)?;

    let combined_unit_id: String = unit.id.to_string();
    for (position, member) in unit.members.iter().enumerate() {
        let position: i32 = i32::try_from(position)
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
        diesel::insert_into(combined_unit_members::table)
            .values((
                combined_unit_members::combined_unit_id.eq(&combined_unit_id),
                combined_unit_members::unit_id.eq(member.to_string()),
                combined_unit_members::position.eq(position),
            ))
            .execute(conn)?;
    }

    debug!(
        combined_unit_id = %unit.id,
        members = unit.members.len(),
        "Inserted combined unit"
    );
    Ok(())
}

/// Writes a combined unit's status and status-change timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the combined unit does not exist.
pub fn update_combined_status(
    conn: &mut SqliteConnection,
    combined_unit_id: UnitId,
    status_id: StatusCodeId,
    changed_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(combined_units::table)
        .filter(combined_units::combined_unit_id.eq(combined_unit_id.to_string()))
        .set((
            combined_units::status_code_id.eq(status_id.to_string()),
            combined_units::last_status_change_at.eq(Some(stamp("combined_units", changed_at)?)),
        ))
        .execute(conn)?;
    expect_row(affected, "combined unit", combined_unit_id)
}

/// Deletes a combined unit. Membership and assignment rows cascade.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_combined_unit(
    conn: &mut SqliteConnection,
    combined_unit_id: UnitId,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(
        combined_units::table
            .filter(combined_units::combined_unit_id.eq(combined_unit_id.to_string())),
    )
    .execute(conn)?;
    debug!(%combined_unit_id, affected, "Deleted combined unit");
    Ok(())
}

/// Sets or clears the active call pointer of either unit kind.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the unit does not exist.
pub fn set_active_call(
    conn: &mut SqliteConnection,
    unit: UnitRef,
    call_id: Option<CallId>,
) -> Result<(), PersistenceError> {
    let call_id: Option<String> = call_id.map(|id| id.to_string());
    let affected: usize = match unit {
        UnitRef::Primary(id) => diesel::update(units::table)
            .filter(units::unit_id.eq(id.to_string()))
            .set(units::active_call_id.eq(call_id))
            .execute(conn)?,
        UnitRef::Combined(id) => diesel::update(combined_units::table)
            .filter(combined_units::combined_unit_id.eq(id.to_string()))
            .set(combined_units::active_call_id.eq(call_id))
            .execute(conn)?,
    };
    expect_row(affected, "unit", unit)
}

/// Sets or clears the active incident pointer of either unit kind.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the unit does not exist.
pub fn set_active_incident(
    conn: &mut SqliteConnection,
    unit: UnitRef,
    incident_id: Option<IncidentId>,
) -> Result<(), PersistenceError> {
    let incident_id: Option<String> = incident_id.map(|id| id.to_string());
    let affected: usize = match unit {
        UnitRef::Primary(id) => diesel::update(units::table)
            .filter(units::unit_id.eq(id.to_string()))
            .set(units::active_incident_id.eq(incident_id))
            .execute(conn)?,
        UnitRef::Combined(id) => diesel::update(combined_units::table)
            .filter(combined_units::combined_unit_id.eq(id.to_string()))
            .set(combined_units::active_incident_id.eq(incident_id))
            .execute(conn)?,
    };
    expect_row(affected, "unit", unit)
}
