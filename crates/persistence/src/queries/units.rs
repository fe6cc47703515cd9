// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;

use cad_dispatch_domain::{CombinedUnit, PrimaryUnit, UnitId};
use diesel::SqliteConnection;
use diesel::dsl::exists;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{CombinedUnitRow, UnitRow, read_member_id};
use crate::diesel_schema::{combined_unit_members, combined_units, units};
use crate::error::PersistenceError;

/// Retrieves a primary unit.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_unit(
    conn: &mut SqliteConnection,
    unit_id: UnitId,
) -> Result<Option<PrimaryUnit>, PersistenceError> {
    units::table
        .filter(units::unit_id.eq(unit_id.to_string()))
        .select(UnitRow::as_select())
        .first::<UnitRow>(conn)
        .optional()?
        .map(UnitRow::into_domain)
        .transpose()
}

/// Lists every primary unit owned by `user_id`.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_user_units(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<PrimaryUnit>, PersistenceError> {
    let rows: Vec<UnitRow> = units::table
        .filter(units::user_id.eq(user_id))
        .order(units::callsign.asc())
        .select(UnitRow::as_select())
        .load(conn)?;
    debug!(user_id, count = rows.len(), "Loaded user units");
    rows.into_iter().map(UnitRow::into_domain).collect()
}

/// Lists all primary units by callsign.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_units(conn: &mut SqliteConnection) -> Result<Vec<PrimaryUnit>, PersistenceError> {
    let rows: Vec<UnitRow> = units::table
        .order(units::callsign.asc())
        .select(UnitRow::as_select())
        .load(conn)?;
    rows.into_iter().map(UnitRow::into_domain).collect()
}

fn member_ids(
    conn: &mut SqliteConnection,
    combined_unit_id: &str,
) -> Result<Vec<UnitId>, PersistenceError> {
    let ids: Vec<String> = combined_unit_members::table
        .filter(combined_unit_members::combined_unit_id.eq(combined_unit_id))
        .order(combined_unit_members::position.asc())
        .select(combined_unit_members::unit_id)
        .load(conn)?;
    ids.iter().map(|id| read_member_id(id)).collect()
}

/// Retrieves a combined unit with its members in merge order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn find_combined_unit(
    conn: &mut SqliteConnection,
    combined_unit_id: UnitId,
) -> Result<Option<CombinedUnit>, PersistenceError> {
    let id: String = combined_unit_id.to_string();
    let row: Option<CombinedUnitRow> = combined_units::table
        .filter(combined_units::combined_unit_id.eq(&id))
        .select(CombinedUnitRow::as_select())
        .first(conn)
        .optional()?;

    match row {
        Some(row) => {
            let members: Vec<UnitId> = member_ids(conn, &id)?;
            Ok(Some(row.into_domain(members)?))
        }
        None => Ok(None),
    }
}

/// Retrieves the combined unit `member_id` belongs to.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn find_combined_unit_containing(
    conn: &mut SqliteConnection,
    member_id: UnitId,
) -> Result<Option<CombinedUnit>, PersistenceError> {
    let combined_unit_id: Option<String> = combined_unit_members::table
        .filter(combined_unit_members::unit_id.eq(member_id.to_string()))
        .select(combined_unit_members::combined_unit_id)
        .first(conn)
        .optional()?;

    match combined_unit_id {
        Some(id) => find_combined_unit(conn, read_member_id(&id)?),
        None => Ok(None),
    }
}

/// Lists all combined units by callsign.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_combined_units(
    conn: &mut SqliteConnection,
) -> Result<Vec<CombinedUnit>, PersistenceError> {
    let rows: Vec<CombinedUnitRow> = combined_units::table
        .order(combined_units::callsign.asc())
        .select(CombinedUnitRow::as_select())
        .load(conn)?;

    let memberships: Vec<(String, String)> = combined_unit_members::table
        .order((
            combined_unit_members::combined_unit_id.asc(),
            combined_unit_members::position.asc(),
        ))
        .select((
            combined_unit_members::combined_unit_id,
            combined_unit_members::unit_id,
        ))
        .load(conn)?;

    let mut members_by_unit: HashMap<String, Vec<UnitId>> = HashMap::new();
    for (combined_unit_id, unit_id) in memberships {
        members_by_unit
            .entry(combined_unit_id)
            .or_default()
            .push(read_member_id(&unit_id)?);
    }

    rows.into_iter()
        .map(|row| {
            let members: Vec<UnitId> = members_by_unit
                .remove(&row.combined_unit_id)
                .unwrap_or_default();
            row.into_domain(members)
        })
        .collect()
}

/// Returns true if any id is already a combined-unit member or is itself a
/// combined unit, in one round trip.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn any_merge_conflict(
    conn: &mut SqliteConnection,
    ids: &[UnitId],
) -> Result<bool, PersistenceError> {
    let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
    let conflict: bool = diesel::select(
        exists(combined_unit_members::table.filter(combined_unit_members::unit_id.eq_any(&ids)))
            .or(exists(
                combined_units::table.filter(combined_units::combined_unit_id.eq_any(&ids)),
            )),
    )
    .get_result(conn)?;
    Ok(conflict)
}
