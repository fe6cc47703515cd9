// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::{Assignment, AssignmentTarget, UnitRef};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::stamp;
use crate::diesel_schema::{assigned_units, involved_units};
use crate::error::PersistenceError;

/// Splits a unit reference into the `(unit_id, combined_unit_id)` column pair.
fn unit_columns(unit: UnitRef) -> (Option<String>, Option<String>) {
    match unit {
        UnitRef::Primary(id) => (Some(id.to_string()), None),
        UnitRef::Combined(id) => (None, Some(id.to_string())),
    }
}

/// Inserts a join row into `assigned_units` or `involved_units`.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the unit is already on
/// the target.
pub fn insert_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
) -> Result<(), PersistenceError> {
    let (unit_id, combined_unit_id) = unit_columns(assignment.unit);
    let assignment_id: String = assignment.id.to_string();

    match assignment.target {
        AssignmentTarget::Call(call_id) => {
            diesel::insert_into(assigned_units::table)
                .values((
                    assigned_units::assignment_id.eq(assignment_id),
                    assigned_units::call_id.eq(call_id.to_string()),
                    assigned_units::unit_id.eq(unit_id),
                    assigned_units::combined_unit_id.eq(combined_unit_id),
                    assigned_units::created_at.eq(stamp("assigned_units", assignment.created_at)?),
                ))
                .execute(conn)?;
        }
        AssignmentTarget::Incident(incident_id) => {
            diesel::insert_into(involved_units::table)
                .values((
                    involved_units::assignment_id.eq(assignment_id),
                    involved_units::incident_id.eq(incident_id.to_string()),
                    involved_units::unit_id.eq(unit_id),
                    involved_units::combined_unit_id.eq(combined_unit_id),
                    involved_units::created_at.eq(stamp("involved_units", assignment.created_at)?),
                ))
                .execute(conn)?;
        }
    }

    debug!(
        assignment_id = %assignment.id,
        target = %assignment.target,
        unit = %assignment.unit,
        "Inserted assignment"
    );
    Ok(())
}

/// Deletes a join row.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
) -> Result<(), PersistenceError> {
    let assignment_id: String = assignment.id.to_string();
    match assignment.target {
        AssignmentTarget::Call(_) => {
            diesel::delete(
                assigned_units::table.filter(assigned_units::assignment_id.eq(assignment_id)),
            )
            .execute(conn)?;
        }
        AssignmentTarget::Incident(_) => {
            diesel::delete(
                involved_units::table.filter(involved_units::assignment_id.eq(assignment_id)),
            )
            .execute(conn)?;
        }
    }
    Ok(())
}
