// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::{DutyLog, UnitId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::DutyLogRow;
use crate::diesel_schema::duty_logs;
use crate::error::PersistenceError;

/// Retrieves the open duty log of a unit.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_open_duty_log(
    conn: &mut SqliteConnection,
    unit_id: UnitId,
) -> Result<Option<DutyLog>, PersistenceError> {
    duty_logs::table
        .filter(duty_logs::unit_id.eq(unit_id.to_string()))
        .filter(duty_logs::ended_at.is_null())
        .select(DutyLogRow::as_select())
        .first::<DutyLogRow>(conn)
        .optional()?
        .map(DutyLogRow::into_domain)
        .transpose()
}

/// Lists a unit's duty logs, most recent start first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_duty_logs(
    conn: &mut SqliteConnection,
    unit_id: UnitId,
) -> Result<Vec<DutyLog>, PersistenceError> {
    let rows: Vec<DutyLogRow> = duty_logs::table
        .filter(duty_logs::unit_id.eq(unit_id.to_string()))
        .select(DutyLogRow::as_select())
        .load(conn)?;

    // RFC 3339 text does not sort reliably once fractional seconds vary.
    let mut logs: Vec<DutyLog> = rows
        .into_iter()
        .map(DutyLogRow::into_domain)
        .collect::<Result<_, _>>()?;
    logs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    Ok(logs)
}
