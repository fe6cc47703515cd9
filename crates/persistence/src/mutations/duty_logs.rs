// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::{DutyLog, DutyLogId};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;

use crate::data_models::{DutyLogRow, stamp};
use crate::diesel_schema::duty_logs;
use crate::error::PersistenceError;
use crate::mutations::expect_row;

/// Inserts a duty log.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the unit already has an
/// open log.
pub fn insert_duty_log(conn: &mut SqliteConnection, log: &DutyLog) -> Result<(), PersistenceError> {
    diesel::insert_into(duty_logs::table)
        .values(DutyLogRow::from_domain(log)?)
        .execute(conn)?;
    Ok(())
}

/// Stamps the end of a duty log.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the log does not exist.
pub fn close_duty_log(
    conn: &mut SqliteConnection,
    duty_log_id: DutyLogId,
    ended_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(duty_logs::table)
        .filter(duty_logs::duty_log_id.eq(duty_log_id.to_string()))
        .set(duty_logs::ended_at.eq(Some(stamp("duty_logs", ended_at)?)))
        .execute(conn)?;
    expect_row(affected, "duty log", duty_log_id)
}
