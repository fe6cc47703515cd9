// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::StatusCode;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::StatusCodeRow;
use crate::diesel_schema::status_codes;
use crate::error::PersistenceError;

/// Inserts a status code into the catalog.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_status_code(
    conn: &mut SqliteConnection,
    status: &StatusCode,
) -> Result<(), PersistenceError> {
    diesel::insert_into(status_codes::table)
        .values(StatusCodeRow::from_domain(status))
        .execute(conn)?;
    debug!(status_id = %status.id, value = %status.value, "Inserted status code");
    Ok(())
}
