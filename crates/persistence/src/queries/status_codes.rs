// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::{ShouldDo, StatusCode, StatusCodeId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::StatusCodeRow;
use crate::diesel_schema::status_codes;
use crate::error::PersistenceError;

/// Retrieves a status code.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_status_code(
    conn: &mut SqliteConnection,
    status_id: StatusCodeId,
) -> Result<Option<StatusCode>, PersistenceError> {
    status_codes::table
        .filter(status_codes::status_code_id.eq(status_id.to_string()))
        .select(StatusCodeRow::as_select())
        .first::<StatusCodeRow>(conn)
        .optional()?
        .map(StatusCodeRow::into_domain)
        .transpose()
}

/// Retrieves the lowest-positioned status code with the given effect.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn first_status_with_effect(
    conn: &mut SqliteConnection,
    should_do: ShouldDo,
) -> Result<Option<StatusCode>, PersistenceError> {
    status_codes::table
        .filter(status_codes::should_do.eq(should_do.as_str()))
        .order((status_codes::position.asc(), status_codes::value.asc()))
        .select(StatusCodeRow::as_select())
        .first::<StatusCodeRow>(conn)
        .optional()?
        .map(StatusCodeRow::into_domain)
        .transpose()
}

/// Lists the catalog in position order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_status_codes(conn: &mut SqliteConnection) -> Result<Vec<StatusCode>, PersistenceError> {
    let rows: Vec<StatusCodeRow> = status_codes::table
        .order((status_codes::position.asc(), status_codes::value.asc()))
        .select(StatusCodeRow::as_select())
        .load(conn)?;
    rows.into_iter().map(StatusCodeRow::into_domain).collect()
}
