// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Mutations never open or commit a transaction; `Persistence::transaction`
//! wraps each engine operation in one.

pub mod assignments;
pub mod dispatch;
pub mod duty_logs;
pub mod status_codes;
pub mod units;

use crate::error::PersistenceError;

/// Maps an update that touched no rows to `PersistenceError::NotFound`.
pub(crate) fn expect_row(
    affected: usize,
    entity: &'static str,
    id: impl ToString,
) -> Result<(), PersistenceError> {
    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity,
            id: id.to_string(),
        });
    }
    Ok(())
}
