// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{DutyLogId, UnitId};
use time::OffsetDateTime;

/// A continuous on-duty interval of a primary unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyLog {
    pub id: DutyLogId,
    pub unit_id: UnitId,
    pub started_at: OffsetDateTime,
    /// `None` while the interval is still open.
    pub ended_at: Option<OffsetDateTime>,
}

impl DutyLog {
    #[must_use]
    pub fn open(unit_id: UnitId, started_at: OffsetDateTime) -> Self {
        Self {
            id: DutyLogId::new(),
            unit_id,
            started_at,
            ended_at: None,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}
