// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-time staleness policy.
//!
//! Records whose last activity is older than a configured timeout are
//! treated as implicitly inactive when listing. Nothing here mutates state.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// Returns true iff a timeout is configured and `last_touched` is older
/// than `now - timeout_minutes`.
#[must_use]
pub fn is_stale(
    last_touched: OffsetDateTime,
    timeout_minutes: Option<u32>,
    now: OffsetDateTime,
) -> bool {
    timeout_minutes.is_some_and(|minutes| {
        last_touched < now - Duration::minutes(i64::from(minutes))
    })
}

/// Listing filter selecting active, inactive, or all records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveType {
    #[default]
    Active,
    Inactive,
    All,
}

impl ActiveType {
    /// Whether a record with the given effective activity passes the filter.
    #[must_use]
    pub const fn includes(&self, is_active: bool) -> bool {
        match self {
            Self::Active => is_active,
            Self::Inactive => !is_active,
            Self::All => true,
        }
    }
}

impl FromStr for ActiveType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "all" => Ok(Self::All),
            _ => Err(DomainError::InvalidActiveType(s.to_string())),
        }
    }
}
