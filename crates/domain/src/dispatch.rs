// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{AssignmentId, CallId, IncidentId, UnitRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The kind of entity a unit can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Call,
    Incident,
}

impl TargetKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Incident => "incident",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A call or incident a unit is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AssignmentTarget {
    Call(CallId),
    Incident(IncidentId),
}

impl AssignmentTarget {
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Call(_) => TargetKind::Call,
            Self::Incident(_) => TargetKind::Incident,
        }
    }
}

impl std::fmt::Display for AssignmentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call(id) => write!(f, "call {id}"),
            Self::Incident(id) => write!(f, "incident {id}"),
        }
    }
}

/// A 911 call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub id: CallId,
    /// Store-assigned, increasing per table.
    pub case_number: i64,
    pub location: String,
    pub description: Option<String>,
    pub ended: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// An incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub id: IncidentId,
    pub case_number: i64,
    pub description: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A join row linking one unit to one call or incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub target: AssignmentTarget,
    pub unit: UnitRef,
    pub created_at: OffsetDateTime,
}
