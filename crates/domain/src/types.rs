// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Generates a UUID-backed identifier newtype.
///
/// Every generated type serializes as the hyphenated UUID string and
/// parses from the same representation.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parses an identifier from its string form.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::InvalidId` if the value is not a UUID.
            pub fn parse(value: &str) -> Result<Self, DomainError> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| DomainError::InvalidId {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }
    };
}

entity_id!(
    /// Identifies a unit. Primary and combined units share this identity space.
    UnitId,
    "unit"
);
entity_id!(
    /// Identifies a 911 call.
    CallId,
    "call"
);
entity_id!(
    /// Identifies an incident.
    IncidentId,
    "incident"
);
entity_id!(
    /// Identifies a configured status code.
    StatusCodeId,
    "status code"
);
entity_id!(
    /// Identifies a duty log row.
    DutyLogId,
    "duty log"
);
entity_id!(
    /// Identifies an assignment join row.
    AssignmentId,
    "assignment"
);

/// The service a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discipline {
    /// Law enforcement.
    #[serde(rename = "LEO")]
    Leo,
    /// EMS / fire department.
    #[serde(rename = "EMS_FD")]
    EmsFd,
}

impl Discipline {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Leo => "LEO",
            Self::EmsFd => "EMS_FD",
        }
    }

    /// Returns a human readable label used in notifications.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Leo => "Officer",
            Self::EmsFd => "EMS/FD Deputy",
        }
    }
}

impl FromStr for Discipline {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEO" => Ok(Self::Leo),
            "EMS_FD" => Ok(Self::EmsFd),
            _ => Err(DomainError::InvalidDiscipline(s.to_string())),
        }
    }
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reference to a unit in one of its identity spaces.
///
/// Assignment rows, active pointers and status writes are all keyed by
/// this reference so the primary/combined distinction is never implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum UnitRef {
    /// An officer or EMS/FD deputy.
    Primary(UnitId),
    /// A combined unit.
    Combined(UnitId),
}

impl UnitRef {
    /// Returns the identifier regardless of identity space.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        match self {
            Self::Primary(id) | Self::Combined(id) => *id,
        }
    }

    /// Returns true for combined-unit references.
    #[must_use]
    pub const fn is_combined(&self) -> bool {
        matches!(self, Self::Combined(_))
    }
}

impl std::fmt::Display for UnitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary(id) => write!(f, "unit {id}"),
            Self::Combined(id) => write!(f, "combined unit {id}"),
        }
    }
}

/// Formats a timestamp as RFC 3339 text, the representation used for
/// persistence and API payloads.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimestamp` if the timestamp cannot be formatted.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, DomainError> {
    timestamp
        .format(&Rfc3339)
        .map_err(|e| DomainError::InvalidTimestamp {
            value: timestamp.to_string(),
            error: e.to_string(),
        })
}

/// Parses an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimestamp` if the value is not valid RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| DomainError::InvalidTimestamp {
        value: value.to_string(),
        error: e.to_string(),
    })
}
