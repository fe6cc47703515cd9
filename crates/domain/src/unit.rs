// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{CallId, Discipline, IncidentId, StatusCodeId, UnitId, UnitRef};
use time::OffsetDateTime;

/// An officer or EMS/FD deputy.
///
/// A `status_id` of `None` means the unit is off duty, unless the unit is a
/// member of a combined unit, in which case duty is carried by the combined
/// unit and the member's own status stays cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryUnit {
    pub id: UnitId,
    pub discipline: Discipline,
    pub callsign: String,
    /// Secondary callsign. Used to derive the callsign of a combined unit.
    pub callsign2: String,
    /// The owning user. Status changes reset the owner's other units.
    pub user_id: String,
    pub status_id: Option<StatusCodeId>,
    pub suspended: bool,
    pub last_status_change_at: Option<OffsetDateTime>,
    pub active_call_id: Option<CallId>,
    pub active_incident_id: Option<IncidentId>,
}

impl PrimaryUnit {
    /// Creates a new off-duty unit.
    #[must_use]
    pub fn new(discipline: Discipline, callsign: &str, callsign2: &str, user_id: &str) -> Self {
        Self {
            id: UnitId::new(),
            discipline,
            callsign: callsign.to_string(),
            callsign2: callsign2.to_string(),
            user_id: user_id.to_string(),
            status_id: None,
            suspended: false,
            last_status_change_at: None,
            active_call_id: None,
            active_incident_id: None,
        }
    }

    #[must_use]
    pub const fn is_on_duty(&self) -> bool {
        self.status_id.is_some()
    }
}

/// Two or more primary units of one discipline acting under one callsign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedUnit {
    pub id: UnitId,
    pub discipline: Discipline,
    pub callsign: String,
    /// A combined unit only exists while on duty, so its status is never empty.
    pub status_id: StatusCodeId,
    pub members: Vec<UnitId>,
    pub last_status_change_at: Option<OffsetDateTime>,
    pub active_call_id: Option<CallId>,
    pub active_incident_id: Option<IncidentId>,
    pub created_at: OffsetDateTime,
}

impl CombinedUnit {
    #[must_use]
    pub fn contains(&self, unit_id: UnitId) -> bool {
        self.members.contains(&unit_id)
    }
}

/// A unit resolved from either identity space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Primary(PrimaryUnit),
    Combined(CombinedUnit),
}

impl Unit {
    #[must_use]
    pub const fn id(&self) -> UnitId {
        match self {
            Self::Primary(unit) => unit.id,
            Self::Combined(unit) => unit.id,
        }
    }

    #[must_use]
    pub const fn unit_ref(&self) -> UnitRef {
        match self {
            Self::Primary(unit) => UnitRef::Primary(unit.id),
            Self::Combined(unit) => UnitRef::Combined(unit.id),
        }
    }

    #[must_use]
    pub const fn discipline(&self) -> Discipline {
        match self {
            Self::Primary(unit) => unit.discipline,
            Self::Combined(unit) => unit.discipline,
        }
    }

    #[must_use]
    pub fn callsign(&self) -> &str {
        match self {
            Self::Primary(unit) => &unit.callsign,
            Self::Combined(unit) => &unit.callsign,
        }
    }

    #[must_use]
    pub const fn status_id(&self) -> Option<StatusCodeId> {
        match self {
            Self::Primary(unit) => unit.status_id,
            Self::Combined(unit) => Some(unit.status_id),
        }
    }

    #[must_use]
    pub const fn last_status_change_at(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Primary(unit) => unit.last_status_change_at,
            Self::Combined(unit) => unit.last_status_change_at,
        }
    }

    #[must_use]
    pub const fn active_call_id(&self) -> Option<CallId> {
        match self {
            Self::Primary(unit) => unit.active_call_id,
            Self::Combined(unit) => unit.active_call_id,
        }
    }

    #[must_use]
    pub const fn active_incident_id(&self) -> Option<IncidentId> {
        match self {
            Self::Primary(unit) => unit.active_incident_id,
            Self::Combined(unit) => unit.active_incident_id,
        }
    }
}
