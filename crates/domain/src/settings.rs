// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dispatch::TargetKind;
use serde::{Deserialize, Serialize};

/// Per-entity staleness timeouts, in minutes. `None` disables filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InactivityTimeouts {
    pub call_minutes: Option<u32>,
    pub incident_minutes: Option<u32>,
    pub unit_minutes: Option<u32>,
}

/// Engine configuration passed to every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadSettings {
    /// Prefix used when deriving a combined unit's callsign.
    pub paired_unit_symbol: String,
    /// Maximum simultaneous call assignments per unit. `None` disables the cap.
    pub max_call_assignments: Option<u32>,
    /// Maximum simultaneous incident assignments per unit. `None` disables the cap.
    pub max_incident_assignments: Option<u32>,
    pub inactivity: InactivityTimeouts,
}

impl CadSettings {
    /// Returns the assignment cap for a target kind.
    ///
    /// A configured cap of zero is treated as no cap.
    #[must_use]
    pub const fn assignment_cap(&self, kind: TargetKind) -> Option<u32> {
        let cap: Option<u32> = match kind {
            TargetKind::Call => self.max_call_assignments,
            TargetKind::Incident => self.max_incident_assignments,
        };
        match cap {
            Some(0) => None,
            other => other,
        }
    }
}

impl Default for CadSettings {
    fn default() -> Self {
        Self {
            paired_unit_symbol: String::from("1A"),
            max_call_assignments: Some(1),
            max_incident_assignments: Some(1),
            inactivity: InactivityTimeouts::default(),
        }
    }
}
