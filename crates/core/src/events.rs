// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repository::UnitRepository;
use crate::views::{CallView, IncidentView, TargetView, UnitView, target_view};
use cad_dispatch_domain::{AssignmentTarget, UnitId};
use serde::Serialize;

/// A state change broadcast to live dispatch sessions after commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DispatchEvent {
    UnitStatusChanged {
        unit: UnitView,
    },
    /// The unit's assignments or active pointers moved; its status did not.
    UnitUpdated {
        unit: UnitView,
    },
    PanicButton {
        unit: UnitView,
        /// True when entering a panic status, false when leaving one.
        on: bool,
    },
    CallUpdated {
        call: CallView,
    },
    IncidentUpdated {
        incident: IncidentView,
    },
    CombinedUnitCreated {
        unit: UnitView,
    },
    CombinedUnitDissolved {
        combined_unit_id: UnitId,
        members: Vec<UnitId>,
    },
}

impl DispatchEvent {
    /// The `type` tag this event serializes with.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnitStatusChanged { .. } => "unit_status_changed",
            Self::UnitUpdated { .. } => "unit_updated",
            Self::PanicButton { .. } => "panic_button",
            Self::CallUpdated { .. } => "call_updated",
            Self::IncidentUpdated { .. } => "incident_updated",
            Self::CombinedUnitCreated { .. } => "combined_unit_created",
            Self::CombinedUnitDissolved { .. } => "combined_unit_dissolved",
        }
    }
}

impl From<TargetView> for DispatchEvent {
    fn from(view: TargetView) -> Self {
        match view {
            TargetView::Call(call) => Self::CallUpdated { call },
            TargetView::Incident(incident) => Self::IncidentUpdated { incident },
        }
    }
}

/// The result of a successful engine operation.
///
/// Operations are atomic: the caller commits the surrounding transaction
/// and only then publishes `events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub events: Vec<DispatchEvent>,
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn new(value: T, events: Vec<DispatchEvent>) -> Self {
        Self { value, events }
    }
}

/// Calls and incidents whose assignments changed during an operation.
///
/// Each target is recorded once, in first-touched order.
#[derive(Debug, Default)]
pub(crate) struct TouchedTargets {
    targets: Vec<AssignmentTarget>,
}

impl TouchedTargets {
    pub(crate) fn insert(&mut self, target: AssignmentTarget) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    /// Bumps `updated_at` on every touched target and appends one update
    /// event per target to `events`.
    pub(crate) fn finish<R: UnitRepository + ?Sized>(
        self,
        repo: &mut R,
        at: time::OffsetDateTime,
        events: &mut Vec<DispatchEvent>,
    ) -> Result<(), CoreError> {
        for target in self.targets {
            repo.touch_target(target, at)?;
            events.push(DispatchEvent::from(target_view(repo, target)?));
        }
        Ok(())
    }
}
