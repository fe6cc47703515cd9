// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::StatusCodeId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The behavioral effect attached to a status code.
///
/// Everything except `SetOffDuty` places the unit on duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShouldDo {
    SetOnDuty,
    SetOffDuty,
    SetAssigned,
    SetStatus,
    PanicButton,
    EnRoute,
    OnScene,
    Unavailable,
}

impl ShouldDo {
    /// Returns the persisted tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SetOnDuty => "SET_ON_DUTY",
            Self::SetOffDuty => "SET_OFF_DUTY",
            Self::SetAssigned => "SET_ASSIGNED",
            Self::SetStatus => "SET_STATUS",
            Self::PanicButton => "PANIC_BUTTON",
            Self::EnRoute => "EN_ROUTE",
            Self::OnScene => "ON_SCENE",
            Self::Unavailable => "UNAVAILABLE",
        }
    }

    #[must_use]
    pub const fn is_off_duty(&self) -> bool {
        matches!(self, Self::SetOffDuty)
    }

    #[must_use]
    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::PanicButton)
    }
}

impl FromStr for ShouldDo {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SET_ON_DUTY" => Ok(Self::SetOnDuty),
            "SET_OFF_DUTY" => Ok(Self::SetOffDuty),
            "SET_ASSIGNED" => Ok(Self::SetAssigned),
            "SET_STATUS" => Ok(Self::SetStatus),
            "PANIC_BUTTON" => Ok(Self::PanicButton),
            "EN_ROUTE" => Ok(Self::EnRoute),
            "ON_SCENE" => Ok(Self::OnScene),
            "UNAVAILABLE" => Ok(Self::Unavailable),
            _ => Err(DomainError::InvalidShouldDo(s.to_string())),
        }
    }
}

impl std::fmt::Display for ShouldDo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configured status code. Reference data; never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    pub id: StatusCodeId,
    /// Human label shown to dispatchers (e.g. "10-8").
    pub value: String,
    pub should_do: ShouldDo,
    pub color: Option<String>,
    /// Catalog order. Lower positions sort first.
    pub position: i32,
}

impl StatusCode {
    #[must_use]
    pub fn new(value: &str, should_do: ShouldDo, color: Option<String>, position: i32) -> Self {
        Self {
            id: StatusCodeId::new(),
            value: value.to_string(),
            should_do,
            color,
            position,
        }
    }

    /// Whether assigning this status puts the unit off duty.
    #[must_use]
    pub const fn is_off_duty(&self) -> bool {
        self.should_do.is_off_duty()
    }
}
