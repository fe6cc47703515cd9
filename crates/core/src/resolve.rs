// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repository::UnitRepository;
use cad_dispatch_domain::{CombinedUnit, PrimaryUnit, UnitId, UnitRef};
use tracing::debug;

/// A unit id resolved against both identity spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedUnit {
    /// An independent primary unit.
    Primary(PrimaryUnit),
    /// A primary unit currently folded into a combined unit.
    Member {
        unit: PrimaryUnit,
        combined: CombinedUnit,
    },
    Combined(CombinedUnit),
}

impl ResolvedUnit {
    /// The reference under which this unit's own rows are keyed.
    #[must_use]
    pub const fn unit_ref(&self) -> UnitRef {
        match self {
            Self::Primary(unit) | Self::Member { unit, .. } => UnitRef::Primary(unit.id),
            Self::Combined(unit) => UnitRef::Combined(unit.id),
        }
    }
}

/// Resolves an id against primary units first, then combined units.
///
/// Every operation that accepts a unit id goes through here.
///
/// # Errors
///
/// Returns `CoreError::UnitNotFound` if neither identity space has the id.
pub fn resolve_unit<R: UnitRepository + ?Sized>(
    repo: &mut R,
    id: UnitId,
) -> Result<ResolvedUnit, CoreError> {
    if let Some(unit) = repo.find_unit(id)? {
        let resolved: ResolvedUnit = match repo.find_combined_unit_containing(id)? {
            Some(combined) => ResolvedUnit::Member { unit, combined },
            None => ResolvedUnit::Primary(unit),
        };
        debug!(unit_id = %id, unit_ref = %resolved.unit_ref(), "Resolved unit");
        return Ok(resolved);
    }

    if let Some(combined) = repo.find_combined_unit(id)? {
        debug!(unit_id = %id, "Resolved combined unit");
        return Ok(ResolvedUnit::Combined(combined));
    }

    Err(CoreError::UnitNotFound(id))
}
