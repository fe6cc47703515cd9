// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Discipline, UnitId};
use std::collections::HashSet;

/// Longest accepted callsign, in characters.
pub const MAX_CALLSIGN_LENGTH: usize = 32;

/// Largest page a listing may request.
pub const MAX_PAGE_SIZE: u32 = 100;

const MAX_TEXT_LENGTH: usize = 2000;

/// A validated listing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u32,
    pub take: u32,
}

/// Validates a callsign.
///
/// # Arguments
///
/// * `callsign` - The callsign to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidCallsign` if the callsign is blank or longer
/// than [`MAX_CALLSIGN_LENGTH`].
pub fn validate_callsign(callsign: &str) -> Result<(), DomainError> {
    let trimmed: &str = callsign.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidCallsign(String::from(
            "Callsign cannot be empty",
        )));
    }

    let length: usize = trimmed.chars().count();
    if length > MAX_CALLSIGN_LENGTH {
        return Err(DomainError::InvalidCallsign(format!(
            "Callsign must be at most {MAX_CALLSIGN_LENGTH} characters, got {length}"
        )));
    }

    Ok(())
}

/// Validates a required free-text field such as a call location.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the value is blank or too long.
pub fn validate_required_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field,
            message: String::from("cannot be empty"),
        });
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(DomainError::InvalidField {
            field,
            message: format!("must be at most {MAX_TEXT_LENGTH} characters"),
        });
    }
    Ok(())
}

/// Validates the member list of a merge request.
///
/// At least two units are required and no unit may appear twice.
///
/// # Errors
///
/// Returns `DomainError::NotEnoughUnitsToMerge` or
/// `DomainError::DuplicateMergeMember`.
pub fn validate_merge_members(unit_ids: &[UnitId]) -> Result<(), DomainError> {
    if unit_ids.len() < 2 {
        return Err(DomainError::NotEnoughUnitsToMerge {
            count: unit_ids.len(),
        });
    }

    let mut seen: HashSet<UnitId> = HashSet::with_capacity(unit_ids.len());
    for unit_id in unit_ids {
        if !seen.insert(*unit_id) {
            return Err(DomainError::DuplicateMergeMember { unit_id: *unit_id });
        }
    }

    Ok(())
}

/// Validates that every unit shares one discipline.
///
/// The first entry sets the expected discipline. An empty slice is valid.
///
/// # Errors
///
/// Returns `DomainError::DisciplineMismatch` naming the first unit that differs.
pub fn validate_same_discipline(units: &[(UnitId, Discipline)]) -> Result<(), DomainError> {
    let Some((_, expected)) = units.first() else {
        return Ok(());
    };

    for (unit_id, found) in units {
        if found != expected {
            return Err(DomainError::DisciplineMismatch {
                unit_id: *unit_id,
                expected: *expected,
                found: *found,
            });
        }
    }

    Ok(())
}

/// Derives the callsign of a combined unit from the configured paired-unit
/// symbol and the acting unit's secondary callsign.
#[must_use]
pub fn derive_combined_callsign(paired_unit_symbol: &str, callsign2: &str) -> String {
    format!("{}{}", paired_unit_symbol.trim(), callsign2.trim())
}

/// Validates listing parameters. `take` defaults to [`MAX_PAGE_SIZE`].
///
/// # Errors
///
/// Returns `DomainError::InvalidPagination` if `take` is zero or exceeds
/// [`MAX_PAGE_SIZE`].
pub fn validate_pagination(
    skip: Option<u32>,
    take: Option<u32>,
) -> Result<Pagination, DomainError> {
    let take: u32 = take.unwrap_or(MAX_PAGE_SIZE);
    if take == 0 {
        return Err(DomainError::InvalidPagination(String::from(
            "take must be at least 1",
        )));
    }
    if take > MAX_PAGE_SIZE {
        return Err(DomainError::InvalidPagination(format!(
            "take must be at most {MAX_PAGE_SIZE}, got {take}"
        )));
    }

    Ok(Pagination {
        skip: skip.unwrap_or(0),
        take,
    })
}
