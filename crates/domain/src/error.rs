// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Discipline, UnitId};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// An identifier could not be parsed.
    #[error("Invalid {kind} id '{value}'")]
    InvalidId {
        /// The kind of identifier (e.g. "unit", "call").
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
    /// Discipline string is not one of the known disciplines.
    #[error("Invalid discipline: {0}")]
    InvalidDiscipline(String),
    /// Status effect tag is not one of the known effects.
    #[error("Invalid status effect: {0}")]
    InvalidShouldDo(String),
    /// Listing filter is not one of `active`, `inactive` or `all`.
    #[error("Invalid active type: {0}. Must be 'active', 'inactive' or 'all'")]
    InvalidActiveType(String),
    /// Callsign is empty or too long.
    #[error("Invalid callsign: {0}")]
    InvalidCallsign(String),
    /// A required text field is empty or too long.
    #[error("Invalid {field}: {message}")]
    InvalidField {
        /// The field name.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
    /// A merge was requested with fewer than two units.
    #[error("At least 2 units are required to merge, got {count}")]
    NotEnoughUnitsToMerge {
        /// The number of units supplied.
        count: usize,
    },
    /// The same unit appears more than once in a merge request.
    #[error("Unit {unit_id} appears more than once in the merge request")]
    DuplicateMergeMember {
        /// The repeated unit.
        unit_id: UnitId,
    },
    /// Units of different disciplines cannot be merged.
    #[error("Unit {unit_id} is {found}, expected {expected}")]
    DisciplineMismatch {
        /// The offending unit.
        unit_id: UnitId,
        /// The discipline of the first unit in the request.
        expected: Discipline,
        /// The discipline of the offending unit.
        found: Discipline,
    },
    /// Pagination parameters are out of range.
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
    /// A stored or supplied timestamp could not be parsed or formatted.
    #[error("Invalid timestamp '{value}': {error}")]
    InvalidTimestamp {
        /// The offending value.
        value: String,
        /// The underlying parse/format error.
        error: String,
    },
}
