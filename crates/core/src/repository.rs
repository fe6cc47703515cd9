// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The record-store seam.
//!
//! Every engine operation runs against a `UnitRepository` that is already
//! scoped to one write transaction. Implementations must not commit on their
//! own; the caller commits once the operation returns `Ok`.

use cad_dispatch_domain::{
    Assignment, AssignmentTarget, Call, CallId, CombinedUnit, DutyLog, DutyLogId, Incident,
    IncidentId, PrimaryUnit, ShouldDo, StatusCode, StatusCodeId, TargetKind, UnitId, UnitRef,
};
use time::OffsetDateTime;

/// Failures reported by a record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness or check constraint rejected the write.
    #[error("Constraint violated: {constraint}")]
    Conflict {
        /// Name or description of the violated constraint.
        constraint: String,
    },
    /// A row that was expected to exist is missing.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of row.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// Any other backend failure.
    #[error("Store failure: {0}")]
    Backend(String),
}

/// Record-store operations needed by the coordination engine.
///
/// Lists of assignments are always returned oldest first.
pub trait UnitRepository {
    // Primary units

    /// Looks up a primary unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_unit(&mut self, id: UnitId) -> Result<Option<PrimaryUnit>, StoreError>;

    /// Lists every primary unit owned by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_user_units(&mut self, user_id: &str) -> Result<Vec<PrimaryUnit>, StoreError>;

    /// Lists all primary units.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_units(&mut self) -> Result<Vec<PrimaryUnit>, StoreError>;

    /// Inserts a primary unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn insert_unit(&mut self, unit: &PrimaryUnit) -> Result<(), StoreError>;

    /// Writes a primary unit's status and status-change timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the unit does not exist.
    fn update_unit_status(
        &mut self,
        id: UnitId,
        status_id: Option<StatusCodeId>,
        changed_at: OffsetDateTime,
    ) -> Result<(), StoreError>;

    // Combined units

    /// Looks up a combined unit with its members.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_combined_unit(&mut self, id: UnitId) -> Result<Option<CombinedUnit>, StoreError>;

    /// Finds the combined unit a primary unit currently belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_combined_unit_containing(
        &mut self,
        member_id: UnitId,
    ) -> Result<Option<CombinedUnit>, StoreError>;

    /// Lists all combined units.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_combined_units(&mut self) -> Result<Vec<CombinedUnit>, StoreError>;

    /// Returns true if any id is already a combined-unit member or is itself
    /// a combined unit. Answered with a single query.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn any_merge_conflict(&mut self, ids: &[UnitId]) -> Result<bool, StoreError>;

    /// Inserts a combined unit and its membership rows.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a member already belongs to another
    /// combined unit.
    fn insert_combined_unit(&mut self, unit: &CombinedUnit) -> Result<(), StoreError>;

    /// Writes a combined unit's status and status-change timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the combined unit does not exist.
    fn update_combined_status(
        &mut self,
        id: UnitId,
        status_id: StatusCodeId,
        changed_at: OffsetDateTime,
    ) -> Result<(), StoreError>;

    /// Deletes a combined unit and its membership rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete_combined_unit(&mut self, id: UnitId) -> Result<(), StoreError>;

    // Active pointers

    /// Sets or clears a unit's active call.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the unit does not exist.
    fn set_active_call(&mut self, unit: UnitRef, call_id: Option<CallId>)
    -> Result<(), StoreError>;

    /// Sets or clears a unit's active incident.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the unit does not exist.
    fn set_active_incident(
        &mut self,
        unit: UnitRef,
        incident_id: Option<IncidentId>,
    ) -> Result<(), StoreError>;

    // Status catalog

    /// Looks up a status code.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_status_code(&mut self, id: StatusCodeId) -> Result<Option<StatusCode>, StoreError>;

    /// Returns the first status code (by catalog position) with an effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn first_status_with_effect(
        &mut self,
        should_do: ShouldDo,
    ) -> Result<Option<StatusCode>, StoreError>;

    /// Lists the status catalog in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_status_codes(&mut self) -> Result<Vec<StatusCode>, StoreError>;

    /// Inserts a status code.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn insert_status_code(&mut self, status: &StatusCode) -> Result<(), StoreError>;

    // Duty logs

    /// Returns the open duty log of a primary unit, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_open_duty_log(&mut self, unit_id: UnitId) -> Result<Option<DutyLog>, StoreError>;

    /// Inserts a duty log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the unit already has an open log.
    fn insert_duty_log(&mut self, log: &DutyLog) -> Result<(), StoreError>;

    /// Closes a duty log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the log does not exist.
    fn close_duty_log(&mut self, id: DutyLogId, ended_at: OffsetDateTime)
    -> Result<(), StoreError>;

    /// Lists a unit's duty logs, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_duty_logs(&mut self, unit_id: UnitId) -> Result<Vec<DutyLog>, StoreError>;

    // Assignments

    /// Looks up the join row between a target and a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_assignment(
        &mut self,
        target: AssignmentTarget,
        unit: UnitRef,
    ) -> Result<Option<Assignment>, StoreError>;

    /// Lists a unit's assignments of one kind, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_unit_assignments(
        &mut self,
        unit: UnitRef,
        kind: TargetKind,
    ) -> Result<Vec<Assignment>, StoreError>;

    /// Lists the assignments attached to a target, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_target_assignments(
        &mut self,
        target: AssignmentTarget,
    ) -> Result<Vec<Assignment>, StoreError>;

    /// Inserts a join row.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the unit is already attached to the target.
    fn insert_assignment(&mut self, assignment: &Assignment) -> Result<(), StoreError>;

    /// Deletes a join row.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete_assignment(&mut self, assignment: &Assignment) -> Result<(), StoreError>;

    // Calls and incidents

    /// Looks up a call.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_call(&mut self, id: CallId) -> Result<Option<Call>, StoreError>;

    /// Lists all calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_calls(&mut self) -> Result<Vec<Call>, StoreError>;

    /// Inserts a call, assigning the next case number.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn insert_call(
        &mut self,
        location: &str,
        description: Option<&str>,
        created_at: OffsetDateTime,
    ) -> Result<Call, StoreError>;

    /// Marks a call ended.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the call does not exist.
    fn end_call(&mut self, id: CallId, at: OffsetDateTime) -> Result<(), StoreError>;

    /// Looks up an incident.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_incident(&mut self, id: IncidentId) -> Result<Option<Incident>, StoreError>;

    /// Lists all incidents.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_incidents(&mut self) -> Result<Vec<Incident>, StoreError>;

    /// Inserts an incident, assigning the next case number.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn insert_incident(
        &mut self,
        description: &str,
        created_at: OffsetDateTime,
    ) -> Result<Incident, StoreError>;

    /// Marks an incident inactive.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the incident does not exist.
    fn end_incident(&mut self, id: IncidentId, at: OffsetDateTime) -> Result<(), StoreError>;

    /// Bumps a call's or incident's `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the target does not exist.
    fn touch_target(
        &mut self,
        target: AssignmentTarget,
        at: OffsetDateTime,
    ) -> Result<(), StoreError>;
}
