// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `UnitRepository` over a `SQLite` connection.

use cad_dispatch::{StoreError, UnitRepository};
use cad_dispatch_domain::{
    Assignment, AssignmentTarget, Call, CallId, CombinedUnit, DutyLog, DutyLogId, Incident,
    IncidentId, PrimaryUnit, ShouldDo, StatusCode, StatusCodeId, TargetKind, UnitId, UnitRef,
};
use diesel::SqliteConnection;
use time::OffsetDateTime;

use crate::{mutations, queries};

/// A repository borrowing a connection that is already inside a transaction.
///
/// Obtained through `Persistence::transaction`; it never commits on its own.
pub struct SqliteRepository<'conn> {
    conn: &'conn mut SqliteConnection,
}

impl<'conn> SqliteRepository<'conn> {
    pub(crate) const fn new(conn: &'conn mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl UnitRepository for SqliteRepository<'_> {
    fn find_unit(&mut self, id: UnitId) -> Result<Option<PrimaryUnit>, StoreError> {
        Ok(queries::units::find_unit(self.conn, id)?)
    }

    fn list_user_units(&mut self, user_id: &str) -> Result<Vec<PrimaryUnit>, StoreError> {
        Ok(queries::units::list_user_units(self.conn, user_id)?)
    }

    fn list_units(&mut self) -> Result<Vec<PrimaryUnit>, StoreError> {
        Ok(queries::units::list_units(self.conn)?)
    }

    fn insert_unit(&mut self, unit: &PrimaryUnit) -> Result<(), StoreError> {
        Ok(mutations::units::insert_unit(self.conn, unit)?)
    }

    fn update_unit_status(
        &mut self,
        id: UnitId,
        status_id: Option<StatusCodeId>,
        changed_at: OffsetDateTime,
    ) -> Result<(), StoreError> {
        Ok(mutations::units::update_unit_status(
            self.conn, id, status_id, changed_at,
        )?)
    }

    fn find_combined_unit(&mut self, id: UnitId) -> Result<Option<CombinedUnit>, StoreError> {
        Ok(queries::units::find_combined_unit(self.conn, id)?)
    }

    fn find_combined_unit_containing(
        &mut self,
        member_id: UnitId,
    ) -> Result<Option<CombinedUnit>, StoreError> {
        Ok(queries::units::find_combined_unit_containing(
            self.conn, member_id,
        )?)
    }

    fn list_combined_units(&mut self) -> Result<Vec<CombinedUnit>, StoreError> {
        Ok(queries::units::list_combined_units(self.conn)?)
    }

    fn any_merge_conflict(&mut self, ids: &[UnitId]) -> Result<bool, StoreError> {
        Ok(queries::units::any_merge_conflict(self.conn, ids)?)
    }

    fn insert_combined_unit(&mut self, unit: &CombinedUnit) -> Result<(), StoreError> {
        Ok(mutations::units::insert_combined_unit(self.conn, unit)?)
    }

    fn update_combined_status(
        &mut self,
        id: UnitId,
        status_id: StatusCodeId,
        changed_at: OffsetDateTime,
    ) -> Result<(), StoreError> {
        Ok(mutations::units::update_combined_status(
            self.conn, id, status_id, changed_at,
        )?)
    }

    fn delete_combined_unit(&mut self, id: UnitId) -> Result<(), StoreError> {
        Ok(mutations::units::delete_combined_unit(self.conn, id)?)
    }

    fn set_active_call(
        &mut self,
        unit: UnitRef,
        call_id: Option<CallId>,
    ) -> Result<(), StoreError> {
        Ok(mutations::units::set_active_call(self.conn, unit, call_id)?)
    }

    fn set_active_incident(
        &mut self,
        unit: UnitRef,
        incident_id: Option<IncidentId>,
    ) -> Result<(), StoreError> {
        Ok(mutations::units::set_active_incident(
            self.conn,
            unit,
            incident_id,
        )?)
    }

    fn find_status_code(&mut self, id: StatusCodeId) -> Result<Option<StatusCode>, StoreError> {
        Ok(queries::status_codes::find_status_code(self.conn, id)?)
    }

    fn first_status_with_effect(
        &mut self,
        should_do: ShouldDo,
    ) -> Result<Option<StatusCode>, StoreError> {
        Ok(queries::status_codes::first_status_with_effect(
            self.conn, should_do,
        )?)
    }

    fn list_status_codes(&mut self) -> Result<Vec<StatusCode>, StoreError> {
        Ok(queries::status_codes::list_status_codes(self.conn)?)
    }

    fn insert_status_code(&mut self, status: &StatusCode) -> Result<(), StoreError> {
        Ok(mutations::status_codes::insert_status_code(
            self.conn, status,
        )?)
    }

    fn find_open_duty_log(&mut self, unit_id: UnitId) -> Result<Option<DutyLog>, StoreError> {
        Ok(queries::duty_logs::find_open_duty_log(self.conn, unit_id)?)
    }

    fn insert_duty_log(&mut self, log: &DutyLog) -> Result<(), StoreError> {
        Ok(mutations::duty_logs::insert_duty_log(self.conn, log)?)
    }

    fn close_duty_log(
        &mut self,
        id: DutyLogId,
        ended_at: OffsetDateTime,
    ) -> Result<(), StoreError> {
        Ok(mutations::duty_logs::close_duty_log(
            self.conn, id, ended_at,
        )?)
    }

    fn list_duty_logs(&mut self, unit_id: UnitId) -> Result<Vec<DutyLog>, StoreError> {
        Ok(queries::duty_logs::list_duty_logs(self.conn, unit_id)?)
    }

    fn find_assignment(
        &mut self,
        target: AssignmentTarget,
        unit: UnitRef,
    ) -> Result<Option<Assignment>, StoreError> {
        Ok(queries::assignments::find_assignment(
            self.conn, target, unit,
        )?)
    }

    fn list_unit_assignments(
        &mut self,
        unit: UnitRef,
        kind: TargetKind,
    ) -> Result<Vec<Assignment>, StoreError> {
        Ok(queries::assignments::list_unit_assignments(
            self.conn, unit, kind,
        )?)
    }

    fn list_target_assignments(
        &mut self,
        target: AssignmentTarget,
    ) -> Result<Vec<Assignment>, StoreError> {
        Ok(queries::assignments::list_target_assignments(
            self.conn, target,
        )?)
    }

    fn insert_assignment(&mut self, assignment: &Assignment) -> Result<(), StoreError> {
        Ok(mutations::assignments::insert_assignment(
            self.conn, assignment,
        )?)
    }

    fn delete_assignment(&mut self, assignment: &Assignment) -> Result<(), StoreError> {
        Ok(mutations::assignments::delete_assignment(
            self.conn, assignment,
        )?)
    }

    fn find_call(&mut self, id: CallId) -> Result<Option<Call>, StoreError> {
        Ok(queries::dispatch::find_call(self.conn, id)?)
    }

    fn list_calls(&mut self) -> Result<Vec<Call>, StoreError> {
        Ok(queries::dispatch::list_calls(self.conn)?)
    }

    fn insert_call(
        &mut self,
        location: &str,
        description: Option<&str>,
        created_at: OffsetDateTime,
    ) -> Result<Call, StoreError> {
        Ok(mutations::dispatch::insert_call(
            self.conn,
            location,
            description,
            created_at,
        )?)
    }

    fn end_call(&mut self, id: CallId, at: OffsetDateTime) -> Result<(), StoreError> {
        Ok(mutations::dispatch::end_call(self.conn, id, at)?)
    }

    fn find_incident(&mut self, id: IncidentId) -> Result<Option<Incident>, StoreError> {
        Ok(queries::dispatch::find_incident(self.conn, id)?)
    }

    fn list_incidents(&mut self) -> Result<Vec<Incident>, StoreError> {
        Ok(queries::dispatch::list_incidents(self.conn)?)
    }

    fn insert_incident(
        &mut self,
        description: &str,
        created_at: OffsetDateTime,
    ) -> Result<Incident, StoreError> {
        Ok(mutations::dispatch::insert_incident(
            self.conn,
            description,
            created_at,
        )?)
    }

    fn end_incident(&mut self, id: IncidentId, at: OffsetDateTime) -> Result<(), StoreError> {
        Ok(mutations::dispatch::end_incident(self.conn, id, at)?)
    }

    fn touch_target(
        &mut self,
        target: AssignmentTarget,
        at: OffsetDateTime,
    ) -> Result<(), StoreError> {
        Ok(mutations::dispatch::touch_target(self.conn, target, at)?)
    }
}
