// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::memory::MemoryRepository;
use crate::{
    CoreError, MergeRequest, Outcome, StatusChange, TargetView, UnitView, assign_unit, create_call,
    create_incident, create_status_code, create_unit, merge_units, set_unit_status,
};
use cad_dispatch_domain::{
    AssignmentTarget, CadSettings, CallId, Discipline, IncidentId, ShouldDo, StatusCodeId, UnitId,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub const T0: OffsetDateTime = datetime!(2026-05-01 08:00 UTC);

pub fn at(minutes: i64) -> OffsetDateTime {
    T0 + Duration::minutes(minutes)
}

fn seed_status(
    repo: &mut MemoryRepository,
    value: &str,
    should_do: ShouldDo,
    position: i32,
) -> StatusCodeId {
    create_status_code(repo, value, should_do, None, position)
        .unwrap()
        .id
}

/// A seeded repository with a small status catalog.
pub struct Fixture {
    pub repo: MemoryRepository,
    pub settings: CadSettings,
    pub on_duty: StatusCodeId,
    pub off_duty: StatusCodeId,
    pub en_route: StatusCodeId,
    pub panic: StatusCodeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut repo: MemoryRepository = MemoryRepository::default();
        let on_duty: StatusCodeId = seed_status(&mut repo, "10-8", ShouldDo::SetOnDuty, 1);
        let off_duty: StatusCodeId = seed_status(&mut repo, "10-7", ShouldDo::SetOffDuty, 2);
        let en_route: StatusCodeId = create_status_code(
            &mut repo,
            "10-97",
            ShouldDo::EnRoute,
            Some(String::from("#3498db")),
            3,
        )
        .unwrap()
        .id;
        let panic: StatusCodeId = seed_status(&mut repo, "PANIC", ShouldDo::PanicButton, 4);

        Self {
            repo,
            settings: CadSettings::default(),
            on_duty,
            off_duty,
            en_route,
            panic,
        }
    }

    pub fn add_unit(&mut self, callsign: &str, user_id: &str) -> UnitId {
        self.add_unit_with(Discipline::Leo, callsign, user_id)
    }

    pub fn add_unit_with(
        &mut self,
        discipline: Discipline,
        callsign: &str,
        user_id: &str,
    ) -> UnitId {
        let callsign2: String = callsign.chars().filter(char::is_ascii_digit).collect();
        create_unit(&mut self.repo, discipline, callsign, &callsign2, user_id)
            .unwrap()
            .id
    }

    /// Adds a unit and puts it on duty.
    pub fn add_on_duty_unit(&mut self, callsign: &str, user_id: &str) -> UnitId {
        let id: UnitId = self.add_unit(callsign, user_id);
        self.set_status(id, self.on_duty).unwrap();
        id
    }

    pub fn set_status(
        &mut self,
        unit_id: UnitId,
        status_id: StatusCodeId,
    ) -> Result<Outcome<UnitView>, CoreError> {
        self.change_status(unit_id, status_id, false)
    }

    pub fn dispatch_status(
        &mut self,
        unit_id: UnitId,
        status_id: StatusCodeId,
    ) -> Result<Outcome<UnitView>, CoreError> {
        self.change_status(unit_id, status_id, true)
    }

    fn change_status(
        &mut self,
        unit_id: UnitId,
        status_id: StatusCodeId,
        is_dispatch: bool,
    ) -> Result<Outcome<UnitView>, CoreError> {
        let change: StatusChange = StatusChange {
            unit_id,
            status_id,
            requested_by: String::from("tester"),
            is_dispatch,
        };
        set_unit_status(&mut self.repo, &change, at(1))
    }

    pub fn merge(
        &mut self,
        unit_ids: &[UnitId],
        acting_unit_id: UnitId,
    ) -> Result<Outcome<UnitView>, CoreError> {
        let request: MergeRequest = MergeRequest {
            unit_ids: unit_ids.to_vec(),
            acting_unit_id,
        };
        merge_units(&mut self.repo, &self.settings, &request, at(2))
    }

    pub fn add_call(&mut self) -> CallId {
        create_call(
            &mut self.repo,
            "Main St & 1st Ave",
            Some("Vehicle fire"),
            T0,
        )
        .unwrap()
        .id
    }

    pub fn add_incident(&mut self) -> IncidentId {
        create_incident(&mut self.repo, "Structure fire", T0)
            .unwrap()
            .id
    }

    pub fn assign(
        &mut self,
        target: AssignmentTarget,
        unit_id: UnitId,
        force: bool,
    ) -> Result<Outcome<TargetView>, CoreError> {
        self.assign_at(target, unit_id, force, at(3))
    }

    pub fn assign_at(
        &mut self,
        target: AssignmentTarget,
        unit_id: UnitId,
        force: bool,
        now: OffsetDateTime,
    ) -> Result<Outcome<TargetView>, CoreError> {
        assign_unit(&mut self.repo, &self.settings, target, unit_id, force, now)
    }

    pub fn open_logs(&self, unit_id: UnitId) -> usize {
        self.repo
            .duty_logs
            .iter()
            .filter(|l| l.unit_id == unit_id && l.is_open())
            .count()
    }
}

pub fn call_units(view: &TargetView) -> Vec<UnitId> {
    match view {
        TargetView::Call(call) => call.units.iter().map(|u| u.id).collect(),
        TargetView::Incident(incident) => incident.units.iter().map(|u| u.id).collect(),
    }
}
