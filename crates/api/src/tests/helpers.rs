// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use cad_dispatch::{CallView, IncidentView, UnitView};
use cad_dispatch_persistence::Persistence;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{
    CreateCallRequest, CreateIncidentRequest, CreateStatusCodeRequest, CreateUnitRequest,
    SetUnitStatusRequest, create_call, create_incident, create_status_code, create_unit,
    set_unit_status,
};

pub const T0: OffsetDateTime = datetime!(2026-05-01 08:00 UTC);

pub fn at(minutes: i64) -> OffsetDateTime {
    T0 + Duration::minutes(minutes)
}

/// A fresh database with the three status codes most tests need.
pub struct Fixture {
    pub db: Persistence,
    pub on_duty: String,
    pub off_duty: String,
    pub panic: String,
}

fn status(db: &mut Persistence, value: &str, should_do: &str, position: i32) -> String {
    create_status_code(
        db,
        CreateStatusCodeRequest {
            value: value.to_string(),
            should_do: should_do.to_string(),
            color: None,
            position,
        },
    )
    .unwrap()
    .id
    .to_string()
}

impl Fixture {
    pub fn new() -> Self {
        let mut db: Persistence = Persistence::new_in_memory().unwrap();
        let on_duty: String = status(&mut db, "10-8", "SET_ON_DUTY", 1);
        let off_duty: String = status(&mut db, "10-7", "SET_OFF_DUTY", 2);
        let panic: String = status(&mut db, "PANIC", "PANIC_BUTTON", 3);
        Self {
            db,
            on_duty,
            off_duty,
            panic,
        }
    }

    pub fn unit(&mut self, discipline: &str, callsign: &str, user_id: &str) -> String {
        let request: CreateUnitRequest = CreateUnitRequest {
            discipline: discipline.to_string(),
            callsign: callsign.to_string(),
            callsign2: callsign.chars().filter(char::is_ascii_digit).collect(),
            user_id: user_id.to_string(),
        };
        create_unit(&mut self.db, &request).unwrap().id.to_string()
    }

    pub fn set_status(&mut self, unit_id: &str, status_id: &str, minutes: i64) -> UnitView {
        let request: SetUnitStatusRequest = SetUnitStatusRequest {
            status_id: status_id.to_string(),
            is_dispatch: false,
            requested_by: String::from("tester"),
        };
        set_unit_status(&mut self.db, unit_id, request, at(minutes))
            .unwrap()
            .response
    }

    pub fn on_duty_unit(&mut self, callsign: &str, user_id: &str) -> String {
        let id: String = self.unit("LEO", callsign, user_id);
        let on_duty: String = self.on_duty.clone();
        self.set_status(&id, &on_duty, 1);
        id
    }

    pub fn call(&mut self, location: &str) -> CallView {
        let request: CreateCallRequest = CreateCallRequest {
            location: location.to_string(),
            description: None,
        };
        create_call(&mut self.db, &request, T0).unwrap()
    }

    pub fn incident(&mut self, description: &str) -> IncidentView {
        let request: CreateIncidentRequest = CreateIncidentRequest {
            description: description.to_string(),
        };
        create_incident(&mut self.db, &request, T0).unwrap()
    }
}
