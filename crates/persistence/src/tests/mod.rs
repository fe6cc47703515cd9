// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod repository_tests;

use crate::{Persistence, SqliteRepository};
use cad_dispatch::{CoreError, StatusChange, create_status_code, create_unit, set_unit_status};
use cad_dispatch_domain::{Discipline, ShouldDo, StatusCodeId, UnitId};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub const T0: OffsetDateTime = datetime!(2026-05-01 08:00 UTC);

pub fn at(minutes: i64) -> OffsetDateTime {
    T0 + Duration::minutes(minutes)
}

/// An in-memory database seeded with an on-duty, an off-duty and a panic status.
pub struct Seeded {
    pub db: Persistence,
    pub on_duty: StatusCodeId,
    pub off_duty: StatusCodeId,
    pub panic: StatusCodeId,
}

impl Seeded {
    pub fn new() -> Self {
        let mut db: Persistence = Persistence::new_in_memory().expect("in-memory database");
        let (on_duty, off_duty, panic) = db
            .transaction(|repo: &mut SqliteRepository<'_>| {
                let on_duty = create_status_code(repo, "10-8", ShouldDo::SetOnDuty, None, 1)?.id;
                let off_duty = create_status_code(repo, "10-7", ShouldDo::SetOffDuty, None, 2)?.id;
                let panic = create_status_code(
                    repo,
                    "PANIC",
                    ShouldDo::PanicButton,
                    Some(String::from("#ff0000")),
                    3,
                )?
                .id;
                Ok::<_, CoreError>((on_duty, off_duty, panic))
            })
            .unwrap();
        Self {
            db,
            on_duty,
            off_duty,
            panic,
        }
    }

    pub fn add_unit(&mut self, callsign: &str, user_id: &str) -> UnitId {
        let callsign2: String = callsign.chars().filter(char::is_ascii_digit).collect();
        self.db
            .transaction(|repo: &mut SqliteRepository<'_>| {
                create_unit(repo, Discipline::Leo, callsign, &callsign2, user_id)
            })
            .unwrap()
            .id
    }

    pub fn add_on_duty_unit(&mut self, callsign: &str, user_id: &str) -> UnitId {
        let id: UnitId = self.add_unit(callsign, user_id);
        let change: StatusChange = StatusChange {
            unit_id: id,
            status_id: self.on_duty,
            requested_by: String::from("tester"),
            is_dispatch: false,
        };
        self.db
            .transaction(|repo: &mut SqliteRepository<'_>| set_unit_status(repo, &change, at(1)))
            .unwrap();
        id
    }
}
