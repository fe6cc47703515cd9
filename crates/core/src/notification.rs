// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Webhook payload shaping.
//!
//! Payloads follow the Discord embed layout: one embed with a title, a
//! description and inline fields.

use crate::events::DispatchEvent;
use crate::views::{UnitKind, UnitView};
use serde_json::{Value, json};

const PANIC_COLOR: u32 = 0x00ED_4245;

fn field(name: &str, value: &str) -> Value {
    json!({ "name": name, "value": value, "inline": true })
}

/// Parses a `#rrggbb` status color into the integer form embeds use.
fn embed_color(color: Option<&str>) -> Option<u32> {
    let hex: &str = color?.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn status_label(unit: &UnitView) -> &str {
    unit.status
        .as_ref()
        .map_or("Off duty", |s| s.value.as_str())
}

fn unit_embed(unit: &UnitView, title: String) -> Value {
    let status: &str = status_label(unit);
    let mut fields: Vec<Value> = vec![
        field("Callsign", &unit.callsign),
        field("Status", status),
        field("Discipline", unit.discipline.label()),
    ];

    let description: String = match unit.kind {
        UnitKind::Primary => format!(
            "{} {} is now {status}",
            unit.discipline.label(),
            unit.callsign
        ),
        UnitKind::Combined => {
            let members: Vec<&str> = unit.members.iter().map(|m| m.callsign.as_str()).collect();
            fields.push(field("Members", &members.join(", ")));
            format!("Combined unit {} is now {status}", unit.callsign)
        }
    };

    let mut embed: Value = json!({
        "title": title,
        "description": description,
        "fields": fields,
    });
    if let Some(color) = embed_color(unit.status.as_ref().and_then(|s| s.color.as_deref())) {
        embed["color"] = json!(color);
    }
    embed
}

/// Shapes the webhook body for an event.
///
/// Only unit status changes and panic transitions are forwarded. Assignment
/// moves and every other event return `None`.
#[must_use]
pub fn webhook_payload(event: &DispatchEvent) -> Option<Value> {
    let embed: Value = match event {
        DispatchEvent::UnitStatusChanged { unit } => {
            unit_embed(unit, String::from("Unit status changed"))
        }
        DispatchEvent::PanicButton { unit, on: true } => {
            let mut embed: Value = unit_embed(unit, format!("PANIC BUTTON: {}", unit.callsign));
            embed["color"] = json!(PANIC_COLOR);
            embed
        }
        DispatchEvent::PanicButton { unit, on: false } => {
            unit_embed(unit, format!("Panic cleared: {}", unit.callsign))
        }
        DispatchEvent::UnitUpdated { .. }
        | DispatchEvent::CallUpdated { .. }
        | DispatchEvent::IncidentUpdated { .. }
        | DispatchEvent::CombinedUnitCreated { .. }
        | DispatchEvent::CombinedUnitDissolved { .. } => return None,
    };

    Some(json!({ "embeds": [embed] }))
}
