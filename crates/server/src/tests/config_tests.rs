// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch_domain::CadSettings;
use clap::Parser;

use crate::Args;

#[test]
fn test_defaults_match_engine_defaults() {
    let args: Args = Args::parse_from(["cad-dispatch-server"]);

    assert_eq!(args.port, 3000);
    assert_eq!(args.bind, "127.0.0.1");
    assert!(args.database.is_none());
    assert!(args.webhook_url.is_none());
    assert_eq!(args.settings(), CadSettings::default());
}

#[test]
fn test_zero_cap_disables_limit() {
    let args: Args = Args::parse_from([
        "cad-dispatch-server",
        "--max-call-assignments",
        "0",
        "--max-incident-assignments",
        "3",
    ]);

    let settings: CadSettings = args.settings();

    assert_eq!(settings.max_call_assignments, None);
    assert_eq!(settings.max_incident_assignments, Some(3));
}

#[test]
fn test_inactivity_timeouts_flow_into_settings() {
    let args: Args = Args::parse_from([
        "cad-dispatch-server",
        "--call-inactivity-minutes",
        "120",
        "--paired-unit-symbol",
        "2B",
    ]);

    let settings: CadSettings = args.settings();

    assert_eq!(settings.inactivity.call_minutes, Some(120));
    assert_eq!(settings.inactivity.unit_minutes, None);
    assert_eq!(settings.paired_unit_symbol, "2B");
}
