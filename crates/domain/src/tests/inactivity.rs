// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ActiveType, DomainError, is_stale};
use time::macros::datetime;

#[test]
fn test_no_timeout_is_never_stale() {
    let now = datetime!(2026-06-01 12:00 UTC);
    let long_ago = datetime!(2020-01-01 00:00 UTC);
    assert!(!is_stale(long_ago, None, now));
}

#[test]
fn test_older_than_timeout_is_stale() {
    let now = datetime!(2026-06-01 12:00 UTC);
    let touched = datetime!(2026-06-01 11:29 UTC);
    assert!(is_stale(touched, Some(30), now));
}

#[test]
fn test_within_timeout_is_fresh() {
    let now = datetime!(2026-06-01 12:00 UTC);
    let touched = datetime!(2026-06-01 11:45 UTC);
    assert!(!is_stale(touched, Some(30), now));
}

#[test]
fn test_exactly_at_cutoff_is_fresh() {
    let now = datetime!(2026-06-01 12:00 UTC);
    let touched = datetime!(2026-06-01 11:30 UTC);
    assert!(!is_stale(touched, Some(30), now));
}

#[test]
fn test_active_type_filters() {
    assert!(ActiveType::Active.includes(true));
    assert!(!ActiveType::Active.includes(false));
    assert!(ActiveType::Inactive.includes(false));
    assert!(!ActiveType::Inactive.includes(true));
    assert!(ActiveType::All.includes(true));
    assert!(ActiveType::All.includes(false));
}

#[test]
fn test_active_type_parsing() {
    assert_eq!(
        "inactive".parse::<ActiveType>().unwrap(),
        ActiveType::Inactive
    );
    assert_eq!(ActiveType::default(), ActiveType::Active);
    assert!(matches!(
        "stale".parse::<ActiveType>(),
        Err(DomainError::InvalidActiveType(_))
    ));
}
