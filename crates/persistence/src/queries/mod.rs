// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `units`: primary and combined units
//! - `status_codes`: the status catalog
//! - `duty_logs`: on-duty intervals
//! - `assignments`: call and incident join rows
//! - `dispatch`: calls and incidents

pub mod assignments;
pub mod dispatch;
pub mod duty_logs;
pub mod status_codes;
pub mod units;
