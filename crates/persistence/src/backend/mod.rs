// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific setup.
//!
//! Only connection initialization, migrations and `PRAGMA` handling live
//! here. Record queries and mutations use Diesel DSL in `queries/` and
//! `mutations/`.

pub mod sqlite;
