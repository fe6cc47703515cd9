// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the CAD coordination engine.
//!
//! The crate implements `cad_dispatch::UnitRepository` with Diesel and
//! embeds its own migrations.
//!
//! ## Transactions
//!
//! Every engine operation runs inside [`Persistence::transaction`], which
//! opens an `IMMEDIATE` transaction so the write lock is taken up front.
//! Multi-row changes (a merge, a forced eviction, a duty reset) therefore
//! commit or roll back as a unit.
//!
//! ## Storage conventions
//!
//! - Identifiers are UUIDs stored as text
//! - Timestamps are RFC 3339 text in UTC
//! - Call and incident join rows keep an integer surrogate key that records
//!   insertion order
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives each caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use diesel::connection::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod repository;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use repository::SqliteRepository;

/// Counter that names in-memory databases so each instance is isolated.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Carries either the caller's error or a failure of the transaction itself.
enum TransactionError<E> {
    Operation(E),
    Database(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for TransactionError<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err)
    }
}

/// Owns the `SQLite` connection used by the engine.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates an adapter over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:cad_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates an adapter over a database file, creating it if needed.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::configure_file_database(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(path = path_str, "Opened dispatch database");
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Runs `operation` inside an `IMMEDIATE` transaction.
    ///
    /// The transaction commits when `operation` returns `Ok` and rolls back
    /// otherwise. Failures to begin or commit surface as
    /// `E::from(PersistenceError)`.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or a persistence error if the
    /// transaction cannot be started or committed.
    pub fn transaction<T, E, F>(&mut self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut SqliteRepository<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        self.conn
            .immediate_transaction::<T, TransactionError<E>, _>(|conn| {
                let mut repo: SqliteRepository<'_> = SqliteRepository::new(conn);
                operation(&mut repo).map_err(TransactionError::Operation)
            })
            .map_err(|err| match err {
                TransactionError::Operation(err) => err,
                TransactionError::Database(err) => E::from(PersistenceError::from(err)),
            })
    }

    /// Runs a read-only `operation` inside a deferred transaction so it sees
    /// one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or a persistence error if the
    /// transaction fails.
    pub fn read<T, E, F>(&mut self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut SqliteRepository<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        self.conn
            .transaction::<T, TransactionError<E>, _>(|conn| {
                let mut repo: SqliteRepository<'_> = SqliteRepository::new(conn);
                operation(&mut repo).map_err(TransactionError::Operation)
            })
            .map_err(|err| match err {
                TransactionError::Operation(err) => err,
                TransactionError::Database(err) => E::from(PersistenceError::from(err)),
            })
    }
}
