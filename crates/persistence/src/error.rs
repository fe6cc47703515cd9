// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cad_dispatch::StoreError;
use cad_dispatch_domain::DomainError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
    /// A unique, check or foreign key constraint rejected a write.
    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
    /// A row that must exist is missing.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    /// A stored value could not be decoded into a domain value.
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow {
        table: &'static str,
        message: String,
    },
}

impl PersistenceError {
    /// Wraps a domain decoding failure for a row of `table`.
    pub(crate) fn corrupt(table: &'static str, error: &DomainError) -> Self {
        Self::CorruptRow {
            table,
            message: error.to_string(),
        }
    }
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => Self::ConstraintViolation(info.message().to_string()),
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::ConstraintViolation(constraint) => Self::Conflict { constraint },
            PersistenceError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<PersistenceError> for cad_dispatch::CoreError {
    fn from(err: PersistenceError) -> Self {
        Self::Store(StoreError::from(err))
    }
}
