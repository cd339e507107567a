//! Custom error types for the common library
//!
//! This module defines the storage error type shared by every service. Both
//! the PostgreSQL repositories and the in-memory stores report failures
//! through [`DatabaseError`].

use sqlx::Error as SqlxError;
use thiserror::Error;

/// PostgreSQL error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A unique constraint rejected the write
    #[error("Conflicting record: {0}")]
    Conflict(String),
}

impl DatabaseError {
    /// Classify a query error, turning unique violations into [`DatabaseError::Conflict`]
    pub fn from_query(err: SqlxError) -> Self {
        let conflict = err
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION);

        if conflict {
            DatabaseError::Conflict(err.to_string())
        } else {
            DatabaseError::Query(err)
        }
    }

    /// Whether this error was caused by a unique constraint
    pub fn is_conflict(&self) -> bool {
        matches!(self, DatabaseError::Conflict(_))
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
