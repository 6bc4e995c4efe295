//! Error types for the vehicle store.

use thiserror::Error;

/// Errors that can occur when reading or writing the `vehicles` table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store is closed")]
    Closed,

    #[error("vehicle {0} not found")]
    NotFound(String),
}

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
