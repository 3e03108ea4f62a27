//! Error types for the public database interface.

use thiserror::Error;

use crate::engine::StorageError;

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using a [`crate::Database`].
#[derive(Debug, Error)]
pub enum Error {
    /// The handle is not open (never opened, or already closed).
    #[error("database is not open")]
    Closed,

    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// An operation required a table that does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A value could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// An underlying storage engine error occurred.
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for Error {
    /// Engine-level "table not found" surfaces as the table error callers
    /// match on; everything else stays an opaque storage failure.
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TableNotFound(name) => Self::TableNotFound(name),
            other => Self::Storage(other),
        }
    }
}
