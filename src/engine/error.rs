//! Storage error types.

use thiserror::Error;

/// Result type for storage engine operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A table name contains bytes the engine cannot accept.
    #[error("invalid table name: {0:?}")]
    InvalidTableName(String),

    /// A write operation was attempted on a read-only transaction.
    #[error("transaction is read-only")]
    ReadOnly,

    /// A transaction could not be started or committed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal backend error occurred.
    #[error("internal storage error: {0}")]
    Internal(String),
}
