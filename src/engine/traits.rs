//! Core storage engine traits.
//!
//! This module defines the fundamental traits for storage backends:
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`Transaction`] - ACID transaction with table lifecycle, key-value, and
//!   sequence operations
//! - [`Cursor`] - Ordered forward iteration over key-value pairs
//!
//! Tables are dynamic: they are created and deleted at runtime by name, and
//! each table owns a monotonically increasing sequence counter persisted
//! alongside its data.

use std::sync::Arc;

use super::StorageError;

/// A key-value pair returned by cursor operations.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Result type for cursor operations that return a key-value pair.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// A storage engine that provides transactional key-value operations.
///
/// Storage engines provide durable storage with ACID transaction support:
/// a single writer at a time, any number of concurrent readers, each reader
/// seeing a consistent snapshot. Implementations must be thread-safe
/// (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use tabledb::{StorageEngine, Transaction};
///
/// fn example<E: StorageEngine>(engine: &E) -> Result<(), StorageError> {
///     let mut tx = engine.begin_write()?;
///     tx.create_table("users")?;
///     tx.put("users", b"alice", b"30")?;
///     tx.commit()?;
///
///     let tx = engine.begin_read()?;
///     let value = tx.get("users", b"alice")?;
///     Ok(())
/// }
/// ```
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    ///
    /// Read transactions provide a consistent snapshot of the database.
    /// Multiple read transactions can run concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Begin a read-write transaction.
    ///
    /// Only one write transaction is active at a time; this call blocks
    /// until the writer slot is granted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;
}

/// A transaction that provides ACID table and key-value operations.
///
/// Write transactions must be explicitly committed; dropping without
/// committing rolls back all changes.
pub trait Transaction {
    /// The cursor type for iteration.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Create a table if it does not already exist.
    ///
    /// Creating an existing table is a no-op: its rows and sequence counter
    /// are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction,
    /// [`StorageError::InvalidTableName`] for a name the backend cannot
    /// represent, or an error if the write fails.
    fn create_table(&mut self, table: &str) -> Result<(), StorageError>;

    /// Delete a table, its rows, and its sequence counter.
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the table existed, `Ok(false)` if it did not.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction, or an
    /// error if the delete fails.
    fn delete_table(&mut self, table: &str) -> Result<bool, StorageError>;

    /// Check whether a table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn table_exists(&self, table: &str) -> Result<bool, StorageError>;

    /// Advance and return the table's sequence counter.
    ///
    /// Each call returns a value strictly greater than every value returned
    /// before it for the same table, including across restarts once the
    /// transaction commits. Values are never reused, even after the rows
    /// they keyed are deleted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TableNotFound`] if the table does not exist,
    /// or [`StorageError::ReadOnly`] on a read-only transaction.
    fn next_sequence(&mut self, table: &str) -> Result<u64, StorageError>;

    /// Get a value by key from a table.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(value))` if the key exists, `Ok(None)` if it doesn't.
    /// The returned bytes are owned and remain valid after the transaction
    /// ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a key-value pair into a table, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction, or an
    /// error if the write fails.
    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key from a table.
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the key was deleted, `Ok(false)` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction, or an
    /// error if the delete fails.
    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError>;

    /// Create a cursor for iterating over all key-value pairs in a table.
    ///
    /// The cursor starts unpositioned; call [`Cursor::seek_first`] or
    /// [`Cursor::next`] to position it. Iterating a table that does not
    /// exist yields no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor cannot be created.
    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError>;

    /// Commit the transaction, making all changes durable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(self) -> Result<(), StorageError>;

    /// Rollback the transaction, discarding all changes.
    ///
    /// This is implicit when a transaction is dropped without committing,
    /// but can be called explicitly for clarity.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    fn rollback(self) -> Result<(), StorageError>;

    /// Check if this is a read-only transaction.
    ///
    /// Read-only transactions return [`StorageError::ReadOnly`] on write
    /// operations.
    fn is_read_only(&self) -> bool;
}

/// A cursor for ordered forward iteration over key-value pairs.
///
/// Cursors visit keys in ascending byte order. Keys returned by a cursor
/// are the logical table keys, with any backend framing stripped.
///
/// # Iteration Pattern
///
/// ```ignore
/// let mut cursor = tx.cursor("users")?;
///
/// let mut entry = cursor.seek_first()?;
/// while let Some((key, value)) = entry {
///     // Process key-value pair
///     entry = cursor.next()?;
/// }
/// ```
pub trait Cursor {
    /// Seek to the first key greater than or equal to the given key.
    ///
    /// # Returns
    ///
    /// Returns the key-value pair at the position, or `None` if no such key exists.
    fn seek(&mut self, key: &[u8]) -> CursorResult;

    /// Seek to the first key-value pair.
    ///
    /// # Returns
    ///
    /// Returns the first key-value pair, or `None` if the table is empty.
    fn seek_first(&mut self) -> CursorResult;

    /// Move to the next key-value pair.
    ///
    /// On an unpositioned cursor this behaves like [`Cursor::seek_first`].
    /// Once the end is reached it keeps returning `None` until the cursor
    /// is repositioned with a seek.
    ///
    /// # Returns
    ///
    /// Returns the next key-value pair, or `None` if at the end.
    fn next(&mut self) -> CursorResult;

    /// Get the current key-value pair without advancing.
    ///
    /// Returns `None` if the cursor is not positioned at a valid entry.
    fn current(&self) -> Option<(&[u8], &[u8])>;
}

/// Implement `StorageEngine` for `Arc<E>` to allow shared ownership of engines.
impl<E: StorageEngine> StorageEngine for Arc<E> {
    type Transaction<'a>
        = E::Transaction<'a>
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_read()
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_write()
    }
}
