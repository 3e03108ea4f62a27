//! Main database interface.
//!
//! This module provides the [`Database`] struct, the primary entry point for
//! working with tables. It is a caller-owned handle: there is no process-wide
//! singleton, and every operation runs as its own transaction against the
//! underlying engine.
//!
//! # Examples
//!
//! ```ignore
//! use tabledb::Database;
//!
//! let mut db = Database::open("app.tdb", 0o600)?;
//! db.create_table("users")?;
//!
//! // Keys and values can be any supported shape
//! db.set("users", "alice", 30u32)?;
//! db.set("users", 7u8, b"seventh".as_slice())?;
//!
//! assert_eq!(db.get("users", "alice"), Some(b"30".to_vec()));
//!
//! // Auto-keyed insertion
//! db.create_table("log")?;
//! db.add("log", "first event")?;
//!
//! // Ordered traversal with reduction
//! let keys = db.traverse("users", |k, _v| k.to_vec());
//!
//! db.close();
//! ```

use std::path::Path;

use tracing::debug;

use crate::backends::RedbEngine;
use crate::encoding::encode;
use crate::engine::{Cursor, StorageEngine, Transaction};
use crate::error::{Error, Result};
use crate::value::Value;

/// A handle to one database and its tables.
///
/// Each operation opens its own transaction: a single `set`, `delete`, `add`,
/// `create_table`, or `delete_table` call is atomic, and no atomicity spans
/// multiple calls. Writers serialize on the engine's single writer slot and
/// block until it is granted; reads see consistent snapshots.
///
/// The handle owns the engine connection exclusively. [`Database::close`]
/// releases it; afterwards every operation reports the handle as closed.
pub struct Database {
    /// The configured database name.
    name: String,
    /// The engine connection; `None` once closed.
    engine: Option<RedbEngine>,
}

impl Database {
    /// Open or create a database file at `name`, applying `mode` to the
    /// backing file on creation.
    ///
    /// `name` doubles as the filesystem path and the configured database
    /// name returned by [`Database::name`]. `mode` follows POSIX file-mode
    /// semantics; on non-unix platforms it is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be created, is locked by
    /// another exclusive writer, or is not a valid store file.
    pub fn open(name: &str, mode: u32) -> Result<Self> {
        create_backing_file(Path::new(name), mode)?;
        let engine = RedbEngine::open(name).map_err(|e| Error::Open(e.to_string()))?;
        debug!(name, "opened database");
        Ok(Self { name: name.to_owned(), engine: Some(engine) })
    }

    /// Open a non-persistent in-memory database.
    ///
    /// Useful for tests and temporary data; everything is lost when the
    /// handle is dropped or closed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the in-memory engine cannot be created.
    pub fn in_memory(name: &str) -> Result<Self> {
        let engine = RedbEngine::in_memory().map_err(|e| Error::Open(e.to_string()))?;
        Ok(Self { name: name.to_owned(), engine: Some(engine) })
    }

    /// Release the engine connection.
    ///
    /// Idempotent: closing an already-closed handle is a no-op.
    pub fn close(&mut self) {
        if self.engine.take().is_some() {
            debug!(name = %self.name, "closed database");
        }
    }

    /// The configured database name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a table if it does not already exist.
    ///
    /// Creating an existing table succeeds and leaves its rows and sequence
    /// counter untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed handle, or [`Error::Storage`]
    /// if the engine fails.
    pub fn create_table(&self, table: &str) -> Result<()> {
        let engine = self.engine.as_ref().ok_or(Error::Closed)?;
        let mut tx = engine.begin_write()?;
        tx.create_table(table)?;
        tx.commit()?;
        debug!(table, "created table");
        Ok(())
    }

    /// Delete a table, all of its rows, and its sequence counter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableNotFound`] if the table does not exist,
    /// [`Error::Closed`] on a closed handle, or [`Error::Storage`] if the
    /// engine fails.
    pub fn delete_table(&self, table: &str) -> Result<()> {
        let engine = self.engine.as_ref().ok_or(Error::Closed)?;
        let mut tx = engine.begin_write()?;
        if !tx.delete_table(table)? {
            let _ = tx.rollback();
            return Err(Error::TableNotFound(table.to_owned()));
        }
        tx.commit()?;
        debug!(table, "deleted table");
        Ok(())
    }

    /// Encode `key` and `value` and upsert the pair into `table`.
    ///
    /// Writing an existing key overwrites its value. The table must have
    /// been created first; writing to an absent table is rejected rather
    /// than silently creating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableNotFound`] if the table does not exist,
    /// [`Error::Closed`] on a closed handle, or [`Error::Storage`] if the
    /// engine fails.
    pub fn set(&self, table: &str, key: impl Into<Value>, value: impl Into<Value>) -> Result<()> {
        let engine = self.engine.as_ref().ok_or(Error::Closed)?;
        let key = encode(&key.into());
        let value = encode(&value.into());

        let mut tx = engine.begin_write()?;
        if !tx.table_exists(table)? {
            let _ = tx.rollback();
            return Err(Error::TableNotFound(table.to_owned()));
        }
        tx.put(table, &key, &value)?;
        tx.commit()?;
        Ok(())
    }

    /// Encode `key` and read its value from `table`.
    ///
    /// The returned bytes are an owned copy, valid after the internal
    /// transaction has ended.
    ///
    /// Known ambiguity, kept for compatibility: `None` covers both "key
    /// absent" and any internal failure (closed handle, encoding, engine).
    /// Callers cannot distinguish a miss from an error; failures are logged
    /// at debug level.
    ///
    /// The lookup runs inside a write transaction, serializing it with all
    /// writers. This is inherited behavior; it trades read throughput for
    /// strict serialization with the writer slot.
    #[must_use]
    pub fn get(&self, table: &str, key: impl Into<Value>) -> Option<Vec<u8>> {
        let engine = self.engine.as_ref()?;
        let key = encode(&key.into());

        let tx = match engine.begin_write() {
            Ok(tx) => tx,
            Err(err) => {
                debug!(table, %err, "get failed to begin transaction");
                return None;
            }
        };
        let value = match tx.get(table, &key) {
            Ok(value) => value,
            Err(err) => {
                debug!(table, %err, "get failed");
                None
            }
        };
        if let Err(err) = tx.commit() {
            debug!(table, %err, "get failed to commit");
        }
        value
    }

    /// Encode `key` and remove it from `table` if present.
    ///
    /// Succeeds even when the key was already absent; the table is left
    /// unchanged in that case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed handle, or [`Error::Storage`]
    /// if the engine fails.
    pub fn delete(&self, table: &str, key: impl Into<Value>) -> Result<()> {
        let engine = self.engine.as_ref().ok_or(Error::Closed)?;
        let key = encode(&key.into());

        let mut tx = engine.begin_write()?;
        tx.delete(table, &key)?;
        tx.commit()?;
        Ok(())
    }

    /// Encode `value` and insert it under the table's next sequence number.
    ///
    /// The generated key is the decimal encoding of a per-table counter
    /// that is strictly increasing, persisted with the table, and never
    /// reused, even across process restarts. Note that decimal keys sort
    /// lexicographically, not numerically, under traversal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableNotFound`] if the table does not exist,
    /// [`Error::Closed`] on a closed handle, or [`Error::Storage`] if the
    /// engine fails.
    pub fn add(&self, table: &str, value: impl Into<Value>) -> Result<()> {
        let engine = self.engine.as_ref().ok_or(Error::Closed)?;
        let value = encode(&value.into());

        let mut tx = engine.begin_write()?;
        let seq = tx.next_sequence(table)?;
        let key = encode(&Value::Uint(seq));
        tx.put(table, &key, &value)?;
        tx.commit()?;
        Ok(())
    }

    /// Visit every pair of `table` in ascending key byte order, folding the
    /// reducer's results into one accumulator.
    ///
    /// Each reducer result is appended to the accumulator followed by a
    /// single space byte. The scan restarts from the first key on every
    /// call.
    ///
    /// Known ambiguity, kept for compatibility: there is no error path. Any
    /// read failure yields whatever accumulated so far (possibly empty), as
    /// does traversing a missing table or a closed handle. Failures are
    /// logged at debug level.
    pub fn traverse(
        &self,
        table: &str,
        mut reduce: impl FnMut(&[u8], &[u8]) -> Vec<u8>,
    ) -> Vec<u8> {
        let Some(engine) = self.engine.as_ref() else {
            return Vec::new();
        };
        let tx = match engine.begin_read() {
            Ok(tx) => tx,
            Err(err) => {
                debug!(table, %err, "traverse failed to begin transaction");
                return Vec::new();
            }
        };
        let mut cursor = match tx.cursor(table) {
            Ok(cursor) => cursor,
            Err(err) => {
                debug!(table, %err, "traverse failed to open cursor");
                return Vec::new();
            }
        };

        let mut acc = Vec::new();
        let mut entry = cursor.seek_first();
        loop {
            match entry {
                Ok(Some((key, value))) => {
                    acc.extend_from_slice(&reduce(&key, &value));
                    acc.push(b' ');
                }
                Ok(None) => break,
                Err(err) => {
                    debug!(table, %err, "traverse stopped early");
                    break;
                }
            }
            entry = cursor.next();
        }
        acc
    }
}

/// Create the backing file with the requested permissions if it does not
/// exist yet. The engine then opens whatever is at the path.
fn create_backing_file(path: &Path, mode: u32) -> Result<()> {
    use std::fs::OpenOptions;

    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path).map(drop).map_err(|e| Error::Open(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_is_idempotent() {
        let mut db = Database::in_memory("test").expect("failed to create db");
        db.close();
        db.close();
    }

    #[test]
    fn operations_on_closed_handle() {
        let mut db = Database::in_memory("test").expect("failed to create db");
        db.create_table("t").expect("failed to create table");
        db.close();

        assert!(matches!(db.create_table("t"), Err(Error::Closed)));
        assert!(matches!(db.set("t", "k", "v"), Err(Error::Closed)));
        assert!(matches!(db.delete("t", "k"), Err(Error::Closed)));
        assert!(matches!(db.add("t", "v"), Err(Error::Closed)));
        assert!(matches!(db.delete_table("t"), Err(Error::Closed)));
        assert_eq!(db.get("t", "k"), None);
        assert_eq!(db.traverse("t", |k, _| k.to_vec()), Vec::<u8>::new());
    }

    #[test]
    fn name_returns_configured_name() {
        let db = Database::in_memory("mydb").expect("failed to create db");
        assert_eq!(db.name(), "mydb");
    }
}
