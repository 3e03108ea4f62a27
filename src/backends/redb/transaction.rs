//! Redb transaction implementation.
//!
//! This module provides the `RedbTransaction` type which implements the
//! `Transaction` trait for both read-only and read-write transactions.
//!
//! # Memory-Efficient Cursors
//!
//! The cursor implementation uses batched streaming to avoid loading entire
//! tables into memory. Instead of materializing all entries upfront, it loads
//! entries in batches (default 1000 entries), fetching the next batch on
//! demand as the cursor advances.

use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use crate::engine::{Cursor, CursorResult, KeyValue, StorageError, Transaction};

use super::tables::{
    check_table_name, frame_key, table_end_key, table_start_key, unframe_key, CATALOG_TABLE,
    DATA_TABLE,
};

/// Default batch size for cursor operations.
/// This limits memory usage while maintaining good performance.
const DEFAULT_BATCH_SIZE: usize = 1000;

/// A transaction for the Redb storage engine.
///
/// This type wraps both read-only and read-write Redb transactions,
/// providing a unified interface through the `Transaction` trait.
///
/// Note: We allow the `large_enum_variant` lint here because boxing the
/// `WriteTransaction` would add indirection overhead for every operation,
/// and transactions are typically short-lived.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }
}

impl Transaction for RedbTransaction {
    type Cursor<'a>
        = RedbCursor<'a>
    where
        Self: 'a;

    fn create_table(&mut self, table: &str) -> Result<(), StorageError> {
        check_table_name(table)?;
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t = tx
                    .open_table(CATALOG_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                let exists = t
                    .get(table)
                    .map_err(|e| StorageError::Internal(e.to_string()))?
                    .is_some();
                if !exists {
                    // Counter starts at 0; the first allocated sequence is 1.
                    t.insert(table, 0_u64)
                        .map_err(|e| StorageError::Internal(e.to_string()))?;
                }
                Ok(())
            }
        }
    }

    fn delete_table(&mut self, table: &str) -> Result<bool, StorageError> {
        check_table_name(table)?;
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let removed = match tx.open_table(CATALOG_TABLE) {
                    Ok(mut t) => t
                        .remove(table)
                        .map_err(|e| StorageError::Internal(e.to_string()))?
                        .is_some(),
                    Err(redb::TableError::TableDoesNotExist(_)) => false,
                    Err(e) => return Err(StorageError::Internal(e.to_string())),
                };

                if removed {
                    // Drop every row the table held. Keys are collected first
                    // so the range borrow ends before removal starts.
                    let mut t = tx
                        .open_table(DATA_TABLE)
                        .map_err(|e| StorageError::Internal(e.to_string()))?;
                    let start = table_start_key(table);
                    let end = table_end_key(table);
                    let keys: Vec<Vec<u8>> = {
                        let range = t
                            .range(start.as_slice()..end.as_slice())
                            .map_err(|e| StorageError::Internal(e.to_string()))?;
                        let mut keys = Vec::new();
                        for result in range {
                            let (k, _) =
                                result.map_err(|e| StorageError::Internal(e.to_string()))?;
                            keys.push(k.value().to_vec());
                        }
                        keys
                    };
                    for key in keys {
                        t.remove(key.as_slice())
                            .map_err(|e| StorageError::Internal(e.to_string()))?;
                    }
                }

                Ok(removed)
            }
        }
    }

    fn table_exists(&self, table: &str) -> Result<bool, StorageError> {
        check_table_name(table)?;
        match self {
            Self::Read(tx) => match tx.open_table(CATALOG_TABLE) {
                Ok(t) => Ok(t
                    .get(table)
                    .map_err(|e| StorageError::Internal(e.to_string()))?
                    .is_some()),
                // No catalog yet means no tables at all.
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(false),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => {
                let t = tx
                    .open_table(CATALOG_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                // Bound to a local so the access guard drops before `t`
                let exists = t
                    .get(table)
                    .map_err(|e| StorageError::Internal(e.to_string()))?
                    .is_some();
                Ok(exists)
            }
        }
    }

    fn next_sequence(&mut self, table: &str) -> Result<u64, StorageError> {
        check_table_name(table)?;
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t = tx
                    .open_table(CATALOG_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                let current = {
                    let guard = t
                        .get(table)
                        .map_err(|e| StorageError::Internal(e.to_string()))?;
                    match guard {
                        Some(g) => g.value(),
                        None => return Err(StorageError::TableNotFound(table.to_owned())),
                    }
                };
                let next = current + 1;
                t.insert(table, next)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                Ok(next)
            }
        }
    }

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        check_table_name(table)?;
        let framed = frame_key(table, key);

        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => match t.get(framed.as_slice()) {
                    Ok(Some(value)) => Ok(Some(value.value().to_vec())),
                    Ok(None) => Ok(None),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                },
                // No data table means no data, which is not an error
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => {
                let t = tx
                    .open_table(DATA_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                // Bound to a local so the access guard drops before `t`
                let value = match t.get(framed.as_slice()) {
                    Ok(Some(value)) => Some(value.value().to_vec()),
                    Ok(None) => None,
                    Err(e) => return Err(StorageError::Internal(e.to_string())),
                };
                Ok(value)
            }
        }
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        check_table_name(table)?;
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let framed = frame_key(table, key);
                let mut t = tx
                    .open_table(DATA_TABLE)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                t.insert(framed.as_slice(), value)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        check_table_name(table)?;
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let framed = frame_key(table, key);
                match tx.open_table(DATA_TABLE) {
                    Ok(mut t) => match t.remove(framed.as_slice()) {
                        Ok(Some(_)) => Ok(true),
                        Ok(None) => Ok(false),
                        Err(e) => Err(StorageError::Internal(e.to_string())),
                    },
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                }
            }
        }
    }

    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        check_table_name(table)?;
        Ok(RedbCursor::new(self, table.to_owned(), DEFAULT_BATCH_SIZE))
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            // Read transactions don't need explicit commit
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            // Read transactions just get dropped
            Self::Read(_) => Ok(()),
            Self::Write(tx) => {
                // Ignore abort result - we're rolling back anyway
                drop(tx.abort());
                Ok(())
            }
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

impl RedbTransaction {
    /// Fetch a batch of up to `batch_size` entries from a logical table.
    ///
    /// With `start = None` the batch begins at the first key of the table.
    /// With `start = Some(key)` it begins at `key`, inclusive when
    /// `inclusive` is set (seek) and exclusive otherwise (continuation from
    /// a previously returned key).
    fn fetch_batch(
        &self,
        table: &str,
        start: Option<&[u8]>,
        inclusive: bool,
        batch_size: usize,
    ) -> Result<Vec<KeyValue>, StorageError> {
        let start_key = match start {
            Some(key) => frame_key(table, key),
            None => table_start_key(table),
        };
        let end_key = table_end_key(table);
        let skip_first = start.is_some() && !inclusive;

        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => collect_batch(&t, &start_key, &end_key, skip_first, batch_size),
                // Table doesn't exist yet, return empty result (not an error)
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => collect_batch(&t, &start_key, &end_key, skip_first, batch_size),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
        }
    }
}

/// Collect up to `batch_size` entries from the framed key range, unframing
/// each key back to its logical form.
fn collect_batch(
    t: &impl ReadableTable<&'static [u8], &'static [u8]>,
    start_key: &[u8],
    end_key: &[u8],
    skip_first: bool,
    batch_size: usize,
) -> Result<Vec<KeyValue>, StorageError> {
    let range =
        t.range(start_key..end_key).map_err(|e| StorageError::Internal(e.to_string()))?;

    let mut entries = Vec::with_capacity(batch_size.min(1024));
    let mut skipped = !skip_first;
    for result in range {
        if entries.len() >= batch_size {
            break;
        }

        let (k, v) = result.map_err(|e| StorageError::Internal(e.to_string()))?;
        if let Some((_, key)) = unframe_key(k.value()) {
            // Skip the continuation key itself when resuming a batch.
            if !skipped {
                skipped = true;
                continue;
            }
            entries.push((key.to_vec(), v.value().to_vec()));
        }
    }
    Ok(entries)
}

/// A memory-efficient forward cursor for iterating over a logical table.
///
/// This implementation uses batched streaming: at any time the cursor holds
/// at most `batch_size` entries in memory plus the current entry, so a table
/// with a million rows uses about the same memory as one with a thousand.
pub struct RedbCursor<'a> {
    /// Reference to the transaction for fetching additional batches.
    tx: &'a RedbTransaction,
    /// The logical table name.
    table: String,
    /// Current batch of entries.
    batch: Vec<KeyValue>,
    /// Position within the current batch.
    batch_position: Option<usize>,
    /// Maximum entries per batch.
    batch_size: usize,
    /// Whether there may be more entries after the current batch.
    has_more: bool,
    /// Whether iteration has reached the end of the table.
    done: bool,
    /// Cached current entry for the `current()` method.
    current_entry: Option<KeyValue>,
}

impl<'a> RedbCursor<'a> {
    /// Create a new streaming cursor.
    ///
    /// The cursor starts in an unpositioned state. Call `seek_first()` or
    /// `seek()` to position it before iterating.
    pub(crate) fn new(tx: &'a RedbTransaction, table: String, batch_size: usize) -> Self {
        Self {
            tx,
            table,
            batch: Vec::new(),
            batch_position: None,
            batch_size,
            has_more: true,
            done: false,
            current_entry: None,
        }
    }

    /// Load the next batch, continuing after the last key of the current one.
    fn load_next_batch(&mut self) -> Result<bool, StorageError> {
        if !self.has_more {
            return Ok(false);
        }

        let after_key = self.batch.last().map(|(k, _)| k.clone());
        let new_batch =
            self.tx.fetch_batch(&self.table, after_key.as_deref(), false, self.batch_size)?;

        if new_batch.is_empty() {
            self.has_more = false;
            return Ok(false);
        }

        self.has_more = new_batch.len() >= self.batch_size;
        self.batch = new_batch;
        self.batch_position = Some(0);
        Ok(true)
    }

    /// Position the cursor at the end of iteration. The cursor stays
    /// exhausted until the next seek.
    fn exhaust(&mut self) {
        self.batch_position = None;
        self.current_entry = None;
        self.done = true;
    }

    /// Update the current entry cache from the batch.
    fn update_current(&mut self) {
        self.current_entry = self.batch_position.and_then(|pos| self.batch.get(pos).cloned());
    }
}

impl Cursor for RedbCursor<'_> {
    fn seek(&mut self, key: &[u8]) -> CursorResult {
        self.done = false;
        self.batch = self.tx.fetch_batch(&self.table, Some(key), true, self.batch_size)?;
        self.has_more = self.batch.len() >= self.batch_size;

        if self.batch.is_empty() {
            self.exhaust();
            return Ok(None);
        }

        self.batch_position = Some(0);
        self.update_current();
        Ok(self.current_entry.clone())
    }

    fn seek_first(&mut self) -> CursorResult {
        self.done = false;
        self.batch = self.tx.fetch_batch(&self.table, None, false, self.batch_size)?;
        self.has_more = self.batch.len() >= self.batch_size;

        if self.batch.is_empty() {
            self.exhaust();
            return Ok(None);
        }

        self.batch_position = Some(0);
        self.update_current();
        Ok(self.current_entry.clone())
    }

    fn next(&mut self) -> CursorResult {
        if self.done {
            return Ok(None);
        }
        match self.batch_position {
            // Not positioned, start from first
            None => self.seek_first(),
            Some(pos) => {
                let next_pos = pos + 1;
                if next_pos < self.batch.len() {
                    self.batch_position = Some(next_pos);
                    self.update_current();
                    Ok(self.current_entry.clone())
                } else if self.load_next_batch()? {
                    self.update_current();
                    Ok(self.current_entry.clone())
                } else {
                    self.exhaust();
                    Ok(None)
                }
            }
        }
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.current_entry.as_ref().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}
