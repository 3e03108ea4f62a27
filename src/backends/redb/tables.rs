//! Redb table definitions and key framing.
//!
//! Redb requires static table names, so logical tables are multiplexed into
//! two physical tables:
//!
//! - [`DATA_TABLE`] holds every row of every logical table; the logical table
//!   name is prefixed onto each key with a `0x00` separator, keeping each
//!   table's rows contiguous and in key order.
//! - [`CATALOG_TABLE`] maps each logical table name to its current sequence
//!   counter. Presence in the catalog is what makes a table "exist"; the
//!   counter starts at 0 and only ever grows.

use redb::TableDefinition;

use crate::engine::StorageError;

/// The physical table that stores all key-value pairs.
/// Logical table names are prefixed to keys.
pub const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("tabledb_data");

/// The physical table mapping logical table names to sequence counters.
pub const CATALOG_TABLE: TableDefinition<'static, &str, u64> =
    TableDefinition::new("tabledb_catalog");

/// Separator byte between table name and key in the framed key.
pub const KEY_SEPARATOR: u8 = 0x00;

/// Reject table names the framing cannot represent.
///
/// A name containing the separator byte would make its rows land inside
/// another table's key range, so such names are refused before any key is
/// framed.
pub fn check_table_name(table: &str) -> Result<(), StorageError> {
    if table.bytes().any(|b| b == KEY_SEPARATOR) {
        return Err(StorageError::InvalidTableName(table.to_owned()));
    }
    Ok(())
}

/// Frame a logical table name and key into a physical key.
///
/// The format is: `<table_name><separator><key>`
#[must_use]
pub fn frame_key(table: &str, key: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(table.len() + 1 + key.len());
    framed.extend_from_slice(table.as_bytes());
    framed.push(KEY_SEPARATOR);
    framed.extend_from_slice(key);
    framed
}

/// Split a physical key into its logical table name and original key.
///
/// Returns `None` if the key is malformed (missing separator).
#[must_use]
pub fn unframe_key(framed: &[u8]) -> Option<(&str, &[u8])> {
    let sep_pos = framed.iter().position(|&b| b == KEY_SEPARATOR)?;
    let table = std::str::from_utf8(&framed[..sep_pos]).ok()?;
    let key = &framed[sep_pos + 1..];
    Some((table, key))
}

/// The first physical key belonging to a logical table.
#[must_use]
pub fn table_start_key(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(table.len() + 1);
    key.extend_from_slice(table.as_bytes());
    key.push(KEY_SEPARATOR);
    key
}

/// The first physical key that would NOT belong to a logical table.
#[must_use]
pub fn table_end_key(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(table.len() + 1);
    key.extend_from_slice(table.as_bytes());
    key.push(KEY_SEPARATOR + 1);
    key
}
