//! `tabledb`
//!
//! A table-oriented access layer over an embedded, transactional, ordered
//! key-value storage engine.
//!
//! A [`Database`] holds named tables of byte-string key/value pairs. Keys and
//! values are accepted as any supported Rust shape through the [`Value`]
//! union and encoded to canonical bytes. Each table carries a persistent
//! auto-increment counter for keyless insertion, and tables can be traversed
//! in ascending key order with a caller-supplied reducer.
//!
//! # Example
//!
//! ```ignore
//! use tabledb::Database;
//!
//! let mut db = Database::open("app.tdb", 0o600)?;
//! db.create_table("users")?;
//! db.set("users", "alice", 30u32)?;
//!
//! assert_eq!(db.get("users", "alice"), Some(b"30".to_vec()));
//!
//! db.create_table("log")?;
//! db.add("log", "first event")?; // auto-keyed by the table's counter
//! db.close();
//! ```
//!
//! # Modules
//!
//! - [`database`] - The [`Database`] handle and its table operations
//! - [`value`] - The [`Value`] union of supported key/value shapes
//! - [`encoding`] - Canonical byte encoding for values
//! - [`engine`] - Storage engine traits and abstractions
//! - [`backends`] - Concrete storage backend implementations

pub mod backends;
pub mod database;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod value;

pub use database::Database;
pub use engine::{Cursor, StorageEngine, StorageError, StorageResult, Transaction};
pub use error::{Error, Result};
pub use value::Value;
