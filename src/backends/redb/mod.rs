//! Redb storage backend.
//!
//! This module provides a storage backend implementation using Redb,
//! a pure-Rust embedded database with ACID transactions, single-writer /
//! multi-reader isolation, and ordered key iteration.
//!
//! # Example
//!
//! ```ignore
//! use tabledb::backends::RedbEngine;
//! use tabledb::{StorageEngine, Transaction};
//!
//! // Open a database (creates if it doesn't exist)
//! let engine = RedbEngine::open("my_database.tdb")?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.create_table("users")?;
//! tx.put("users", b"alice", b"30")?;
//! tx.commit()?;
//! ```
//!
//! # In-Memory Databases
//!
//! For testing, you can create an in-memory database that doesn't persist:
//!
//! ```ignore
//! let engine = RedbEngine::in_memory()?;
//! ```

mod engine;
pub mod tables;
mod transaction;

pub use engine::{RedbConfig, RedbEngine};
pub use transaction::{RedbCursor, RedbTransaction};
