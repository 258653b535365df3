//! QuizDeck database layer.
//!
//! Provides SQLite connection management, schema migrations, and the
//! key-value store that backs the visit ledger and visited flags.
//!
//! # Usage
//!
//! ```no_run
//! use quizdeck::database::{Database, KeyValueStore, SqliteStore};
//! use std::sync::Arc;
//!
//! let db = Arc::new(Database::open("quizdeck.db").expect("failed to open database"));
//! let store = SqliteStore::new(db);
//! store.set("greeting", "\"hello\"").unwrap();
//! ```

pub mod connection;
pub mod migrations;
pub mod store;

pub use connection::Database;
pub use store::{KeyValueStore, SqliteStore};
