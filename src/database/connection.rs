//! SQLite connection management for QuizDeck.
//!
//! Wraps a `rusqlite::Connection` and runs schema migrations on open, so
//! every consumer sees the `kv_store` and `asset_cache` tables.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// Core database wrapper providing SQLite connection management.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or
    /// migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Opens an in-memory database and runs migrations. The data is discarded
    /// when the `Database` is dropped; used throughout the test suite.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Returns a reference to the underlying `rusqlite::Connection` for
    /// modules that execute their own queries (the store, the cache controller).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
