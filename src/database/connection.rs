//! SQLite handle for the dashboard.
//!
//! [`Database`] owns the single `rusqlite::Connection`. Opening a database
//! always brings the schema up to the current version first, so callers
//! never observe a partially migrated file.

use std::path::Path;

use rusqlite::Connection;

use super::migrations;

/// Owns the SQLite connection behind the link and settings stores.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file and runs pending migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database for tests; discarded when the value is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    /// The underlying connection; managers borrow it per operation.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
