//! App core: owns the database and seeds the global defaults.
//!
//! Managers (`LinkManager`, `SettingsManager`) are created on demand via
//! `db.connection()` because they borrow the connection with a lifetime
//! parameter.

use std::path::Path;

use crate::database::connection::Database;
use crate::database::seed;

/// Central application struct holding the database.
///
/// `Database` is `Send` but not `Sync` (it owns the SQLite connection), so
/// the server wraps `App` in a `Mutex` and takes the lock per operation.
pub struct App {
    pub db: Database,
}

impl App {
    /// Opens the database at the given path, runs migrations, and seeds the
    /// default link template on first run.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open(db_path)?;
        let seeded = seed::seed_global_links(db.connection())
            .map_err(|e| format!("seeding default links failed: {}", e))?;
        if seeded > 0 {
            tracing::info!(links = seeded, "seeded default link template");
        }
        Ok(Self { db })
    }

    /// In-memory app for tests; migrations and seeding run the same way.
    pub fn open_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open_in_memory()?;
        seed::seed_global_links(db.connection())
            .map_err(|e| format!("seeding default links failed: {}", e))?;
        Ok(Self { db })
    }
}
