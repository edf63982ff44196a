//! Schema migrations for the newtab SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Migrations are versioned — each runs exactly once and is recorded in
/// the `schema_version` table. Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    // Enable WAL and foreign keys (always, not versioned). Foreign keys must
    // be on for child-link cascade deletes to fire.
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: links, link_children, user_settings")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Add grid_row/grid_column to links for free-grid mode")?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: Create all core tables.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS links (
            id TEXT PRIMARY KEY,
            owner_id TEXT,
            href TEXT,
            label TEXT NOT NULL,
            icon TEXT NOT NULL,
            icon_handle TEXT,
            kind TEXT NOT NULL DEFAULT 'icon',
            position INTEGER NOT NULL DEFAULT 0,
            visit_count INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_links_owner ON links(owner_id);
        CREATE INDEX IF NOT EXISTS idx_links_position ON links(owner_id, position);

        CREATE TABLE IF NOT EXISTS link_children (
            id TEXT PRIMARY KEY,
            parent_id TEXT NOT NULL,
            href TEXT NOT NULL,
            label TEXT NOT NULL,
            icon TEXT NOT NULL,
            icon_handle TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            FOREIGN KEY (parent_id) REFERENCES links(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_link_children_parent ON link_children(parent_id, position);

        CREATE TABLE IF NOT EXISTS user_settings (
            owner_id TEXT PRIMARY KEY,
            settings TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        ",
    )
}

/// V2: Add free-grid placement columns for databases created before V1 included them.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    if conn.prepare("SELECT grid_row FROM links LIMIT 0").is_err() {
        conn.execute_batch(
            "ALTER TABLE links ADD COLUMN grid_row INTEGER;
             ALTER TABLE links ADD COLUMN grid_column INTEGER;",
        )?;
    }
    Ok(())
}
