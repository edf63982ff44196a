//! Unit tests for database opening, migrations, and seeding.

use newtab::database::migrations::{self, CURRENT_SCHEMA_VERSION};
use newtab::database::seed;
use newtab::database::Database;
use newtab::managers::link_manager::{LinkManager, LinkManagerTrait};

fn table_exists(db: &Database, name: &str) -> bool {
    let count: i32 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            rusqlite::params![name],
            |row| row.get(0),
        )
        .unwrap();
    count > 0
}

#[test]
fn test_open_in_memory_creates_schema() {
    let db = Database::open_in_memory().unwrap();
    assert!(table_exists(&db, "links"));
    assert!(table_exists(&db, "link_children"));
    assert!(table_exists(&db, "user_settings"));
    assert!(table_exists(&db, "schema_version"));
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().unwrap();
    migrations::run_all(db.connection()).unwrap();
    migrations::run_all(db.connection()).unwrap();
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_foreign_keys_are_enabled() {
    let db = Database::open_in_memory().unwrap();
    let enabled: i32 = db
        .connection()
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn test_grid_columns_exist() {
    let db = Database::open_in_memory().unwrap();
    // Selecting the v2 columns must not error on a fresh database.
    db.connection()
        .prepare("SELECT grid_row, grid_column FROM links LIMIT 0")
        .unwrap();
}

#[test]
fn test_v2_migration_upgrades_a_v1_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.db");

    // Lay down a database as V1 left it: no grid columns, version recorded.
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (
                 version INTEGER PRIMARY KEY,
                 applied_at INTEGER NOT NULL,
                 description TEXT NOT NULL
             );
             INSERT INTO schema_version VALUES (1, 0, 'initial');
             CREATE TABLE links (
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
             CREATE TABLE link_children (
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
             CREATE TABLE user_settings (
                 owner_id TEXT PRIMARY KEY,
                 settings TEXT NOT NULL,
                 updated_at INTEGER NOT NULL
             );",
        )
        .unwrap();
    }

    // Reopening must apply V2 and leave the grid columns queryable.
    let db = Database::open(&path).unwrap();
    db.connection()
        .prepare("SELECT grid_row, grid_column FROM links LIMIT 0")
        .unwrap();
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_open_file_database_persists_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newtab.db");

    {
        let db = Database::open(&path).unwrap();
        assert_eq!(
            migrations::get_schema_version(db.connection()),
            CURRENT_SCHEMA_VERSION
        );
    }

    // Reopening runs migrations again; version must not change or error.
    let db = Database::open(&path).unwrap();
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_seed_creates_global_links_once() {
    let db = Database::open_in_memory().unwrap();

    let first = seed::seed_global_links(db.connection()).unwrap();
    assert!(first > 0);

    let second = seed::seed_global_links(db.connection()).unwrap();
    assert_eq!(second, 0);

    let count: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM links WHERE owner_id IS NULL",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count as usize, first);
}

#[test]
fn test_new_owner_receives_copies_of_the_default_links() {
    let db = Database::open_in_memory().unwrap();
    seed::seed_global_links(db.connection()).unwrap();

    let copied = seed::seed_owner_links(db.connection(), "u1").unwrap();
    assert!(copied > 0);

    let mgr = LinkManager::new(db.connection());
    let template = mgr.list_tree(None).unwrap();
    let mine = mgr.list_tree(Some("u1")).unwrap();
    assert_eq!(mine.len(), template.len());

    // Same labels in the same order, but fresh ids owned by the user.
    for (copy, original) in mine.iter().zip(&template) {
        assert_eq!(copy.link.label, original.link.label);
        assert_eq!(copy.link.position, original.link.position);
        assert_ne!(copy.link.id, original.link.id);
        assert_eq!(copy.link.owner_id.as_deref(), Some("u1"));
    }

    // The folder comes across with its children.
    let folder = mine.iter().find(|n| n.children.is_some()).unwrap();
    assert_eq!(folder.children.as_ref().unwrap().len(), 3);
}

#[test]
fn test_owner_seed_runs_only_while_owner_has_no_links() {
    let db = Database::open_in_memory().unwrap();
    seed::seed_global_links(db.connection()).unwrap();

    assert!(seed::seed_owner_links(db.connection(), "u1").unwrap() > 0);
    assert_eq!(seed::seed_owner_links(db.connection(), "u1").unwrap(), 0);

    // Deleting every copy makes the owner eligible again.
    let mut mgr = LinkManager::new(db.connection());
    for link in mgr.list(Some("u1")).unwrap() {
        mgr.delete(&link.id).unwrap();
    }
    assert!(seed::seed_owner_links(db.connection(), "u1").unwrap() > 0);
}

#[test]
fn test_owner_edits_never_touch_the_template() {
    let db = Database::open_in_memory().unwrap();
    seed::seed_global_links(db.connection()).unwrap();
    seed::seed_owner_links(db.connection(), "u1").unwrap();

    let mut mgr = LinkManager::new(db.connection());
    let before = mgr.list(None).unwrap();

    for link in mgr.list(Some("u1")).unwrap() {
        mgr.delete(&link.id).unwrap();
    }

    assert_eq!(mgr.list(None).unwrap(), before);
}

#[test]
fn test_seed_includes_a_folder_with_children() {
    let db = Database::open_in_memory().unwrap();
    seed::seed_global_links(db.connection()).unwrap();

    let folders: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM links WHERE owner_id IS NULL AND kind = 'list'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(folders >= 1);

    let children: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM link_children", [], |row| row.get(0))
        .unwrap();
    assert!(children >= 1);
}
