//! Newtab database layer.
//!
//! Provides SQLite connection management, schema migrations, and seeding of
//! the default link template plus its per-owner copies.
//!
//! # Usage
//!
//! ```no_run
//! use newtab::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("newtab.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//!
//! // Access the underlying connection for queries
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;
pub mod seed;

pub use connection::Database;
