//! newtab — backend for a personal "new tab" dashboard.
//!
//! Stores link tiles and folder children in SQLite, serves them as an
//! ordered tree over HTTP, and tracks per-owner settings, visit counts,
//! and free-grid placement.

pub mod app;
pub mod database;
pub mod managers;
pub mod reorder;
pub mod server;
pub mod services;
pub mod tree;
pub mod types;
