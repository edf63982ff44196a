// Shared type definitions for the newtab dashboard

pub mod errors;
pub mod link;
pub mod settings;
