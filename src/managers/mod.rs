// Database-backed managers for the newtab dashboard

pub mod link_manager;
pub mod settings_manager;
