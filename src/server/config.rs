//! Server configuration from environment variables.

use std::path::PathBuf;

use crate::services::favicon::DEFAULT_FAVICON_ENDPOINT;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// SQLite database file path.
    pub db_path: PathBuf,
    /// Icon storage endpoint; uploads are disabled when unset.
    pub icon_store_endpoint: Option<String>,
    pub icon_store_api_key: Option<String>,
    /// Favicon lookup endpoint.
    pub favicon_endpoint: String,
}

impl ServerConfig {
    /// Builds the configuration from `NEWTAB_*` environment variables.
    ///
    /// The database lives under `NEWTAB_DATA_DIR` when set, otherwise next
    /// to the executable, falling back to the working directory.
    pub fn from_env() -> Self {
        let db_path = if let Ok(dir) = std::env::var("NEWTAB_DATA_DIR") {
            PathBuf::from(dir).join("newtab.db")
        } else if let Ok(exe) = std::env::current_exe() {
            exe.parent()
                .unwrap_or_else(|| std::path::Path::new("."))
                .join("newtab.db")
        } else {
            PathBuf::from("newtab.db")
        };

        Self {
            bind_addr: std::env::var("NEWTAB_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8090".to_string()),
            db_path,
            icon_store_endpoint: std::env::var("NEWTAB_ICON_STORE_ENDPOINT").ok(),
            icon_store_api_key: std::env::var("NEWTAB_ICON_STORE_API_KEY").ok(),
            favicon_endpoint: std::env::var("NEWTAB_FAVICON_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_FAVICON_ENDPOINT.to_string()),
        }
    }
}
