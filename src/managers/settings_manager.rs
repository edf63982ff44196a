//! Per-owner dashboard settings.
//!
//! Implements `SettingsManagerTrait` — settings are stored as one JSON
//! document per owner in the `user_settings` table. Single-key updates are
//! validated by a serialize/patch/deserialize round-trip so an invalid key
//! or a wrong-typed value never reaches the database.

use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};

use crate::types::errors::SettingsError;
use crate::types::settings::DashboardSettings;

/// Trait defining settings operations.
pub trait SettingsManagerTrait {
    fn get(&self, owner: &str) -> Result<DashboardSettings, SettingsError>;
    fn put(&mut self, owner: &str, settings: &DashboardSettings) -> Result<(), SettingsError>;
    fn set_value(
        &mut self,
        owner: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<DashboardSettings, SettingsError>;
}

/// Settings manager backed by a SQLite connection.
pub struct SettingsManager<'a> {
    conn: &'a Connection,
}

impl<'a> SettingsManager<'a> {
    /// Creates a new `SettingsManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl<'a> SettingsManagerTrait for SettingsManager<'a> {
    /// Loads an owner's settings, falling back to defaults when the owner
    /// has never saved any.
    fn get(&self, owner: &str) -> Result<DashboardSettings, SettingsError> {
        let result: Result<String, rusqlite::Error> = self.conn.query_row(
            "SELECT settings FROM user_settings WHERE owner_id = ?1",
            params![owner],
            |row| row.get(0),
        );

        match result {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| SettingsError::SerializationError(e.to_string())),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(DashboardSettings::default()),
            Err(e) => Err(SettingsError::DatabaseError(e.to_string())),
        }
    }

    /// Replaces an owner's settings document.
    fn put(&mut self, owner: &str, settings: &DashboardSettings) -> Result<(), SettingsError> {
        let json = serde_json::to_string(settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        let now = Self::now();

        self.conn
            .execute(
                "INSERT INTO user_settings (owner_id, settings, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(owner_id) DO UPDATE SET settings = ?2, updated_at = ?3",
                params![owner, json, now],
            )
            .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Updates a single settings key.
    ///
    /// Serializes the current settings to a JSON object, replaces the key,
    /// then deserializes back into `DashboardSettings` to validate the new
    /// value before persisting. Returns the updated settings.
    fn set_value(
        &mut self,
        owner: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<DashboardSettings, SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let current = self.get(owner)?;
        let mut json_value = serde_json::to_value(&current)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;

        match json_value {
            serde_json::Value::Object(ref mut map) => {
                if !map.contains_key(key) {
                    return Err(SettingsError::InvalidKey(format!(
                        "Key '{}' not found in settings",
                        key
                    )));
                }
                map.insert(key.to_string(), value);
            }
            _ => {
                return Err(SettingsError::SerializationError(
                    "Settings did not serialize to an object".to_string(),
                ))
            }
        }

        let updated: DashboardSettings = serde_json::from_value(json_value)
            .map_err(|e| SettingsError::InvalidValue(format!("Invalid value for '{}': {}", key, e)))?;

        self.put(owner, &updated)?;
        Ok(updated)
    }
}
