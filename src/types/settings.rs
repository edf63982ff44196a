use serde::{Deserialize, Serialize};

/// Active ordering mode for the link grid.
///
/// `Custom` renders by the persisted `position` values, `MostVisited` by
/// descending visit count, `Grid` by the free-placement row/column fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    Custom,
    MostVisited,
    Grid,
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::Custom
    }
}

/// Per-owner dashboard settings, stored as a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardSettings {
    pub sort_mode: SortMode,
    /// Name used by the greeting banner; `None` falls back to the account name.
    pub greeting_name: Option<String>,
    pub show_weather: bool,
    pub show_metals: bool,
    pub clock_24h: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::Custom,
            greeting_name: None,
            show_weather: true,
            show_metals: true,
            clock_24h: false,
        }
    }
}
