//! Dashboard settings route handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::managers::settings_manager::{SettingsManager, SettingsManagerTrait};

use super::auth::Owner;
use super::error::ApiError;
use super::AppState;

/// GET /settings — the owner's dashboard settings, defaults when unset.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> Result<impl IntoResponse, ApiError> {
    let app = state
        .app
        .lock()
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let mgr = SettingsManager::new(app.db.connection());
    let settings = mgr.get(&owner.0)?;
    Ok(Json(json!({ "settings": settings })))
}

#[derive(Deserialize)]
pub struct SettingsPatch {
    pub key: String,
    pub value: serde_json::Value,
}

/// PATCH /settings — update a single settings key; responds with the full
/// updated document.
pub async fn patch_settings(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Json(body): Json<SettingsPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let app = state
        .app
        .lock()
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let mut mgr = SettingsManager::new(app.db.connection());
    let settings = mgr.set_value(&owner.0, &body.key, body.value)?;
    Ok(Json(json!({ "settings": settings })))
}
