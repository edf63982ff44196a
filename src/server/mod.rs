//! HTTP surface for the newtab dashboard.
//!
//! JSON in, JSON out; errors as `{ "error": msg }` with 4xx/5xx statuses.
//! The router owns the shared [`AppState`]; handlers lock the app only for
//! the duration of a database operation and never across network calls.

pub mod auth;
pub mod config;
pub mod error;
pub mod links;
pub mod settings;

use std::sync::{Arc, Mutex};

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::services::favicon::FaviconClient;
use crate::services::icon_storage::IconStorage;

use config::ServerConfig;

/// Shared state behind the router.
pub struct AppState {
    pub app: Mutex<App>,
    pub icons: IconStorage,
    pub favicons: FaviconClient,
}

impl AppState {
    pub fn new(app: App, config: &ServerConfig) -> Self {
        Self {
            app: Mutex::new(app),
            icons: IconStorage::new(
                config.icon_store_endpoint.clone(),
                config.icon_store_api_key.clone(),
            ),
            favicons: FaviconClient::new(config.favicon_endpoint.clone()),
        }
    }
}

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/links",
            get(links::list_links)
                .post(links::create_link)
                .put(links::update_link)
                .delete(links::delete_link),
        )
        .route("/links/reorder", patch(links::reorder_links))
        .route(
            "/links/children",
            post(links::create_child)
                .put(links::update_child)
                .delete(links::delete_child),
        )
        .route("/links/children/reorder", patch(links::reorder_children))
        .route("/links/grid-position", patch(links::set_grid_position))
        .route("/links/visit", post(links::record_visit))
        .route(
            "/settings",
            get(settings::get_settings).patch(settings::patch_settings),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
