use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use newtab::app::App;
use newtab::server::config::ServerConfig;
use newtab::server::{router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(db = %config.db_path.display(), "opening database");

    let app = match App::new(&config.db_path) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "failed to open database");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(app, &config));
    let router = router(state);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %config.bind_addr, "listening");

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
