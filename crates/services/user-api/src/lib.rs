//! User API
//!
//! Accounts, families, login sessions, status reports, notifications,
//! messages and reference data for the care-bot. Runs standalone or inside
//! the combined binary.

pub mod clients;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing::info;

use storage::{Database, MigrateAction};

use crate::clients::AiClient;
use crate::config::UserApiConfig;
use crate::routes::create_router;
use crate::state::{AppState, Repositories};

/// Run the user API as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserApiConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserApiConfig::from_env();
    storage::run_migrations(&config.database, action).await?;
    Ok(())
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: UserApiConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize database
    let db = Database::connect(&config.database).await?;
    let db_conn = db.get_connection();

    let ai = Arc::new(AiClient::new(
        config.ai_server_url.clone(),
        Duration::from_secs(config.external_timeout_seconds),
    )?);

    let cleanup_every = Duration::from_secs(config.session_cleanup_interval_seconds);
    let state = AppState::new(Repositories::from_connection(db_conn.clone()), ai, config)
        .with_database(db_conn);

    tokio::spawn(jobs::session_cleanup_task(
        state.auth_service.clone(),
        cleanup_every,
    ));

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("User API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
