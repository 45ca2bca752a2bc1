//! Route configuration.

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handlers::{health_routes, voice_routes};
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .merge(voice_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
