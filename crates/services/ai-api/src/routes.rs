//! Route configuration.

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::handlers::{chat_routes, health_routes, mental_routes, weather_routes};
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let tts_dir = ServeDir::new(&state.config.tts.output_dir);

    Router::new()
        .route("/", get(root))
        .nest("/health", health_routes())
        .merge(chat_routes())
        .merge(mental_routes())
        .merge(weather_routes())
        .nest_service("/tts_output", tts_dir)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({"message": "AI 감정 분석 서버 작동 중"}))
}
