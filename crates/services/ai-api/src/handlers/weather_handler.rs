//! Weather and disaster-message lookups by account.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::Value;

use common::AppResult;
use domain::{Weather, WeatherDisplay};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DisasterResponse {
    /// Portal items exactly as published
    pub messages: Vec<Value>,
}

/// Create weather and disaster routes
pub fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather/:user_id", get(weather))
        .route("/weather-info/:user_id", get(weather_info))
        .route("/check-disaster/:user_id", get(check_disaster))
        .route("/disaster-messages/:user_id", get(disaster_messages))
}

/// Forecast codes for the account's address
pub async fn weather(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Weather>> {
    let weather = state.weather_service.weather(&user_id).await?;
    Ok(Json(weather))
}

/// Forecast with labels and units
pub async fn weather_info(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<WeatherDisplay>> {
    let display = state.weather_service.weather_info(&user_id).await?;
    Ok(Json(display))
}

pub async fn check_disaster(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DisasterResponse>> {
    let messages = state.disaster_service.check(&user_id).await?;
    Ok(Json(DisasterResponse { messages }))
}

pub async fn disaster_messages(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DisasterResponse>> {
    let messages = state.disaster_service.cached(&user_id).await?;
    Ok(Json(DisasterResponse { messages }))
}
