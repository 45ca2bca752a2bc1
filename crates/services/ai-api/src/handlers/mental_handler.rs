//! Family mental-state generation, called by the user API.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::post,
    Router,
};

use common::AppResult;
use domain::{MentalReport, MentalStatus};

use crate::state::AppState;

/// Create mental routes
pub fn mental_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-emotional-report/:family_id", post(generate_status))
        .route("/generate-mental-period-report/:family_id", post(generate_report))
}

/// Today's mental status of the family's main user
pub async fn generate_status(
    State(state): State<AppState>,
    Path(family_id): Path<String>,
) -> AppResult<Json<MentalStatus>> {
    let status = state.mental_service.generate_status(&family_id).await?;
    Ok(Json(status))
}

/// Report over the last week of mental status
pub async fn generate_report(
    State(state): State<AppState>,
    Path(family_id): Path<String>,
) -> AppResult<Json<MentalReport>> {
    let report = state.mental_service.generate_report(&family_id).await?;
    Ok(Json(report))
}
