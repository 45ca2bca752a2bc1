//! Reference data handlers: regions and news.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use common::AppResult;
use domain::{weather::kst_today, MasterRegion, NewsArticle, SubRegion};

use super::ApiResponse;
use crate::extractors::ValidatedQuery;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewsQuery {
    /// YYYY-MM-DD, today (KST) when omitted
    pub date: Option<NaiveDate>,
}

/// Create tool routes
pub fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/master-region", get(master_regions))
        .route("/sub-region", get(all_sub_regions))
        .route("/sub-region/:master", get(sub_regions_of))
        .route("/news", get(news))
}

/// Province-level regions
#[utoipa::path(
    get,
    path = "/tools/master-region",
    tag = "Tools",
    responses(
        (status = 200, description = "Master regions", body = Vec<MasterRegion>),
        (status = 404, description = "Failed to retrieve master region data")
    )
)]
pub async fn master_regions(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<MasterRegion>>>> {
    let regions = state.tool_service.master_regions().await?;
    Ok(Json(ApiResponse::with_result(
        "Master region data retrieved successfully",
        regions,
    )))
}

/// Every municipal region
#[utoipa::path(
    get,
    path = "/tools/sub-region",
    tag = "Tools",
    responses(
        (status = 200, description = "Sub regions", body = Vec<SubRegion>),
        (status = 404, description = "Failed to retrieve sub region data")
    )
)]
pub async fn all_sub_regions(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<SubRegion>>>> {
    let regions = state.tool_service.sub_regions(None).await?;
    Ok(Json(ApiResponse::with_result(
        "Sub region data retrieved successfully",
        regions,
    )))
}

/// Municipal regions of one province (exact or partial name)
#[utoipa::path(
    get,
    path = "/tools/sub-region/{master}",
    tag = "Tools",
    params(("master" = String, Path, description = "Master region name")),
    responses(
        (status = 200, description = "Sub regions", body = Vec<SubRegion>),
        (status = 404, description = "Failed to retrieve sub region data")
    )
)]
pub async fn sub_regions_of(
    State(state): State<AppState>,
    Path(master): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<SubRegion>>>> {
    let regions = state.tool_service.sub_regions(Some(master)).await?;
    Ok(Json(ApiResponse::with_result(
        "Sub region data retrieved successfully",
        regions,
    )))
}

/// News of a day grouped by category
#[utoipa::path(
    get,
    path = "/tools/news",
    tag = "Tools",
    params(NewsQuery),
    responses((status = 200, description = "News grouped by category"))
)]
pub async fn news(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<NewsQuery>,
) -> AppResult<Json<ApiResponse<BTreeMap<String, Vec<NewsArticle>>>>> {
    let date = query.date.unwrap_or_else(kst_today);
    let grouped = state.tool_service.news(date).await?;
    Ok(Json(ApiResponse::with_result(
        "News retrieved successfully",
        grouped,
    )))
}
