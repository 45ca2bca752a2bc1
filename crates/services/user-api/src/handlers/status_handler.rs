//! Status handlers.
//!
//! Every status kind shares the same list / latest / delete-latest routes;
//! the kind is bound when the router is built.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, MethodRouter},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{ActiveStatus, HealthStatus, HomeStatus, StatusKind};
use storage::{NewActiveStatus, NewHealthStatus, NewHomeStatus, TimeRange};

use super::ApiResponse;
use crate::extractors::{require_query, require_text, ValidatedJson, ValidatedQuery};
use crate::middleware::CurrentUser;
use crate::service::{StatusRecord, StatusRecords};
use crate::state::AppState;

/// `familyId` plus an optional time window.
#[derive(Debug, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    #[serde(rename = "familyId")]
    #[param(rename = "familyId")]
    pub family_id: Option<String>,
    /// Inclusive lower bound (RFC 3339)
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound (RFC 3339)
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FamilyQuery {
    #[serde(rename = "familyId")]
    #[param(rename = "familyId")]
    pub family_id: Option<String>,
}

impl FamilyQuery {
    fn family_id(&self) -> AppResult<String> {
        require_query(self.family_id.clone(), "familyId", "Family ID", self)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct HomeStatusRequest {
    pub family_id: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub dust_level: Option<f64>,
    pub ethanol: Option<f64>,
    #[validate(length(max = 255, message = "Others must be at most 255 characters"))]
    pub others: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct HealthStatusRequest {
    pub family_id: Option<String>,
    #[validate(range(min = 0.0, max = 300.0, message = "Heart rate is out of range"))]
    pub heart_rate: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ActiveStatusRequest {
    pub family_id: Option<String>,
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100"))]
    pub score: Option<i32>,
    pub action: Option<String>,
    pub is_critical: Option<bool>,
    pub description: Option<String>,
}

/// Create status routes
pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/home", list_route(StatusKind::Home).post(record_home))
        .route("/home/latest", latest_route(StatusKind::Home))
        .route("/health", list_route(StatusKind::Health).post(record_health))
        .route("/health/latest", latest_route(StatusKind::Health))
        .route("/active", list_route(StatusKind::Active).post(record_active))
        .route("/active/latest", latest_route(StatusKind::Active))
        .route("/mental/new", get(generate_mental_status))
        .route("/mental", list_route(StatusKind::Mental))
        .route("/mental/latest", latest_route(StatusKind::Mental))
        .route("/mental/reports/new", post(generate_mental_report))
        .route("/mental/reports", list_route(StatusKind::MentalReport))
        .route("/mental/reports/latest", latest_route(StatusKind::MentalReport))
}

fn list_route(kind: StatusKind) -> MethodRouter<AppState> {
    get(
        move |state: State<AppState>,
              user: Extension<CurrentUser>,
              query: ValidatedQuery<StatusQuery>| list_status(kind, state, user, query),
    )
}

fn latest_route(kind: StatusKind) -> MethodRouter<AppState> {
    get(
        move |state: State<AppState>,
              user: Extension<CurrentUser>,
              query: ValidatedQuery<FamilyQuery>| latest_status(kind, state, user, query),
    )
    .delete(
        move |state: State<AppState>,
              user: Extension<CurrentUser>,
              query: ValidatedQuery<FamilyQuery>| {
            delete_latest_status(kind, state, user, query)
        },
    )
}

/// Record indoor environment readings
#[utoipa::path(
    post,
    path = "/status/home",
    tag = "Status",
    security(("session_cookie" = [])),
    request_body = HomeStatusRequest,
    responses(
        (status = 201, description = "New home status created successfully", body = HomeStatus),
        (status = 403, description = "You do not have permission"),
        (status = 404, description = "Family not found"),
        (status = 422, description = "Family ID is required")
    )
)]
pub async fn record_home(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<HomeStatusRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<HomeStatus>>)> {
    let family_id = require_text(payload.family_id.clone(), "family_id", "Family ID", &payload)?;
    let row = state
        .status_service
        .record_home(
            &current_user,
            NewHomeStatus {
                family_id,
                temperature: payload.temperature,
                humidity: payload.humidity,
                dust_level: payload.dust_level,
                ethanol: payload.ethanol,
                others: payload.others,
            },
        )
        .await?;
    Ok(created(StatusKind::Home, row))
}

/// Record vital signs
#[utoipa::path(
    post,
    path = "/status/health",
    tag = "Status",
    security(("session_cookie" = [])),
    request_body = HealthStatusRequest,
    responses(
        (status = 201, description = "New health status created successfully", body = HealthStatus),
        (status = 403, description = "You do not have permission"),
        (status = 422, description = "Family ID is required")
    )
)]
pub async fn record_health(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<HealthStatusRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<HealthStatus>>)> {
    let family_id = require_text(payload.family_id.clone(), "family_id", "Family ID", &payload)?;
    let row = state
        .status_service
        .record_health(
            &current_user,
            NewHealthStatus {
                family_id,
                heart_rate: payload.heart_rate,
            },
        )
        .await?;
    Ok(created(StatusKind::Health, row))
}

/// Record an activity summary
#[utoipa::path(
    post,
    path = "/status/active",
    tag = "Status",
    security(("session_cookie" = [])),
    request_body = ActiveStatusRequest,
    responses(
        (status = 201, description = "New active status created successfully", body = ActiveStatus),
        (status = 403, description = "You do not have permission"),
        (status = 422, description = "Family ID is required")
    )
)]
pub async fn record_active(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ActiveStatusRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ActiveStatus>>)> {
    let family_id = require_text(payload.family_id.clone(), "family_id", "Family ID", &payload)?;
    let row = state
        .status_service
        .record_active(
            &current_user,
            NewActiveStatus {
                family_id,
                score: payload.score,
                action: payload.action,
                is_critical: payload.is_critical,
                description: payload.description,
            },
        )
        .await?;
    Ok(created(StatusKind::Active, row))
}

fn created<T: Serialize>(kind: StatusKind, row: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::with_result(
            format!("New {} created successfully", kind.label()),
            row,
        )),
    )
}

async fn list_status(
    kind: StatusKind,
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<StatusQuery>,
) -> AppResult<Json<ApiResponse<StatusRecords>>> {
    let family_id = require_query(query.family_id.clone(), "familyId", "Family ID", &query)?;
    let records = state
        .status_service
        .list(
            &current_user,
            kind,
            &family_id,
            TimeRange::new(query.start, query.end),
        )
        .await?;

    let message = if records.is_empty() {
        kind.empty_message()
    } else {
        kind.retrieved_message()
    };
    Ok(Json(ApiResponse::with_result(message, records)))
}

async fn latest_status(
    kind: StatusKind,
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<FamilyQuery>,
) -> AppResult<Json<ApiResponse<StatusRecord>>> {
    let family_id = query.family_id()?;
    let record = state
        .status_service
        .latest(&current_user, kind, &family_id)
        .await?;
    Ok(Json(ApiResponse::with_result(
        format!("Latest {} retrieved successfully", kind.label()),
        record,
    )))
}

async fn delete_latest_status(
    kind: StatusKind,
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<FamilyQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    let family_id = query.family_id()?;
    state
        .status_service
        .delete_latest(&current_user, kind, &family_id)
        .await?;
    Ok(Json(ApiResponse::message(format!(
        "Latest {} deleted successfully",
        kind.label()
    ))))
}

/// Generate today's mental status on the AI server
#[utoipa::path(
    get,
    path = "/status/mental/new",
    tag = "Status",
    security(("session_cookie" = [])),
    params(FamilyQuery),
    responses(
        (status = 200, description = "Mental status generated successfully"),
        (status = 404, description = "Nothing to analyse"),
        (status = 500, description = "AI server unreachable")
    )
)]
pub async fn generate_mental_status(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<FamilyQuery>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let family_id = query.family_id()?;
    let result = state
        .status_service
        .generate_mental_status(&current_user, &family_id)
        .await?;
    Ok(Json(ApiResponse::with_result(
        "Mental status generated successfully",
        result,
    )))
}

/// Generate a mental report over the recent period on the AI server
#[utoipa::path(
    post,
    path = "/status/mental/reports/new",
    tag = "Status",
    security(("session_cookie" = [])),
    params(FamilyQuery),
    responses(
        (status = 200, description = "Mental report generated successfully"),
        (status = 404, description = "No mental status to report on"),
        (status = 500, description = "AI server unreachable")
    )
)]
pub async fn generate_mental_report(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<FamilyQuery>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let family_id = query.family_id()?;
    let result = state
        .status_service
        .generate_mental_report(&current_user, &family_id)
        .await?;
    Ok(Json(ApiResponse::with_result(
        "Mental report generated successfully",
        result,
    )))
}
