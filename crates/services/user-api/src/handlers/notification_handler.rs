//! Notification handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult};
use domain::{NewNotification, Notification, NotificationGrade, SortOrder};

use super::{listing, ApiResponse};
use crate::extractors::{require_query, require_text, ValidatedJson, ValidatedQuery};
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateNotificationRequest {
    pub family_id: Option<String>,
    /// INFO, WARN, CRIT or NONE (default)
    #[schema(example = "WARN")]
    pub notification_grade: Option<String>,
    pub descriptions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    #[serde(rename = "familyId")]
    #[param(rename = "familyId")]
    pub family_id: Option<String>,
    /// asc (default) or desc by creation time
    pub order: Option<SortOrder>,
}

/// Create notification routes
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all).post(create_notification))
        .route("/new", get(list_unread))
        .route("/:index/read", patch(mark_read))
        .route("/:index", delete(delete_notification))
}

/// Send a notification to a family
#[utoipa::path(
    post,
    path = "/notifications",
    tag = "Notifications",
    security(("session_cookie" = [])),
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "New notification created successfully", body = Notification),
        (status = 400, description = "Invalid notification grade"),
        (status = 403, description = "You do not have permission"),
        (status = 404, description = "Family not found"),
        (status = 422, description = "Family ID or descriptions missing")
    )
)]
pub async fn create_notification(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateNotificationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Notification>>)> {
    let family_id = require_text(payload.family_id.clone(), "family_id", "Family ID", &payload)?;
    let description = require_text(
        payload.descriptions.clone(),
        "descriptions",
        "Descriptions",
        &payload,
    )?;
    let grade = match payload.notification_grade.as_deref() {
        Some(value) if !value.is_empty() => NotificationGrade::parse(value)
            .map_err(|e| AppError::from(e).with_input(&payload))?,
        _ => NotificationGrade::default(),
    };

    let notification = state
        .notification_service
        .create(
            &current_user,
            NewNotification {
                family_id,
                notification_grade: grade,
                description,
                message_sn: None,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_result(
            "New notification created successfully",
            notification,
        )),
    ))
}

async fn list(
    state: &AppState,
    current_user: &CurrentUser,
    query: &NotificationQuery,
    unread_only: bool,
) -> AppResult<Vec<Notification>> {
    let family_id = require_query(query.family_id.clone(), "familyId", "Family ID", query)?;
    state
        .notification_service
        .list(
            current_user,
            &family_id,
            unread_only,
            query.order.unwrap_or_default(),
        )
        .await
}

/// Unread notifications of a family
#[utoipa::path(
    get,
    path = "/notifications/new",
    tag = "Notifications",
    security(("session_cookie" = [])),
    params(NotificationQuery),
    responses((status = 200, description = "Unread notifications", body = Vec<Notification>))
)]
pub async fn list_unread(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<NotificationQuery>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let notifications = list(&state, &current_user, &query, true).await?;
    Ok(Json(listing(
        notifications,
        "New notifications retrieved successfully",
        "No new notifications found",
    )))
}

/// Every notification of a family
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "Notifications",
    security(("session_cookie" = [])),
    params(NotificationQuery),
    responses((status = 200, description = "All notifications", body = Vec<Notification>))
)]
pub async fn list_all(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedQuery(query): ValidatedQuery<NotificationQuery>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let notifications = list(&state, &current_user, &query, false).await?;
    Ok(Json(listing(
        notifications,
        "All notifications retrieved successfully",
        "No notifications found",
    )))
}

/// Mark a notification as read
#[utoipa::path(
    patch,
    path = "/notifications/{index}/read",
    tag = "Notifications",
    security(("session_cookie" = [])),
    params(("index" = i32, Path, description = "Notification index")),
    responses(
        (status = 200, description = "Notification marked as read", body = Notification),
        (status = 403, description = "You do not have permission"),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(index): Path<i32>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = state
        .notification_service
        .mark_read(&current_user, index)
        .await?;
    Ok(Json(ApiResponse::with_result(
        "Notification marked as read",
        notification,
    )))
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/notifications/{index}",
    tag = "Notifications",
    security(("session_cookie" = [])),
    params(("index" = i32, Path, description = "Notification index")),
    responses(
        (status = 200, description = "Notification deleted successfully"),
        (status = 403, description = "You do not have permission"),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(index): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .notification_service
        .delete(&current_user, index)
        .await?;
    Ok(Json(ApiResponse::message("Notification deleted successfully")))
}
