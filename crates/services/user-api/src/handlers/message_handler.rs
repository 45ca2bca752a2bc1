//! Direct message handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{Message, Receiver};

use super::{listing, ApiResponse};
use crate::extractors::{require_text, ValidatedJson};
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    pub to_id: Option<String>,
    #[validate(length(max = 1000, message = "Content must be at most 1000 characters"))]
    pub content: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Create message routes
pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/receivable", get(receivable))
        .route("/send", post(send_message))
        .route("/new", get(list_new))
        .route("/all", get(list_all))
        .route("/sent", get(list_sent))
        .route("/read/:index", patch(mark_read))
        .route("/delete/:index", delete(delete_message))
}

/// Accounts sharing a family with the current user
#[utoipa::path(
    get,
    path = "/messages/receivable",
    tag = "Messages",
    security(("session_cookie" = [])),
    responses((status = 200, description = "Receivers", body = Vec<Receiver>))
)]
pub async fn receivable(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<Receiver>>>> {
    let receivers = state.message_service.receivers(&current_user).await?;
    Ok(Json(listing(
        receivers,
        "Receivable users retrieved successfully",
        "No receivable users found",
    )))
}

/// Send a message
#[utoipa::path(
    post,
    path = "/messages/send",
    tag = "Messages",
    security(("session_cookie" = [])),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent successfully", body = Message),
        (status = 403, description = "You can not send a message to this user"),
        (status = 422, description = "Receiver or content missing")
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Message>>)> {
    let to_id = require_text(payload.to_id.clone(), "to_id", "Receiver ID", &payload)?;
    let content = require_text(payload.content.clone(), "content", "Content", &payload)?;

    let message = state
        .message_service
        .send(&current_user, &to_id, content, payload.image_url)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_result("Message sent successfully", message)),
    ))
}

/// Unread received messages
#[utoipa::path(
    get,
    path = "/messages/new",
    tag = "Messages",
    security(("session_cookie" = [])),
    responses((status = 200, description = "Unread messages", body = Vec<Message>))
)]
pub async fn list_new(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<Message>>>> {
    let messages = state.message_service.received(&current_user, true).await?;
    Ok(Json(listing(
        messages,
        "New messages retrieved successfully",
        "No new messages found",
    )))
}

/// Every received message
#[utoipa::path(
    get,
    path = "/messages/all",
    tag = "Messages",
    security(("session_cookie" = [])),
    responses((status = 200, description = "Received messages", body = Vec<Message>))
)]
pub async fn list_all(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<Message>>>> {
    let messages = state.message_service.received(&current_user, false).await?;
    Ok(Json(listing(
        messages,
        "All messages retrieved successfully",
        "No messages found",
    )))
}

/// Messages sent by the current user
#[utoipa::path(
    get,
    path = "/messages/sent",
    tag = "Messages",
    security(("session_cookie" = [])),
    responses((status = 200, description = "Sent messages", body = Vec<Message>))
)]
pub async fn list_sent(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<Message>>>> {
    let messages = state.message_service.sent(&current_user).await?;
    Ok(Json(listing(
        messages,
        "Sent messages retrieved successfully",
        "No sent messages found",
    )))
}

/// Mark a received message as read
#[utoipa::path(
    patch,
    path = "/messages/read/{index}",
    tag = "Messages",
    security(("session_cookie" = [])),
    params(("index" = i32, Path, description = "Message index")),
    responses(
        (status = 200, description = "Message marked as read", body = Message),
        (status = 403, description = "You do not have permission"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(index): Path<i32>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let message = state.message_service.mark_read(&current_user, index).await?;
    Ok(Json(ApiResponse::with_result("Message marked as read", message)))
}

/// Delete a sent or received message
#[utoipa::path(
    delete,
    path = "/messages/delete/{index}",
    tag = "Messages",
    security(("session_cookie" = [])),
    params(("index" = i32, Path, description = "Message index")),
    responses(
        (status = 200, description = "Message deleted successfully"),
        (status = 403, description = "You do not have permission"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(index): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.message_service.delete(&current_user, index).await?;
    Ok(Json(ApiResponse::message("Message deleted successfully")))
}
