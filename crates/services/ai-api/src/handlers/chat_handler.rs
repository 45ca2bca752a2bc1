//! Chat handlers: companion chat, conversation logs and daily reports.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use common::extract::{ValidatedJson, ValidatedQuery};
use common::AppResult;
use domain::weather::kst_today;
use domain::{ChatTurn, EmotionalReport};

use crate::service::ChatReply;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    /// New session when absent or unknown
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "User message is required"))]
    pub user_message: String,
}

/// `user_id` and an optional day, today (KST) when omitted.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UserDayQuery {
    #[validate(length(min = 1, message = "User ID is required"))]
    pub user_id: String,
    pub date: Option<NaiveDate>,
}

impl UserDayQuery {
    fn day(&self) -> NaiveDate {
        self.date.unwrap_or_else(kst_today)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UserQuery {
    #[validate(length(min = 1, message = "User ID is required"))]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

/// Create chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/conversations", get(conversations))
        .route("/emotion-report", post(save_emotion_report))
        .route("/generate-emotional-report", get(emotional_report))
        .route("/generate-keyword", get(keywords))
}

/// Answer one message of the companion chat.
pub async fn chat(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    tracing::info!(session_id = ?payload.session_id, "Chat request received");
    let reply = state
        .chat_service
        .chat(payload.session_id, payload.user_id, payload.user_message)
        .await?;
    Ok(Json(reply))
}

pub async fn conversations(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<UserDayQuery>,
) -> AppResult<Json<Vec<ChatTurn>>> {
    let turns = state
        .chat_service
        .conversations(&query.user_id, query.day())
        .await?;
    Ok(Json(turns))
}

/// Store an emotion report produced by a client.
pub async fn save_emotion_report(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<UserQuery>,
    Json(report): Json<Value>,
) -> AppResult<Json<Value>> {
    state
        .chat_service
        .save_emotion_report(&query.user_id, report)
        .await?;
    Ok(Json(json!({"success": true})))
}

pub async fn emotional_report(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<UserDayQuery>,
) -> AppResult<Json<EmotionalReport>> {
    let report = state
        .chat_service
        .emotional_report(&query.user_id, query.day())
        .await?;
    Ok(Json(report))
}

pub async fn keywords(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<UserDayQuery>,
) -> AppResult<Json<KeywordsResponse>> {
    let keywords = state
        .chat_service
        .keywords(&query.user_id, query.day())
        .await?;
    Ok(Json(KeywordsResponse { keywords }))
}
