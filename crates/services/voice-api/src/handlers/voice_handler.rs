//! Speech-to-text and voice chat handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;

use common::extract::ValidatedJson;
use common::AppResult;

use crate::models::{AudioRequest, SttResponse, VoiceChatResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VoiceChatQuery {
    pub session_id: Option<String>,
}

/// Create voice routes
pub fn voice_routes() -> Router<AppState> {
    Router::new()
        .route("/speech-to-text", post(speech_to_text))
        .route("/voice-chat", post(voice_chat))
}

/// Transcribe an utterance introduced by the wake word.
pub async fn speech_to_text(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AudioRequest>,
) -> AppResult<Json<SttResponse>> {
    let audio = payload.decode()?;
    let response = state.stt_service.speech_to_text(audio).await?;
    Ok(Json(response))
}

/// Transcribe, then answer through the companion chat.
pub async fn voice_chat(
    State(state): State<AppState>,
    Query(query): Query<VoiceChatQuery>,
    ValidatedJson(payload): ValidatedJson<AudioRequest>,
) -> Json<VoiceChatResponse> {
    let response = state
        .voice_chat_service
        .voice_chat(payload, query.session_id)
        .await;
    Json(response)
}
