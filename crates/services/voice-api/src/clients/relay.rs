//! HTTP relay to the STT endpoint and the chat endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use common::{AppError, AppResult};

use crate::models::{AudioRequest, SttResponse};

const STT_FAILED: &str = "음성 인식 처리 중 오류가 발생했습니다";
const STT_EMPTY: &str = "음성 인식 결과가 없습니다";

/// What the STT endpoint made of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Text(String),
    /// No transcript, with the reason given by the endpoint
    Rejected(String),
}

/// Calls made by the voice-chat pipeline. Timeouts surface as
/// [`AppError::Timeout`].
#[async_trait]
pub trait VoiceRelay: Send + Sync {
    async fn transcribe(&self, audio: &AudioRequest) -> AppResult<Transcription>;

    /// Chat answer as returned by the chat endpoint
    async fn chat(&self, message: &str, session_id: Option<&str>) -> AppResult<Value>;
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    user_message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

/// Reason carried by a rejected STT answer: the `error` field, else the
/// message of an error envelope.
fn rejection_reason(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/detail/message").and_then(Value::as_str))
        .or_else(|| body.get("detail").and_then(Value::as_str))
        .map(str::to_string)
}

/// reqwest implementation of [`VoiceRelay`].
pub struct HttpRelay {
    http_client: reqwest::Client,
    stt_url: String,
    chat_url: String,
    stt_timeout: Duration,
    chat_timeout: Duration,
}

impl HttpRelay {
    pub fn new(
        stt_url: impl Into<String>,
        chat_url: impl Into<String>,
        stt_timeout: Duration,
        chat_timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build relay client: {}", e)))?;

        Ok(Self {
            http_client,
            stt_url: stt_url.into(),
            chat_url: chat_url.into(),
            stt_timeout,
            chat_timeout,
        })
    }
}

fn send_error(target: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::timeout(format!("{} request timed out", target))
    } else {
        AppError::upstream(format!("{} request failed: {}", target, e))
    }
}

#[async_trait]
impl VoiceRelay for HttpRelay {
    async fn transcribe(&self, audio: &AudioRequest) -> AppResult<Transcription> {
        tracing::info!("Calling STT API");
        let response = self
            .http_client
            .post(&self.stt_url)
            .timeout(self.stt_timeout)
            .json(audio)
            .send()
            .await
            .map_err(|e| send_error("STT", e))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let reason = rejection_reason(&body).unwrap_or_else(|| STT_FAILED.to_string());
            tracing::error!(%status, "STT API error: {}", reason);
            return Ok(Transcription::Rejected(reason));
        }

        let stt: SttResponse = serde_json::from_value(body).unwrap_or_default();
        match stt.text.filter(|t| !t.trim().is_empty()) {
            Some(text) => Ok(Transcription::Text(text)),
            None => Ok(Transcription::Rejected(
                stt.error.unwrap_or_else(|| STT_EMPTY.to_string()),
            )),
        }
    }

    async fn chat(&self, message: &str, session_id: Option<&str>) -> AppResult<Value> {
        tracing::info!("Calling Chat API");
        let response = self
            .http_client
            .post(&self.chat_url)
            .timeout(self.chat_timeout)
            .json(&ChatBody {
                user_message: message,
                session_id,
            })
            .send()
            .await
            .map_err(|e| send_error("Chat", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!("Chat API returned {}", status)));
        }
        response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Unexpected chat response: {}", e)))
    }
}
