//! Voice chat service - transcription relayed into the companion chat.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use common::AppError;

use crate::clients::{Transcription, VoiceRelay};
use crate::models::{AudioRequest, VoiceChatResponse};

pub const REQUEST_TIMED_OUT: &str = "요청 시간이 초과되었습니다";
pub const CHAT_FAILED: &str = "채팅 응답 생성 중 오류가 발생했습니다";

#[async_trait]
pub trait VoiceChatService: Send + Sync {
    /// Run the pipeline. Every failure is described in the response.
    async fn voice_chat(&self, audio: AudioRequest, session_id: Option<String>)
        -> VoiceChatResponse;
}

pub struct VoiceChatManager {
    relay: Arc<dyn VoiceRelay>,
}

impl VoiceChatManager {
    pub fn new(relay: Arc<dyn VoiceRelay>) -> Self {
        Self { relay }
    }
}

fn unexpected(e: &AppError) -> VoiceChatResponse {
    error!("Error in voice chat: {}", e);
    VoiceChatResponse::failed(format!("처리 중 오류가 발생했습니다: {}", e))
}

#[async_trait]
impl VoiceChatService for VoiceChatManager {
    async fn voice_chat(
        &self,
        audio: AudioRequest,
        session_id: Option<String>,
    ) -> VoiceChatResponse {
        let text = match self.relay.transcribe(&audio).await {
            Ok(Transcription::Text(text)) => text,
            Ok(Transcription::Rejected(reason)) => return VoiceChatResponse::failed(reason),
            Err(AppError::Timeout(_)) => {
                error!("STT API request timeout");
                return VoiceChatResponse::failed(REQUEST_TIMED_OUT);
            }
            Err(e) => return unexpected(&e),
        };
        info!(text = %text, "Transcribed text");

        let session_id = session_id.filter(|s| !s.is_empty());
        match self.relay.chat(&text, session_id.as_deref()).await {
            Ok(answer) => {
                info!("Chat response received");
                VoiceChatResponse::answered(text, answer)
            }
            Err(AppError::Timeout(_)) => {
                error!("Chat API request timeout");
                VoiceChatResponse::failed(REQUEST_TIMED_OUT)
            }
            Err(e) => {
                error!("Chat API error: {}", e);
                VoiceChatResponse {
                    transcribed_text: Some(text),
                    ..VoiceChatResponse::failed(CHAT_FAILED)
                }
            }
        }
    }
}
