//! Request and response bodies of the voice endpoints.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use common::{AppError, AppResult};

/// Two recordings, base64 encoded LINEAR16 at 16 kHz mono.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AudioRequest {
    /// Short clip expected to contain the wake word
    #[validate(length(min = 1, message = "Wake audio is required"))]
    pub wake_audio: String,
    /// The utterance to transcribe
    #[validate(length(min = 1, message = "Speech audio is required"))]
    pub speech_audio: String,
}

/// Raw audio of an [`AudioRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    pub wake: Vec<u8>,
    pub speech: Vec<u8>,
}

impl AudioRequest {
    pub fn decode(&self) -> AppResult<DecodedAudio> {
        Ok(DecodedAudio {
            wake: decode_field("wake_audio", &self.wake_audio)?,
            speech: decode_field("speech_audio", &self.speech_audio)?,
        })
    }
}

fn decode_field(field: &str, value: &str) -> AppResult<Vec<u8>> {
    STANDARD.decode(value.trim()).map_err(|_| {
        AppError::invalid_value("Audio must be base64 encoded").at(["body", field])
    })
}

/// Outcome of `/speech-to-text`: a transcript or the reason there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SttResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SttResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: None,
            error: Some(message.into()),
        }
    }
}

/// Outcome of `/voice-chat`. Failures are reported in the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceChatResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcribed_text: Option<String>,
    /// Body returned by the chat endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VoiceChatResponse {
    pub fn answered(transcribed_text: String, chat_response: Value) -> Self {
        Self {
            success: true,
            transcribed_text: Some(transcribed_text),
            chat_response: Some(chat_response),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
