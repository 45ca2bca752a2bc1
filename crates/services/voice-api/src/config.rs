//! Voice API configuration.

use std::time::Duration;

use common::config::{env_opt, env_or};
use common::ServiceConfig;

/// Voice API configuration.
#[derive(Debug, Clone)]
pub struct VoiceApiConfig {
    /// Host and port to bind
    pub service: ServiceConfig,
    pub speech: SpeechConfig,
    /// `POST` endpoint transcribing a wake phrase and an utterance
    pub stt_api_url: String,
    /// `POST` endpoint answering a chat message
    pub chat_api_url: String,
    pub timeouts: VoiceTimeouts,
}

/// Google Speech REST recognizer.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub url: String,
}

/// Deadlines of the pipeline stages, in seconds.
#[derive(Debug, Clone, Copy)]
pub struct VoiceTimeouts {
    /// Wake-word recognition
    pub keyword_seconds: u64,
    /// Utterance recognition
    pub speech_seconds: u64,
    /// Relay call to the STT endpoint
    pub stt_request_seconds: u64,
    /// Relay call to the chat endpoint
    pub chat_request_seconds: u64,
}

impl VoiceTimeouts {
    pub fn keyword(&self) -> Duration {
        Duration::from_secs(self.keyword_seconds)
    }

    pub fn speech(&self) -> Duration {
        Duration::from_secs(self.speech_seconds)
    }

    pub fn stt_request(&self) -> Duration {
        Duration::from_secs(self.stt_request_seconds)
    }

    pub fn chat_request(&self) -> Duration {
        Duration::from_secs(self.chat_request_seconds)
    }
}

impl VoiceApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service: ServiceConfig::from_env("voice-api", "VOICE_API", defaults.service.port),
            speech: SpeechConfig {
                api_key: env_opt("GOOGLE_SPEECH_API_KEY"),
                url: env_or("GOOGLE_SPEECH_URL", defaults.speech.url),
            },
            stt_api_url: env_or("STT_API_URL", defaults.stt_api_url),
            chat_api_url: env_or("CHAT_API_URL", defaults.chat_api_url),
            timeouts: VoiceTimeouts {
                keyword_seconds: env_or("KEYWORD_TIMEOUT", defaults.timeouts.keyword_seconds),
                speech_seconds: env_or("SPEECH_TIMEOUT", defaults.timeouts.speech_seconds),
                stt_request_seconds: env_or(
                    "STT_REQUEST_TIMEOUT",
                    defaults.timeouts.stt_request_seconds,
                ),
                chat_request_seconds: env_or(
                    "CHAT_REQUEST_TIMEOUT",
                    defaults.timeouts.chat_request_seconds,
                ),
            },
        }
    }
}

impl Default for VoiceApiConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "voice-api".to_string(),
                host: "0.0.0.0".to_string(),
                port: 8002,
            },
            speech: SpeechConfig {
                api_key: None,
                url: "https://speech.googleapis.com/v1/speech:recognize".to_string(),
            },
            stt_api_url: "http://localhost:8002/speech-to-text".to_string(),
            chat_api_url: "http://localhost:8001/chat".to_string(),
            timeouts: VoiceTimeouts {
                keyword_seconds: 10,
                speech_seconds: 90,
                stt_request_seconds: 120,
                chat_request_seconds: 30,
            },
        }
    }
}
