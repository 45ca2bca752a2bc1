//! Speech recognition through the Google Speech REST API.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult};

/// Sample rate of the accepted LINEAR16 audio
pub const SAMPLE_RATE_HERTZ: u32 = 16_000;

/// Recognition language
pub const LANGUAGE_CODE: &str = "ko-KR";

/// Turns recorded audio into text.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcript of mono 16 kHz LINEAR16 audio, `None` when nothing was
    /// recognized.
    async fn recognize(&self, audio: &[u8]) -> AppResult<Option<String>>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: &'static str,
    enable_automatic_punctuation: bool,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Serialize)]
struct RecognizeBody {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

/// Joined best alternatives of a `speech:recognize` answer.
pub fn parse_transcript(body: &str) -> AppResult<Option<String>> {
    let response: RecognizeResponse = serde_json::from_str(body)
        .map_err(|e| AppError::upstream(format!("Unexpected speech response: {}", e)))?;

    let text = response
        .results
        .iter()
        .filter_map(|r| r.alternatives.first())
        .map(|a| a.transcript.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(if text.is_empty() { None } else { Some(text) })
}

/// reqwest implementation of [`SpeechRecognizer`].
pub struct GoogleSpeechClient {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GoogleSpeechClient {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build speech client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechClient {
    async fn recognize(&self, audio: &[u8]) -> AppResult<Option<String>> {
        if self.api_key.is_empty() {
            return Err(AppError::server("Google Speech API key is not configured"));
        }

        let body = RecognizeBody {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: SAMPLE_RATE_HERTZ,
                language_code: LANGUAGE_CODE,
                enable_automatic_punctuation: true,
            },
            audio: RecognitionAudio {
                content: STANDARD.encode(audio),
            },
        };
        tracing::debug!(bytes = audio.len(), "Requesting recognition");

        let response = self
            .http_client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::timeout("음성 인식 시간이 초과되었습니다")
                } else {
                    AppError::upstream(format!("Speech API request failed: {}", e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::upstream(format!("Speech API request failed: {}", e)))?;
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "Speech API returned {}: {}",
                status, text
            )));
        }

        parse_transcript(&text)
    }
}
