//! Speech-to-text service - wake word first, then the utterance.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use common::{AppError, AppResult};
use domain::voice::{find_wake_word, termination_keyword};

use crate::clients::SpeechRecognizer;
use crate::models::{DecodedAudio, SttResponse};

pub const NO_WAKE_WORD: &str = "시작 키워드가 감지되지 않았습니다";
pub const NO_SPEECH: &str = "음성이 감지되지 않았습니다";
pub const STT_TIMED_OUT: &str = "음성 인식 시간이 초과되었습니다";

#[async_trait]
pub trait SttService: Send + Sync {
    /// Transcribe `speech` when `wake` names the bot. A missing wake word or
    /// an empty utterance is reported in the response, a missed deadline is
    /// a 504.
    async fn speech_to_text(&self, audio: DecodedAudio) -> AppResult<SttResponse>;
}

pub struct SttManager {
    recognizer: Arc<dyn SpeechRecognizer>,
    keyword_timeout: Duration,
    speech_timeout: Duration,
}

impl SttManager {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        keyword_timeout: Duration,
        speech_timeout: Duration,
    ) -> Self {
        Self {
            recognizer,
            keyword_timeout,
            speech_timeout,
        }
    }
}

async fn within<T>(
    limit: Duration,
    phase: &str,
    fut: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    tokio::time::timeout(limit, fut).await.map_err(|_| {
        tracing::error!(phase, "Speech recognition timed out");
        AppError::timeout(STT_TIMED_OUT)
    })?
}

#[async_trait]
impl SttService for SttManager {
    async fn speech_to_text(&self, audio: DecodedAudio) -> AppResult<SttResponse> {
        info!("Speech recognition requested");

        let wake = within(
            self.keyword_timeout,
            "keyword",
            self.recognizer.recognize(&audio.wake),
        )
        .await?;
        let heard = wake.as_deref().map(str::to_lowercase).unwrap_or_default();
        match find_wake_word(&heard) {
            Some(word) => info!(word, "Wake word detected"),
            None => {
                info!(transcript = %heard, "No wake word");
                return Ok(SttResponse::error(NO_WAKE_WORD));
            }
        }

        let speech = within(
            self.speech_timeout,
            "speech",
            self.recognizer.recognize(&audio.speech),
        )
        .await?;
        let Some(text) = speech.filter(|t| !t.trim().is_empty()) else {
            info!("No speech recognized");
            return Ok(SttResponse::error(NO_SPEECH));
        };

        if let Some(keyword) = termination_keyword(&text) {
            info!(keyword, "Termination keyword detected");
        }
        info!(text = %text, "Speech recognized");
        Ok(SttResponse::text(text))
    }
}
