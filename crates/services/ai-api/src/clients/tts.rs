//! Text-to-speech: Korean MP3 files written to the served output directory.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use common::{AppError, AppResult};

/// Longest text the translate endpoint accepts per request
pub const MAX_CHUNK_CHARS: usize = 100;

/// Speech synthesis of bot answers.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Write the audio file and return its path relative to the working
    /// directory.
    async fn synthesize(&self, text: &str) -> AppResult<String>;
}

/// Split text into chunks of at most `max` characters, on whitespace where
/// possible.
pub fn split_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= max {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if word_len <= max {
            current.push_str(word);
        } else {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Google translate TTS endpoint, the service behind gTTS.
pub struct GoogleTts {
    http_client: reqwest::Client,
    url: String,
    output_dir: PathBuf,
}

impl GoogleTts {
    pub fn new(
        url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build TTS client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
            output_dir: output_dir.into(),
        })
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> AppResult<Vec<u8>> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let bytes = self
            .http_client
            .get(&self.url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", "ko"),
                ("client", "tw-ob"),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::upstream(format!("TTS request failed: {}", e)))?
            .bytes()
            .await
            .map_err(|e| AppError::upstream(format!("TTS request failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str) -> AppResult<String> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(AppError::invalid_value("Nothing to synthesize"));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, chunks.len()).await?);
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create TTS directory: {}", e)))?;
        // Replies finishing in the same second must not share a file
        let name = format!("tts_{}_{}.mp3", Utc::now().timestamp(), Uuid::new_v4().simple());
        let path = self.output_dir.join(name);
        tokio::fs::write(&path, audio)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write TTS file: {}", e)))?;

        tracing::debug!(path = %path.display(), "Speech file written");
        Ok(path.to_string_lossy().into_owned())
    }
}
