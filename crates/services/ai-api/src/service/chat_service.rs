//! Chat service - companion conversation, logs and daily reports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::chat::{history_messages, parse_keywords, transcript, CHAT_HISTORY_LIMIT};
use domain::weather::kst_day_bounds;
use domain::{ChatTurn, EmotionalReport, PromptMessage};
use storage::ChatRepository;

use crate::clients::{CompletionRequest, LanguageModel, SpeechSynthesizer};

const COMPANION_PROMPT: &str = "당신은 혼자 지내시는 어르신을 돌보는 따뜻하고 다정한 AI 도우미 '영웅이'입니다. \
항상 존댓말을 쓰고 어렵지 않은 쉬운 말로 짧게 대화하세요. \
어르신의 감정을 헤아리고 공감하며 외로움을 덜어 드리세요. 이모티콘은 쓰지 마세요.";

const EMOTIONAL_REPORT_PROMPT: &str = "당신은 노인 심리 상담 전문가입니다. 주어진 하루치 대화 기록으로 \
독거노인의 감정 상태를 시간 흐름에 따라 분석해 보고서를 작성하세요. \
첫 줄에는 전반적인 감정 상태를 한 문장으로, 다음 두 줄에는 감정의 흐름과 통찰을, \
그 다음 줄부터는 한 줄에 하나씩 구체적인 권고사항을 쓰세요.";

const KEYWORD_PROMPT: &str = "대화 기록을 보고 사용자가 관심을 보이는 키워드 5개를 골라 \
쉼표(,)로만 구분해 답하세요. 예시: 건강,취미,가족,운동,음식";

const CHAT_MAX_TOKENS: u32 = 120;
const CHAT_TEMPERATURE: f32 = 0.7;
const CHAT_TIMEOUT: Duration = Duration::from_secs(10);

/// Answer of one chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    pub bot_message: String,
    /// Spoken answer, absent when synthesis failed
    pub tts_path: Option<String>,
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Answer a message, opening a session when `session_id` is unknown.
    async fn chat(
        &self,
        session_id: Option<String>,
        user_id: Option<String>,
        message: String,
    ) -> AppResult<ChatReply>;

    /// Turns of a user on a KST day
    async fn conversations(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<ChatTurn>>;

    async fn save_emotion_report(&self, user_id: &str, report: Value) -> AppResult<()>;

    async fn emotional_report(&self, user_id: &str, date: NaiveDate) -> AppResult<EmotionalReport>;

    /// Five interests mentioned on a day
    async fn keywords(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<String>>;
}

pub struct ChatManager {
    repo: Arc<dyn ChatRepository>,
    llm: Arc<dyn LanguageModel>,
    tts: Arc<dyn SpeechSynthesizer>,
    chat_model: String,
    report_model: String,
}

impl ChatManager {
    pub fn new(
        repo: Arc<dyn ChatRepository>,
        llm: Arc<dyn LanguageModel>,
        tts: Arc<dyn SpeechSynthesizer>,
        chat_model: impl Into<String>,
        report_model: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            llm,
            tts,
            chat_model: chat_model.into(),
            report_model: report_model.into(),
        }
    }

    /// Existing session refreshed, or a new one.
    async fn open_session(
        &self,
        session_id: Option<String>,
        user_id: Option<String>,
    ) -> AppResult<(String, Option<String>)> {
        if let Some(uid) = session_id.filter(|s| !s.trim().is_empty()) {
            if let Some(session) = self.repo.find_session(&uid).await? {
                self.repo.touch_session(&uid, Utc::now()).await?;
                return Ok((session.uid, user_id.or(session.user_id)));
            }
        }

        let uid = Uuid::new_v4().to_string();
        let session = self.repo.create_session(&uid, user_id.clone()).await?;
        info!(session_id = %session.uid, "Chat session created");
        Ok((session.uid, user_id))
    }

    async fn day_transcript(&self, user_id: &str, date: NaiveDate) -> AppResult<String> {
        let (start, end) = kst_day_bounds(date);
        let turns = self.repo.turns_between(user_id, start, end).await?;
        if turns.is_empty() {
            return Err(AppError::not_found("No conversations found"));
        }
        Ok(transcript(&turns))
    }

    async fn analyse_day(&self, system: &str, user_id: &str, date: NaiveDate) -> AppResult<String> {
        let dialogue = self.day_transcript(user_id, date).await?;
        let messages = vec![
            PromptMessage::system(system),
            PromptMessage::user(format!("다음은 {}의 대화 기록입니다:\n{}", date, dialogue)),
        ];
        self.llm
            .complete(CompletionRequest::new(self.report_model.clone(), messages))
            .await
    }
}

#[async_trait]
impl ChatService for ChatManager {
    async fn chat(
        &self,
        session_id: Option<String>,
        user_id: Option<String>,
        message: String,
    ) -> AppResult<ChatReply> {
        let (session_id, user_id) = self.open_session(session_id, user_id).await?;

        let turns = self.repo.recent_turns(&session_id, CHAT_HISTORY_LIMIT).await?;
        let mut messages = vec![PromptMessage::system(COMPANION_PROMPT)];
        messages.extend(history_messages(&turns, CHAT_HISTORY_LIMIT as usize));
        messages.push(PromptMessage::user(message.clone()));

        let request = CompletionRequest::new(self.chat_model.clone(), messages)
            .max_tokens(CHAT_MAX_TOKENS)
            .temperature(CHAT_TEMPERATURE)
            .timeout(CHAT_TIMEOUT);
        let bot_message = self.llm.complete(request).await.map_err(|e| {
            error!(session_id = %session_id, "Chat completion failed: {}", e);
            AppError::server("챗봇 응답 생성 중 오류가 발생했습니다.")
        })?;

        self.repo
            .save_turn(ChatTurn {
                session_id: session_id.clone(),
                user_id,
                user_message: message,
                bot_message: bot_message.clone(),
                created_at: Utc::now(),
            })
            .await?;

        let tts_path = match self.tts.synthesize(&bot_message).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(session_id = %session_id, "Speech synthesis failed: {}", e);
                None
            }
        };

        Ok(ChatReply {
            session_id,
            bot_message,
            tts_path,
        })
    }

    async fn conversations(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<ChatTurn>> {
        let (start, end) = kst_day_bounds(date);
        self.repo.turns_between(user_id, start, end).await
    }

    async fn save_emotion_report(&self, user_id: &str, report: Value) -> AppResult<()> {
        let content = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;
        self.repo.save_emotion_report(user_id, content).await
    }

    async fn emotional_report(&self, user_id: &str, date: NaiveDate) -> AppResult<EmotionalReport> {
        let text = self.analyse_day(EMOTIONAL_REPORT_PROMPT, user_id, date).await?;
        Ok(EmotionalReport::parse(user_id, date, &text))
    }

    async fn keywords(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<String>> {
        let text = self.analyse_day(KEYWORD_PROMPT, user_id, date).await?;
        Ok(parse_keywords(&text))
    }
}
