//! Companion chat: sessions, stored turns and the report formats derived
//! from a day of conversation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::weather::kst;

/// Number of earlier messages included in a chat prompt
pub const CHAT_HISTORY_LIMIT: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub uid: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// One user message and the bot's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(skip_serializing)]
    pub session_id: String,
    #[serde(skip_serializing)]
    pub user_id: Option<String>,
    pub user_message: String,
    pub bot_message: String,
    pub created_at: DateTime<Utc>,
}

/// Conversation roles as understood by chat-completion APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: ChatRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Expand stored turns (oldest first) into prompt messages, keeping only
/// the last `limit` messages.
pub fn history_messages(turns: &[ChatTurn], limit: usize) -> Vec<PromptMessage> {
    let all: Vec<PromptMessage> = turns
        .iter()
        .flat_map(|t| {
            [
                PromptMessage::user(t.user_message.clone()),
                PromptMessage::assistant(t.bot_message.clone()),
            ]
        })
        .collect();
    let skip = all.len().saturating_sub(limit);
    all.into_iter().skip(skip).collect()
}

/// Turns rendered as a time-stamped dialogue (KST) for report prompts.
pub fn transcript(turns: &[ChatTurn]) -> String {
    let offset = kst();
    turns
        .iter()
        .map(|t| {
            format!(
                "[{}] 사용자: {}\n[{}] 영웅이: {}",
                t.created_at.with_timezone(&offset).format("%H:%M"),
                t.user_message,
                t.created_at.with_timezone(&offset).format("%H:%M"),
                t.bot_message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Daily emotional report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EmotionalReport {
    pub user_id: String,
    pub date: NaiveDate,
    pub overall_emotional_state: String,
    pub emotional_insights: String,
    pub recommendations: Vec<String>,
}

impl EmotionalReport {
    /// Split a free-form report: the first line is the overall state, the
    /// next two lines are insights, everything after is a recommendation.
    pub fn parse(user_id: impl Into<String>, date: NaiveDate, text: &str) -> Self {
        let lines: Vec<&str> = text.trim().split('\n').collect();

        let overall = match lines.first() {
            Some(line) if !line.trim().is_empty() => line.to_string(),
            _ => "분석 불가".to_string(),
        };
        let insights = if lines.len() > 2 {
            lines[1..3].join("\n")
        } else {
            "추가 정보 없음".to_string()
        };
        let recommendations = if lines.len() > 3 {
            lines[3..].iter().map(|l| l.to_string()).collect()
        } else {
            Vec::new()
        };

        Self {
            user_id: user_id.into(),
            date,
            overall_emotional_state: overall,
            emotional_insights: insights,
            recommendations,
        }
    }
}

/// Comma-separated keyword answer into a list.
pub fn parse_keywords(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
