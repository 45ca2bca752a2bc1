//! Chat sessions, stored turns and emotion reports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{chat_history, chat_session, emotion_report};
use common::{AppError, AppResult};
use domain::{ChatSession, ChatTurn};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn find_session(&self, uid: &str) -> AppResult<Option<ChatSession>>;

    async fn create_session(&self, uid: &str, user_id: Option<String>) -> AppResult<ChatSession>;

    async fn touch_session(&self, uid: &str, now: DateTime<Utc>) -> AppResult<()>;

    /// The `limit` most recent turns of a session, oldest first
    async fn recent_turns(&self, session_id: &str, limit: u64) -> AppResult<Vec<ChatTurn>>;

    async fn save_turn(&self, turn: ChatTurn) -> AppResult<()>;

    /// Turns of a user with `start <= created_at < end`, oldest first
    async fn turns_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<ChatTurn>>;

    async fn save_emotion_report(&self, user_id: &str, content: String) -> AppResult<()>;
}

pub struct ChatStore {
    db: DatabaseConnection,
}

impl ChatStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatRepository for ChatStore {
    async fn find_session(&self, uid: &str) -> AppResult<Option<ChatSession>> {
        let result = chat_session::Entity::find_by_id(uid.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(ChatSession::from))
    }

    async fn create_session(&self, uid: &str, user_id: Option<String>) -> AppResult<ChatSession> {
        let now = Utc::now();
        let active = chat_session::ActiveModel {
            uid: Set(uid.to_string()),
            user_id: Set(user_id),
            created_at: Set(now),
            last_active: Set(now),
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(ChatSession::from(model))
    }

    async fn touch_session(&self, uid: &str, now: DateTime<Utc>) -> AppResult<()> {
        chat_session::Entity::update_many()
            .col_expr(chat_session::Column::LastActive, now.into())
            .filter(chat_session::Column::Uid.eq(uid))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn recent_turns(&self, session_id: &str, limit: u64) -> AppResult<Vec<ChatTurn>> {
        let mut models = chat_history::Entity::find()
            .filter(chat_history::Column::SessionId.eq(session_id))
            .order_by_desc(chat_history::Column::CreatedAt)
            .order_by_desc(chat_history::Column::Index)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        models.reverse();
        Ok(models.into_iter().map(ChatTurn::from).collect())
    }

    async fn save_turn(&self, turn: ChatTurn) -> AppResult<()> {
        let active = chat_history::ActiveModel {
            session_id: Set(turn.session_id),
            user_id: Set(turn.user_id),
            user_message: Set(turn.user_message),
            bot_message: Set(turn.bot_message),
            created_at: Set(turn.created_at),
            ..Default::default()
        };
        active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn turns_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<ChatTurn>> {
        let models = chat_history::Entity::find()
            .filter(chat_history::Column::UserId.eq(user_id))
            .filter(chat_history::Column::CreatedAt.gte(start))
            .filter(chat_history::Column::CreatedAt.lt(end))
            .order_by_asc(chat_history::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(ChatTurn::from).collect())
    }

    async fn save_emotion_report(&self, user_id: &str, content: String) -> AppResult<()> {
        let active = emotion_report::ActiveModel {
            user_id: Set(user_id.to_string()),
            report_content: Set(content),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }
}
