//! Login session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::login_session::{self, ActiveModel, Entity as SessionEntity};
use common::{AppError, AppResult};
use domain::LoginSession;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: LoginSession) -> AppResult<LoginSession>;

    async fn find(&self, xid: &str) -> AppResult<Option<LoginSession>>;

    /// Refresh `last_active`
    async fn touch(&self, xid: &str, now: DateTime<Utc>) -> AppResult<()>;

    async fn delete(&self, xid: &str) -> AppResult<bool>;

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<LoginSession>>;

    /// Remove every session of the user except `keep_xid`
    async fn delete_others(&self, user_id: &str, keep_xid: &str) -> AppResult<u64>;

    /// Remove non-main sessions idle since before `cutoff`
    async fn delete_idle_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn create(&self, session: LoginSession) -> AppResult<LoginSession> {
        let active = ActiveModel {
            xid: Set(session.xid),
            user_id: Set(session.user_id),
            created_at: Set(session.created_at),
            last_active: Set(session.last_active),
            is_main_user: Set(session.is_main_user),
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(LoginSession::from(model))
    }

    async fn find(&self, xid: &str) -> AppResult<Option<LoginSession>> {
        let result = SessionEntity::find_by_id(xid.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(LoginSession::from))
    }

    async fn touch(&self, xid: &str, now: DateTime<Utc>) -> AppResult<()> {
        SessionEntity::update_many()
            .col_expr(login_session::Column::LastActive, now.into())
            .filter(login_session::Column::Xid.eq(xid))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn delete(&self, xid: &str) -> AppResult<bool> {
        let result = SessionEntity::delete_by_id(xid.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<LoginSession>> {
        let models = SessionEntity::find()
            .filter(login_session::Column::UserId.eq(user_id))
            .order_by_desc(login_session::Column::LastActive)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(LoginSession::from).collect())
    }

    async fn delete_others(&self, user_id: &str, keep_xid: &str) -> AppResult<u64> {
        let result = SessionEntity::delete_many()
            .filter(login_session::Column::UserId.eq(user_id))
            .filter(login_session::Column::Xid.ne(keep_xid))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_idle_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = SessionEntity::delete_many()
            .filter(login_session::Column::IsMainUser.eq(false))
            .filter(login_session::Column::LastActive.lt(cutoff))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
