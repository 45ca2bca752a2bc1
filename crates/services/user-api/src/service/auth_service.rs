//! Auth service - login sessions kept in the database and referenced by
//! the `session_id` cookie.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{constants::PASSWORD_SENTINEL, LoginSession, Password, Role};
use storage::{AccountRepository, SessionRepository};

use crate::middleware::{require_self_or_system, CurrentUser};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and open a new session
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginSession>;

    async fn logout(&self, session_id: &str) -> AppResult<()>;

    /// Resolve a session key, enforcing idle expiry for non-main users
    async fn authenticate(&self, session_id: &str) -> AppResult<CurrentUser>;

    /// Replace a password and drop every other session of that account
    async fn change_password(
        &self,
        requester: &CurrentUser,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()>;

    async fn sessions_of(&self, user_id: &str) -> AppResult<Vec<LoginSession>>;

    /// Delete idle non-main sessions, returning how many were removed
    async fn cleanup_expired(&self) -> AppResult<u64>;
}

pub struct AuthManager {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<dyn SessionRepository>,
    expire_seconds: i64,
}

impl AuthManager {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<dyn SessionRepository>,
        expire_seconds: i64,
    ) -> Self {
        Self {
            accounts,
            sessions,
            expire_seconds,
        }
    }
}

#[async_trait]
impl AuthService for AuthManager {
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginSession> {
        let invalid = || {
            AppError::unauthorized("Invalid email or password")
                .with_input(json!({"email": email, "password": password}))
        };

        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !Password::from_hash(account.password_hash.clone()).verify(password) {
            return Err(invalid());
        }

        let session = LoginSession::new(
            Uuid::new_v4().to_string(),
            account.id,
            account.role == Role::Main,
            Utc::now(),
        );
        let session = self.sessions.create(session).await?;

        tracing::info!(user_id = %session.user_id, "Login session created");
        Ok(session)
    }

    async fn logout(&self, session_id: &str) -> AppResult<()> {
        if !self.sessions.delete(session_id).await? {
            return Err(AppError::unauthorized("Session ID is invalid."));
        }
        Ok(())
    }

    async fn authenticate(&self, session_id: &str) -> AppResult<CurrentUser> {
        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Session ID is invalid."))?;

        let now = Utc::now();
        if session.is_expired(now, self.expire_seconds) {
            self.sessions.delete(session_id).await?;
            tracing::debug!(user_id = %session.user_id, "Expired session removed");
            return Err(AppError::unauthorized(
                "Session ID is expired. Please login again with your account.",
            ));
        }

        self.sessions.touch(session_id, now).await?;

        let account = self
            .accounts
            .find_by_id(&session.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Session ID is invalid."))?;

        Ok(CurrentUser {
            id: account.id,
            role: account.role,
            session_id: session.xid,
        })
    }

    async fn change_password(
        &self,
        requester: &CurrentUser,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        require_self_or_system(requester, user_id)?;

        let account = self
            .accounts
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("Account not found")?;

        if !Password::from_hash(account.password_hash).verify(current_password) {
            return Err(AppError::unauthorized("Invalid password").with_input(json!({
                "user_id": user_id,
                "current_password": PASSWORD_SENTINEL,
            })));
        }

        let hash = Password::new(new_password)?;
        self.accounts
            .update_password(user_id, hash.into_string())
            .await?;

        let removed = self
            .sessions
            .delete_others(user_id, &requester.session_id)
            .await?;
        tracing::info!(user_id = %user_id, removed_sessions = removed, "Password changed");
        Ok(())
    }

    async fn sessions_of(&self, user_id: &str) -> AppResult<Vec<LoginSession>> {
        self.sessions.list_by_user(user_id).await
    }

    async fn cleanup_expired(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::seconds(self.expire_seconds);
        self.sessions.delete_idle_before(cutoff).await
    }
}
