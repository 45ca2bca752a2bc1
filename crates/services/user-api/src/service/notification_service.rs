//! Notification service.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppResult, OptionExt};
use domain::{NewNotification, Notification, SortOrder};
use storage::NotificationRepository;

use super::AccessPolicy;
use crate::middleware::CurrentUser;

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn create(
        &self,
        requester: &CurrentUser,
        input: NewNotification,
    ) -> AppResult<Notification>;

    async fn list(
        &self,
        requester: &CurrentUser,
        family_id: &str,
        unread_only: bool,
        order: SortOrder,
    ) -> AppResult<Vec<Notification>>;

    async fn mark_read(&self, requester: &CurrentUser, index: i32) -> AppResult<Notification>;

    async fn delete(&self, requester: &CurrentUser, index: i32) -> AppResult<()>;
}

pub struct NotificationManager {
    repo: Arc<dyn NotificationRepository>,
    access: AccessPolicy,
}

impl NotificationManager {
    pub fn new(repo: Arc<dyn NotificationRepository>, access: AccessPolicy) -> Self {
        Self { repo, access }
    }

    /// Load a notification and check access to its family.
    async fn owned(&self, requester: &CurrentUser, index: i32) -> AppResult<Notification> {
        let notification = self
            .repo
            .find_by_id(index)
            .await?
            .ok_or_not_found("Notification not found")?;
        self.access
            .ensure_family_access(requester, &notification.family_id)
            .await?;
        Ok(notification)
    }
}

#[async_trait]
impl NotificationService for NotificationManager {
    async fn create(
        &self,
        requester: &CurrentUser,
        input: NewNotification,
    ) -> AppResult<Notification> {
        self.access
            .ensure_family_access(requester, &input.family_id)
            .await?;
        self.repo.create(input).await
    }

    async fn list(
        &self,
        requester: &CurrentUser,
        family_id: &str,
        unread_only: bool,
        order: SortOrder,
    ) -> AppResult<Vec<Notification>> {
        self.access.ensure_family_access(requester, family_id).await?;
        self.repo.list(family_id, unread_only, order).await
    }

    async fn mark_read(&self, requester: &CurrentUser, index: i32) -> AppResult<Notification> {
        self.owned(requester, index).await?;
        self.repo.mark_read(index).await
    }

    async fn delete(&self, requester: &CurrentUser, index: i32) -> AppResult<()> {
        self.owned(requester, index).await?;
        self.repo.delete(index).await?;
        Ok(())
    }
}
