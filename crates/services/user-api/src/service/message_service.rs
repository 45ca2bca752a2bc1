//! Message service - direct messages between accounts sharing a family.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use common::{AppError, AppResult, OptionExt};
use domain::{Message, NewMessage, Receiver};
use storage::MessageRepository;

use crate::middleware::CurrentUser;

#[async_trait]
pub trait MessageService: Send + Sync {
    async fn receivers(&self, requester: &CurrentUser) -> AppResult<Vec<Receiver>>;

    async fn send(
        &self,
        requester: &CurrentUser,
        to_id: &str,
        content: String,
        image_url: Option<String>,
    ) -> AppResult<Message>;

    async fn received(&self, requester: &CurrentUser, unread_only: bool)
        -> AppResult<Vec<Message>>;

    async fn sent(&self, requester: &CurrentUser) -> AppResult<Vec<Message>>;

    /// Only the receiver may mark a message as read
    async fn mark_read(&self, requester: &CurrentUser, index: i32) -> AppResult<Message>;

    /// Sender or receiver may delete
    async fn delete(&self, requester: &CurrentUser, index: i32) -> AppResult<()>;
}

pub struct MessageManager {
    repo: Arc<dyn MessageRepository>,
}

impl MessageManager {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    async fn find(&self, index: i32) -> AppResult<Message> {
        self.repo
            .find_by_id(index)
            .await?
            .ok_or_not_found("Message not found")
    }
}

fn forbidden(index: i32, requester: &CurrentUser) -> AppError {
    AppError::forbidden("You do not have permission")
        .with_input(json!({"message_id": index, "request_id": requester.id}))
}

#[async_trait]
impl MessageService for MessageManager {
    async fn receivers(&self, requester: &CurrentUser) -> AppResult<Vec<Receiver>> {
        self.repo.receivers(&requester.id).await
    }

    async fn send(
        &self,
        requester: &CurrentUser,
        to_id: &str,
        content: String,
        image_url: Option<String>,
    ) -> AppResult<Message> {
        let receivable = self
            .repo
            .receivers(&requester.id)
            .await?
            .iter()
            .any(|r| r.user_id == to_id);
        if !receivable {
            return Err(AppError::forbidden("You can not send a message to this user")
                .with_input(json!({"to_id": to_id, "request_id": requester.id})));
        }

        self.repo
            .create(NewMessage {
                from_id: requester.id.clone(),
                to_id: to_id.to_string(),
                content,
                image_url,
            })
            .await
    }

    async fn received(
        &self,
        requester: &CurrentUser,
        unread_only: bool,
    ) -> AppResult<Vec<Message>> {
        self.repo.list_received(&requester.id, unread_only).await
    }

    async fn sent(&self, requester: &CurrentUser) -> AppResult<Vec<Message>> {
        self.repo.list_sent(&requester.id).await
    }

    async fn mark_read(&self, requester: &CurrentUser, index: i32) -> AppResult<Message> {
        let message = self.find(index).await?;
        if message.to_id != requester.id {
            return Err(forbidden(index, requester));
        }
        self.repo.mark_read(index).await
    }

    async fn delete(&self, requester: &CurrentUser, index: i32) -> AppResult<()> {
        let message = self.find(index).await?;
        if !message.is_participant(&requester.id) {
            return Err(forbidden(index, requester));
        }
        self.repo.delete(index).await?;
        Ok(())
    }
}
