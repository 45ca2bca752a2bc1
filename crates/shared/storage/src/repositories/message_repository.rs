//! Message repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::message::{self, ActiveModel, Entity as MessageEntity};
use crate::entities::{account, family, member_relation};
use common::{AppError, AppResult};
use domain::{Message, NewMessage, Receiver};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Accounts sharing at least one family with `user_id`, excluding itself
    async fn receivers(&self, user_id: &str) -> AppResult<Vec<Receiver>>;

    async fn create(&self, input: NewMessage) -> AppResult<Message>;

    async fn find_by_id(&self, index: i32) -> AppResult<Option<Message>>;

    async fn list_received(&self, user_id: &str, unread_only: bool) -> AppResult<Vec<Message>>;

    async fn list_sent(&self, user_id: &str) -> AppResult<Vec<Message>>;

    async fn mark_read(&self, index: i32) -> AppResult<Message>;

    async fn delete(&self, index: i32) -> AppResult<bool>;
}

pub struct MessageStore {
    db: DatabaseConnection,
}

impl MessageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for MessageStore {
    async fn receivers(&self, user_id: &str) -> AppResult<Vec<Receiver>> {
        let own_memberships = member_relation::Entity::find()
            .filter(member_relation::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;
        let mut family_ids: Vec<String> =
            own_memberships.into_iter().map(|m| m.family_id).collect();

        if let Some(own_family) = family::Entity::find()
            .filter(family::Column::MainUser.eq(user_id))
            .one(&self.db)
            .await?
        {
            family_ids.push(own_family.id);
        }
        if family_ids.is_empty() {
            return Ok(Vec::new());
        }

        let families = family::Entity::find()
            .filter(family::Column::Id.is_in(family_ids.clone()))
            .all(&self.db)
            .await?;
        let members = member_relation::Entity::find()
            .filter(member_relation::Column::FamilyId.is_in(family_ids))
            .all(&self.db)
            .await?;

        let mut nicknames: BTreeMap<String, Option<String>> = BTreeMap::new();
        for f in families {
            nicknames.entry(f.main_user).or_insert(None);
        }
        for m in members {
            let entry = nicknames.entry(m.user_id).or_insert(None);
            if entry.is_none() {
                *entry = m.nickname;
            }
        }
        nicknames.remove(user_id);

        let accounts = account::Entity::find()
            .filter(account::Column::Id.is_in(nicknames.keys().cloned().collect::<Vec<_>>()))
            .all(&self.db)
            .await?;

        Ok(accounts
            .into_iter()
            .map(|a| Receiver {
                nickname: nicknames.get(&a.id).cloned().flatten(),
                user_id: a.id,
                user_name: a.user_name,
            })
            .collect())
    }

    async fn create(&self, input: NewMessage) -> AppResult<Message> {
        let active = ActiveModel {
            from_id: Set(input.from_id),
            to_id: Set(input.to_id),
            created_at: Set(Utc::now()),
            content: Set(input.content),
            image_url: Set(input.image_url),
            is_read: Set(false),
            ..Default::default()
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Message::from(model))
    }

    async fn find_by_id(&self, index: i32) -> AppResult<Option<Message>> {
        let result = MessageEntity::find_by_id(index)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(Message::from))
    }

    async fn list_received(&self, user_id: &str, unread_only: bool) -> AppResult<Vec<Message>> {
        let mut condition = Condition::all().add(message::Column::ToId.eq(user_id));
        if unread_only {
            condition = condition.add(message::Column::IsRead.eq(false));
        }

        let models = MessageEntity::find()
            .filter(condition)
            .order_by_desc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Message::from).collect())
    }

    async fn list_sent(&self, user_id: &str) -> AppResult<Vec<Message>> {
        let models = MessageEntity::find()
            .filter(message::Column::FromId.eq(user_id))
            .order_by_desc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Message::from).collect())
    }

    async fn mark_read(&self, index: i32) -> AppResult<Message> {
        let active = ActiveModel {
            index: Set(index),
            is_read: Set(true),
            ..Default::default()
        };
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Message::from(model))
    }

    async fn delete(&self, index: i32) -> AppResult<bool> {
        let result = MessageEntity::delete_by_id(index)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected > 0)
    }
}
