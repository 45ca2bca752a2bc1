//! Notification repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::notification::{self, ActiveModel, Entity as NotificationEntity};
use common::{AppError, AppResult};
use domain::{NewNotification, Notification, SortOrder};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, input: NewNotification) -> AppResult<Notification>;

    /// Insert unless a notification with the same message serial already
    /// exists for the family. Returns `None` when skipped.
    async fn create_if_new(&self, input: NewNotification) -> AppResult<Option<Notification>>;

    async fn list(
        &self,
        family_id: &str,
        unread_only: bool,
        order: SortOrder,
    ) -> AppResult<Vec<Notification>>;

    async fn find_by_id(&self, index: i32) -> AppResult<Option<Notification>>;

    async fn mark_read(&self, index: i32) -> AppResult<Notification>;

    async fn delete(&self, index: i32) -> AppResult<bool>;
}

pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn create(&self, input: NewNotification) -> AppResult<Notification> {
        let active = ActiveModel {
            family_id: Set(input.family_id),
            created_at: Set(Utc::now()),
            notification_grade: Set(input.notification_grade.as_db_str().to_string()),
            description: Set(input.description),
            is_read: Set(false),
            message_sn: Set(input.message_sn),
            ..Default::default()
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Notification::from(model))
    }

    async fn create_if_new(&self, input: NewNotification) -> AppResult<Option<Notification>> {
        if let Some(sn) = input.message_sn {
            let existing = NotificationEntity::find()
                .filter(notification::Column::FamilyId.eq(input.family_id.as_str()))
                .filter(notification::Column::MessageSn.eq(sn))
                .count(&self.db)
                .await?;
            if existing > 0 {
                return Ok(None);
            }
        }

        self.create(input).await.map(Some)
    }

    async fn list(
        &self,
        family_id: &str,
        unread_only: bool,
        order: SortOrder,
    ) -> AppResult<Vec<Notification>> {
        let mut query =
            NotificationEntity::find().filter(notification::Column::FamilyId.eq(family_id));
        if unread_only {
            query = query.filter(notification::Column::IsRead.eq(false));
        }
        query = match order {
            SortOrder::Asc => query.order_by_asc(notification::Column::CreatedAt),
            SortOrder::Desc => query.order_by_desc(notification::Column::CreatedAt),
        };

        let models = query.all(&self.db).await.map_err(AppError::from)?;
        Ok(models.into_iter().map(Notification::from).collect())
    }

    async fn find_by_id(&self, index: i32) -> AppResult<Option<Notification>> {
        let result = NotificationEntity::find_by_id(index)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(Notification::from))
    }

    async fn mark_read(&self, index: i32) -> AppResult<Notification> {
        let active = ActiveModel {
            index: Set(index),
            is_read: Set(true),
            ..Default::default()
        };
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Notification::from(model))
    }

    async fn delete(&self, index: i32) -> AppResult<bool> {
        let result = NotificationEntity::delete_by_id(index)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;
    use domain::NotificationGrade;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    fn disaster_alert() -> NewNotification {
        NewNotification {
            family_id: "F1".into(),
            notification_grade: NotificationGrade::Crit,
            description: "[호우] 하천 접근 금지".into(),
            message_sn: Some(9),
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    #[tokio::test]
    async fn test_create_if_new_skips_known_serial() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(1)]])
            .into_connection();
        let store = NotificationStore::new(db);

        let created = store.create_if_new(disaster_alert()).await.unwrap();

        assert!(created.is_none());
        let log = store.db.into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_create_if_new_inserts_unseen_serial() {
        let stored = notification::Model {
            index: 3,
            family_id: "F1".into(),
            created_at: Utc.with_ymd_and_hms(2025, 2, 10, 3, 0, 0).unwrap(),
            notification_grade: "CRIT".into(),
            description: "[호우] 하천 접근 금지".into(),
            is_read: false,
            message_sn: Some(9),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(0)]])
            .append_query_results([[stored]])
            .into_connection();
        let store = NotificationStore::new(db);

        let created = store.create_if_new(disaster_alert()).await.unwrap().unwrap();

        assert_eq!(created.index, 3);
        assert_eq!(created.notification_grade, NotificationGrade::Crit);
        assert_eq!(created.message_sn, Some(9));
        assert_eq!(store.db.into_transaction_log().len(), 2);
    }
}
