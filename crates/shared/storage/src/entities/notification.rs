//! Notification database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Notification, NotificationGrade};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub family_id: String,
    pub created_at: DateTimeUtc,
    /// INFO, WARN, CRIT or NONE
    pub notification_grade: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub is_read: bool,
    /// Serial of the disaster message this notification was raised for
    pub message_sn: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Notification {
    fn from(model: Model) -> Self {
        Notification {
            index: model.index,
            family_id: model.family_id,
            created_at: model.created_at,
            notification_grade: NotificationGrade::parse(&model.notification_grade)
                .unwrap_or_default(),
            description: model.description,
            is_read: model.is_read,
            message_sn: model.message_sn,
        }
    }
}
