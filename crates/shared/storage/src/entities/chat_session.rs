use sea_orm::entity::prelude::*;

use domain::ChatSession;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    pub user_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub last_active: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ChatSession {
    fn from(model: Model) -> Self {
        ChatSession {
            uid: model.uid,
            user_id: model.user_id,
            created_at: model.created_at,
            last_active: model.last_active,
        }
    }
}
