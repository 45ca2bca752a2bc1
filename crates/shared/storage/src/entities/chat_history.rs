use sea_orm::entity::prelude::*;

use domain::ChatTurn;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_histories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub session_id: String,
    pub user_id: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub user_message: String,
    #[sea_orm(column_type = "Text")]
    pub bot_message: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ChatTurn {
    fn from(model: Model) -> Self {
        ChatTurn {
            session_id: model.session_id,
            user_id: model.user_id,
            user_message: model.user_message,
            bot_message: model.bot_message,
            created_at: model.created_at,
        }
    }
}
