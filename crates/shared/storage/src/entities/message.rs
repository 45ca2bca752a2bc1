use sea_orm::entity::prelude::*;

use domain::Message;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub from_id: String,
    pub to_id: String,
    pub created_at: DateTimeUtc,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub image_url: Option<String>,
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Message {
    fn from(model: Model) -> Self {
        Message {
            index: model.index,
            from_id: model.from_id,
            to_id: model.to_id,
            created_at: model.created_at,
            content: model.content,
            image_url: model.image_url,
            is_read: model.is_read,
        }
    }
}
