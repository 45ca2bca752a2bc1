use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "emotion_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub user_id: String,
    /// Pretty-printed JSON as submitted
    #[sea_orm(column_type = "Text")]
    pub report_content: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
