use sea_orm::entity::prelude::*;

use domain::ActiveStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "active_status")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTimeUtc,
    pub score: Option<i32>,
    pub action: Option<String>,
    pub is_critical: Option<bool>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ActiveStatus {
    fn from(model: Model) -> Self {
        ActiveStatus {
            index: model.index,
            family_id: model.family_id,
            reported_at: model.reported_at,
            score: model.score,
            action: model.action,
            is_critical: model.is_critical,
            description: model.description,
        }
    }
}
