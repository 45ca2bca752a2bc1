use sea_orm::entity::prelude::*;

use domain::MentalStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mental_status")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTimeUtc,
    pub score: i32,
    pub is_critical: bool,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MentalStatus {
    fn from(model: Model) -> Self {
        MentalStatus {
            index: model.index,
            family_id: model.family_id,
            reported_at: model.reported_at,
            score: model.score,
            is_critical: model.is_critical,
            description: model.description,
        }
    }
}
