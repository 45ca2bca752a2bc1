use sea_orm::entity::prelude::*;

use domain::HealthStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "health_status")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTimeUtc,
    pub heart_rate: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for HealthStatus {
    fn from(model: Model) -> Self {
        HealthStatus {
            index: model.index,
            family_id: model.family_id,
            reported_at: model.reported_at,
            heart_rate: model.heart_rate,
        }
    }
}
