use sea_orm::entity::prelude::*;

use domain::HomeStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "home_status")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTimeUtc,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub dust_level: Option<f64>,
    pub ethanol: Option<f64>,
    pub others: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for HomeStatus {
    fn from(model: Model) -> Self {
        HomeStatus {
            index: model.index,
            family_id: model.family_id,
            reported_at: model.reported_at,
            temperature: model.temperature,
            humidity: model.humidity,
            dust_level: model.dust_level,
            ethanol: model.ethanol,
            others: model.others,
        }
    }
}
