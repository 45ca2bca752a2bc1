//! Address to forecast grid mapping.

use sea_orm::entity::prelude::*;

use domain::GridPoint;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "location_maps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub address: String,
    pub x_value: i32,
    pub y_value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for GridPoint {
    fn from(model: Model) -> Self {
        GridPoint {
            x: model.x_value,
            y: model.y_value,
        }
    }
}
