use sea_orm::entity::prelude::*;

use domain::SubRegion;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sub_regions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub main_region: String,
    pub sub_region_name: String,
    pub region_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SubRegion {
    fn from(model: Model) -> Self {
        SubRegion {
            main_region: model.main_region,
            sub_region_name: model.sub_region_name,
            region_type: model.region_type,
        }
    }
}
