use sea_orm::entity::prelude::*;

use domain::MasterRegion;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "master_regions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub region_name: String,
    pub region_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MasterRegion {
    fn from(model: Model) -> Self {
        MasterRegion {
            region_name: model.region_name,
            region_type: model.region_type,
        }
    }
}
