//! Family database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Family;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "families")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub main_user: String,
    pub family_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Family {
    fn from(model: Model) -> Self {
        Family {
            id: model.id,
            main_user: model.main_user,
            family_name: model.family_name,
        }
    }
}
