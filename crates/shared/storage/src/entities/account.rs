//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Account, Gender, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    /// TEST, SYSTEM, MAIN or SUB
    pub role: String,
    pub user_name: Option<String>,
    pub birth_date: Option<Date>,
    /// MALE, FEMALE or OTHER
    pub gender: Option<String>,
    pub address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            email: model.email,
            password_hash: model.password,
            role: Role::parse(&model.role).unwrap_or_default(),
            user_name: model.user_name,
            birth_date: model.birth_date,
            gender: model.gender.as_deref().and_then(|g| Gender::parse(g).ok()),
            address: model.address,
        }
    }
}
