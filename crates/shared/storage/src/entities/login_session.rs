//! Login session database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::LoginSession;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "login_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub xid: String,
    pub user_id: String,
    pub created_at: DateTimeUtc,
    pub last_active: DateTimeUtc,
    pub is_main_user: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LoginSession {
    fn from(model: Model) -> Self {
        LoginSession {
            xid: model.xid,
            user_id: model.user_id,
            created_at: model.created_at,
            last_active: model.last_active,
            is_main_user: model.is_main_user,
        }
    }
}
