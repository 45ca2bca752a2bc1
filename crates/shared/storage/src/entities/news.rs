use sea_orm::entity::prelude::*;

use domain::NewsArticle;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category: String,
    pub title: String,
    #[sea_orm(column_type = "Text", unique)]
    pub link: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    pub pub_date: Date,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for NewsArticle {
    fn from(model: Model) -> Self {
        NewsArticle {
            id: model.id,
            category: model.category,
            title: model.title,
            link: model.link,
            image_url: model.image_url,
            pub_date: model.pub_date,
            created_at: model.created_at,
        }
    }
}
