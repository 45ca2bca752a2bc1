//! Reference data: regions, news and the forecast grid.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{location_map, master_region, news, sub_region};
use common::{AppError, AppResult};
use domain::{GridPoint, MasterRegion, NewNewsArticle, NewsArticle, SubRegion};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ToolRepository: Send + Sync {
    async fn master_regions(&self) -> AppResult<Vec<MasterRegion>>;

    /// All sub regions, or those whose master region equals or contains
    /// `master`
    async fn sub_regions(&self, master: Option<String>) -> AppResult<Vec<SubRegion>>;

    async fn news_on(&self, date: NaiveDate) -> AppResult<Vec<NewsArticle>>;

    /// Store an article unless its link is already known. Returns whether a
    /// row was inserted.
    async fn insert_news(&self, article: NewNewsArticle) -> AppResult<bool>;

    async fn grid_of(&self, address: &str) -> AppResult<Option<GridPoint>>;
}

pub struct ToolStore {
    db: DatabaseConnection,
}

impl ToolStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ToolRepository for ToolStore {
    async fn master_regions(&self) -> AppResult<Vec<MasterRegion>> {
        let models = master_region::Entity::find()
            .order_by_asc(master_region::Column::RegionName)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(MasterRegion::from).collect())
    }

    async fn sub_regions(&self, master: Option<String>) -> AppResult<Vec<SubRegion>> {
        let mut query = sub_region::Entity::find();
        if let Some(master) = master {
            query = query.filter(
                Condition::any()
                    .add(sub_region::Column::MainRegion.eq(master.as_str()))
                    .add(sub_region::Column::MainRegion.contains(master.as_str())),
            );
        }

        let models = query
            .order_by_asc(sub_region::Column::Index)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(SubRegion::from).collect())
    }

    async fn news_on(&self, date: NaiveDate) -> AppResult<Vec<NewsArticle>> {
        let models = news::Entity::find()
            .filter(news::Column::PubDate.eq(date))
            .order_by_asc(news::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(NewsArticle::from).collect())
    }

    async fn insert_news(&self, article: NewNewsArticle) -> AppResult<bool> {
        let known = news::Entity::find()
            .filter(news::Column::Link.eq(article.link.as_str()))
            .count(&self.db)
            .await?;
        if known > 0 {
            return Ok(false);
        }

        let active = news::ActiveModel {
            category: Set(article.category),
            title: Set(article.title),
            link: Set(article.link),
            image_url: Set(article.image_url),
            pub_date: Set(article.pub_date),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        };
        active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(true)
    }

    async fn grid_of(&self, address: &str) -> AppResult<Option<GridPoint>> {
        let result = location_map::Entity::find_by_id(address.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(GridPoint::from))
    }
}
