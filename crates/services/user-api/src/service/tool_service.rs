//! Tool service - regions and news.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use common::{AppError, AppResult};
use domain::news::group_by_category;
use domain::{MasterRegion, NewsArticle, SubRegion};
use storage::ToolRepository;

#[async_trait]
pub trait ToolService: Send + Sync {
    async fn master_regions(&self) -> AppResult<Vec<MasterRegion>>;

    /// Sub regions, optionally of one master region. Empty is a 404.
    async fn sub_regions(&self, master: Option<String>) -> AppResult<Vec<SubRegion>>;

    /// Articles of a day grouped by category
    async fn news(&self, date: NaiveDate) -> AppResult<BTreeMap<String, Vec<NewsArticle>>>;
}

pub struct ToolManager {
    repo: Arc<dyn ToolRepository>,
}

impl ToolManager {
    pub fn new(repo: Arc<dyn ToolRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ToolService for ToolManager {
    async fn master_regions(&self) -> AppResult<Vec<MasterRegion>> {
        let regions = self.repo.master_regions().await?;
        if regions.is_empty() {
            return Err(AppError::not_found("Failed to retrieve master region data"));
        }
        Ok(regions)
    }

    async fn sub_regions(&self, master: Option<String>) -> AppResult<Vec<SubRegion>> {
        let regions = self.repo.sub_regions(master).await?;
        if regions.is_empty() {
            return Err(AppError::not_found("Failed to retrieve sub region data"));
        }
        Ok(regions)
    }

    async fn news(&self, date: NaiveDate) -> AppResult<BTreeMap<String, Vec<NewsArticle>>> {
        let articles = self.repo.news_on(date).await?;
        Ok(group_by_category(articles))
    }
}
