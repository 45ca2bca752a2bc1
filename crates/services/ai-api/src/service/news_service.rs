//! News service - collects the latest articles of every category.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::AppResult;
use domain::constants::NEWS_CATEGORIES;
use storage::ToolRepository;

use crate::clients::NewsSource;

#[async_trait]
pub trait NewsService: Send + Sync {
    /// Store unseen articles of every category. Returns how many were new.
    async fn collect(&self) -> AppResult<usize>;
}

pub struct NewsManager {
    tools: Arc<dyn ToolRepository>,
    source: Arc<dyn NewsSource>,
}

impl NewsManager {
    pub fn new(tools: Arc<dyn ToolRepository>, source: Arc<dyn NewsSource>) -> Self {
        Self { tools, source }
    }
}

#[async_trait]
impl NewsService for NewsManager {
    async fn collect(&self) -> AppResult<usize> {
        let mut inserted = 0;
        for category in NEWS_CATEGORIES {
            let articles = match self.source.latest(category).await {
                Ok(articles) => articles,
                Err(e) => {
                    warn!(category, "News lookup failed: {}", e);
                    continue;
                }
            };
            for article in articles {
                if self.tools.insert_news(article).await? {
                    inserted += 1;
                }
            }
        }
        info!(inserted, "News collected");
        Ok(inserted)
    }
}
