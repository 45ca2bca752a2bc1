//! newsdata.io client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use common::{AppError, AppResult};
use domain::weather::kst_today;
use domain::NewNewsArticle;

/// Latest articles of a news category.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn latest(&self, category: &str) -> AppResult<Vec<NewNewsArticle>>;
}

#[derive(Debug, Deserialize)]
struct LatestNews {
    #[serde(default)]
    results: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    title: Option<String>,
    link: Option<String>,
    image_url: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Articles of a `latest` response, filed under `category`. Items without a
/// title or link are dropped; an unreadable date becomes today (KST).
pub fn parse_latest(body: &str, category: &str) -> AppResult<Vec<NewNewsArticle>> {
    let latest: LatestNews = serde_json::from_str(body)
        .map_err(|e| AppError::upstream(format!("Unexpected news response: {}", e)))?;

    Ok(latest
        .results
        .into_iter()
        .filter_map(|item| {
            let title = item.title.filter(|t| !t.trim().is_empty())?;
            let link = item.link.filter(|l| !l.trim().is_empty())?;
            let pub_date = item
                .pub_date
                .as_deref()
                .and_then(|d| d.get(..10))
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .unwrap_or_else(kst_today);
            Some(NewNewsArticle {
                category: category.to_string(),
                title,
                link,
                image_url: item.image_url,
                pub_date,
            })
        })
        .collect())
}

/// reqwest implementation of [`NewsSource`].
pub struct NewsDataClient {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl NewsDataClient {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build news client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl NewsSource for NewsDataClient {
    async fn latest(&self, category: &str) -> AppResult<Vec<NewNewsArticle>> {
        let body = self
            .http_client
            .get(&self.url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("country", "kr"),
                ("language", "ko"),
                ("category", category),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::upstream(format!("News API request failed: {}", e)))?
            .text()
            .await
            .map_err(|e| AppError::upstream(format!("News API request failed: {}", e)))?;

        parse_latest(&body, category)
    }
}
