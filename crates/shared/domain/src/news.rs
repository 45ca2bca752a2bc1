//! News articles served by the tools endpoint.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::NEWS_CATEGORIES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewsArticle {
    pub id: i32,
    pub category: String,
    pub title: String,
    pub link: String,
    pub image_url: Option<String>,
    pub pub_date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNewsArticle {
    pub category: String,
    pub title: String,
    pub link: String,
    pub image_url: Option<String>,
    pub pub_date: NaiveDate,
}

/// Group articles by category. Every known category is present, possibly
/// empty; articles of unknown categories are dropped.
pub fn group_by_category(articles: Vec<NewsArticle>) -> BTreeMap<String, Vec<NewsArticle>> {
    let mut grouped: BTreeMap<String, Vec<NewsArticle>> = NEWS_CATEGORIES
        .iter()
        .map(|c| (c.to_string(), Vec::new()))
        .collect();

    for article in articles {
        if let Some(bucket) = grouped.get_mut(&article.category) {
            bucket.push(article);
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i32, category: &str) -> NewsArticle {
        NewsArticle {
            id,
            category: category.into(),
            title: format!("title {}", id),
            link: format!("https://news.example/{}", id),
            image_url: None,
            pub_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            created_at: None,
        }
    }

    #[test]
    fn test_group_by_category_has_all_categories() {
        let grouped = group_by_category(vec![
            article(1, "health"),
            article(2, "health"),
            article(3, "sports"),
            article(4, "gossip"),
        ]);

        assert_eq!(grouped.len(), NEWS_CATEGORIES.len());
        assert_eq!(grouped["health"].len(), 2);
        assert_eq!(grouped["sports"].len(), 1);
        assert!(grouped["business"].is_empty());
        assert!(!grouped.contains_key("gossip"));
    }
}
