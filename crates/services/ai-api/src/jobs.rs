//! Background polling loops of the AI API.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{debug, info, warn};

use crate::service::{DisasterService, NewsService, WeatherService};

/// Refresh the cached forecast of every account with an address.
pub async fn weather_refresh_task(weather: Arc<dyn WeatherService>, every: Duration) {
    let mut interval = time::interval(every);
    info!(interval_secs = every.as_secs(), "Weather refresh task started");

    loop {
        interval.tick().await;

        if let Err(e) = weather.refresh_all().await {
            warn!("Weather refresh failed: {}", e);
        }
    }
}

/// Poll disaster messages and notify families of new ones.
pub async fn disaster_poll_task(disaster: Arc<dyn DisasterService>, every: Duration) {
    let mut interval = time::interval(every);
    info!(interval_secs = every.as_secs(), "Disaster poll task started");

    loop {
        interval.tick().await;

        match disaster.poll().await {
            Ok(summary) => debug!(
                accounts = summary.accounts,
                messages = summary.messages,
                notifications = summary.notifications,
                "Disaster poll finished"
            ),
            Err(e) => warn!("Disaster poll failed: {}", e),
        }
    }
}

/// Collect the latest news of every category.
pub async fn news_collect_task(news: Arc<dyn NewsService>, every: Duration) {
    let mut interval = time::interval(every);
    info!(interval_secs = every.as_secs(), "News collection task started");

    loop {
        interval.tick().await;

        if let Err(e) = news.collect().await {
            warn!("News collection failed: {}", e);
        }
    }
}
