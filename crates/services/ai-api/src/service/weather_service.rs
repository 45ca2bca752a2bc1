//! Weather service - forecasts for an account's address, cached per account.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use common::{AppError, AppResult};
use domain::{Account, Weather, WeatherDisplay};
use storage::{AccountRepository, ToolRepository};

use crate::cache::{CacheStore, CachedEntry, CACHE_PREFIX_WEATHER};
use crate::clients::WeatherSource;

/// How long a cache backend keeps a stale forecast around for fallback
pub const WEATHER_RETENTION: Duration = Duration::from_secs(24 * 3600);

/// Forecast lookups in flight during a refresh round
const REFRESH_CONCURRENCY: usize = 10;

#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Forecast codes, from cache when younger than the cache duration.
    async fn weather(&self, user_id: &str) -> AppResult<Weather>;

    /// Display form, falling back to a stale forecast when a refresh fails.
    async fn weather_info(&self, user_id: &str) -> AppResult<WeatherDisplay>;

    /// Refresh the forecast of every account with an address. Returns the
    /// number refreshed.
    async fn refresh_all(&self) -> AppResult<usize>;
}

pub struct WeatherManager {
    accounts: Arc<dyn AccountRepository>,
    tools: Arc<dyn ToolRepository>,
    source: Arc<dyn WeatherSource>,
    cache: Arc<dyn CacheStore>,
    max_age: Duration,
}

impl WeatherManager {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        tools: Arc<dyn ToolRepository>,
        source: Arc<dyn WeatherSource>,
        cache: Arc<dyn CacheStore>,
        max_age: Duration,
    ) -> Self {
        Self {
            accounts,
            tools,
            source,
            cache,
            max_age,
        }
    }

    fn key(user_id: &str) -> String {
        format!("{}{}", CACHE_PREFIX_WEATHER, user_id)
    }

    async fn cached(&self, user_id: &str) -> Option<(CachedEntry, Weather)> {
        match self.cache.get(&Self::key(user_id)).await {
            Ok(Some(entry)) => {
                let weather = entry.decode()?;
                Some((entry, weather))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(user_id, "Weather cache read failed: {}", e);
                None
            }
        }
    }

    /// Look up the forecast of an account's address and cache it.
    async fn fetch(&self, account: &Account) -> AppResult<Weather> {
        let address = account
            .address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| AppError::not_found("주소 정보가 없습니다."))?;

        let grid = self.tools.grid_of(address).await?.ok_or_else(|| {
            error!(address, "No grid coordinates for address");
            AppError::not_found("위치 정보를 찾을 수 없습니다.")
        })?;

        let codes = self.source.forecast(grid).await.map_err(|e| {
            error!(x = grid.x, y = grid.y, "Weather lookup failed: {}", e);
            AppError::server("날씨 정보 조회에 실패했습니다.")
        })?;

        let weather = Weather {
            address: address.to_string(),
            weather: codes,
        };
        let value = serde_json::to_value(&weather)
            .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;
        if let Err(e) = self
            .cache
            .put(&Self::key(&account.id), value, WEATHER_RETENTION)
            .await
        {
            warn!(user_id = %account.id, "Weather cache write failed: {}", e);
        }
        Ok(weather)
    }

    async fn fetch_for(&self, user_id: &str) -> AppResult<Weather> {
        let account = self
            .accounts
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("주소 정보가 없습니다."))?;
        self.fetch(&account).await
    }
}

#[async_trait]
impl WeatherService for WeatherManager {
    async fn weather(&self, user_id: &str) -> AppResult<Weather> {
        if let Some((entry, weather)) = self.cached(user_id).await {
            if entry.is_fresh(self.max_age, Utc::now()) {
                debug!(user_id, "Returning cached weather");
                return Ok(weather);
            }
        }
        self.fetch_for(user_id).await
    }

    async fn weather_info(&self, user_id: &str) -> AppResult<WeatherDisplay> {
        let cached = self.cached(user_id).await;
        if let Some((entry, weather)) = &cached {
            if entry.is_fresh(self.max_age, Utc::now()) {
                return Ok(WeatherDisplay::from(weather));
            }
        }

        match self.fetch_for(user_id).await {
            Ok(weather) => Ok(WeatherDisplay::from(&weather)),
            Err(e) => match cached {
                Some((_, stale)) => {
                    warn!(user_id, "Weather refresh failed, serving stale forecast: {}", e);
                    Ok(WeatherDisplay::from(&stale))
                }
                None => Err(e),
            },
        }
    }

    async fn refresh_all(&self) -> AppResult<usize> {
        let accounts = self.accounts.list_with_address().await?;
        let fetches: Vec<_> = accounts
            .iter()
            .map(|account| async move { (account, self.fetch(account).await) })
            .collect();
        let outcomes: Vec<(&Account, AppResult<Weather>)> = stream::iter(fetches)
            .buffer_unordered(REFRESH_CONCURRENCY)
            .collect()
            .await;

        let mut refreshed = 0;
        for (account, outcome) in outcomes {
            match outcome {
                Ok(_) => refreshed += 1,
                Err(e) => warn!(user_id = %account.id, "Weather refresh failed: {}", e),
            }
        }
        info!(refreshed, total = accounts.len(), "Weather cache refreshed");
        Ok(refreshed)
    }
}
