//! Response cache for weather and disaster lookups.
//!
//! Entries keep the time they were stored so callers decide freshness and
//! can fall back to a stale entry when a refresh fails.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, AsyncCommands, RedisError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use common::{AppError, AppResult};

/// Cache key prefix for forecasts by account
pub const CACHE_PREFIX_WEATHER: &str = "weather:";

/// Cache key prefix for disaster messages by account
pub const CACHE_PREFIX_DISASTER: &str = "disaster:";

/// A cached value and when it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub value: Value,
    pub stored_at: DateTime<Utc>,
}

impl CachedEntry {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
        }
    }

    /// Stored no longer than `max_age` before `now`.
    pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.stored_at);
        age.num_milliseconds() <= max_age.as_millis() as i64
    }

    /// Decode the value; an entry of another shape counts as a miss.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        match serde_json::from_value(self.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to deserialize cached value: {}", e);
                None
            }
        }
    }
}

/// Key-value store for [`CachedEntry`] values.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<CachedEntry>>;

    /// Store `value` now. `retain` bounds how long the backend keeps it.
    async fn put(&self, key: &str, value: Value, retain: Duration) -> AppResult<()>;
}

/// Process-local cache. Entries are overwritten, never evicted.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> AppResult<Option<CachedEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value, _retain: Duration) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), CachedEntry::new(value));
        Ok(())
    }
}

/// Redis-backed cache shared between instances.
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        debug!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<CachedEntry>> {
        let mut conn = self.conn.clone();
        let result: Option<String> = conn.get(key).await.map_err(|e| {
            warn!("Redis get error for key {}: {}", key, e);
            AppError::from(e)
        })?;

        match result {
            Some(json) => match serde_json::from_str(&json) {
                Ok(entry) => Ok(Some(entry)),
                Err(e) => {
                    warn!("Failed to deserialize cached entry for key {}: {}", key, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Value, retain: Duration) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(&CachedEntry::new(value))
            .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;
        conn.set_ex::<_, _, ()>(key, json, retain.as_secs().max(1))
            .await
            .map_err(|e| {
                warn!("Redis set error for key {}: {}", key, e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
