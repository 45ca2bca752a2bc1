//! Disaster service - regional disaster messages, cached per account and
//! turned into family notifications.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use common::{AppError, AppResult};
use domain::weather::kst_today;
use domain::{Account, DisasterMessage, NewNotification};
use storage::{AccountRepository, FamilyRepository, NotificationRepository};

use crate::cache::{CacheStore, CachedEntry, CACHE_PREFIX_DISASTER};
use crate::clients::DisasterSource;

/// How long a cache backend keeps stale messages around for fallback
pub const DISASTER_RETENTION: Duration = Duration::from_secs(24 * 3600);

/// Portal lookups in flight during a polling round
const POLL_CONCURRENCY: usize = 5;

/// Outcome of one polling round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub accounts: usize,
    pub messages: usize,
    pub notifications: usize,
}

#[async_trait]
pub trait DisasterService: Send + Sync {
    /// Today's portal items for the account's address, straight from the
    /// portal. A failed lookup yields an empty list.
    async fn check(&self, user_id: &str) -> AppResult<Vec<Value>>;

    /// Items from cache when fresh, else refreshed, falling back to a stale
    /// entry when the refresh fails.
    async fn cached(&self, user_id: &str) -> AppResult<Vec<Value>>;

    /// Refresh every account with an address and notify main users' families
    /// of messages not seen before.
    async fn poll(&self) -> AppResult<PollSummary>;
}

pub struct DisasterManager {
    accounts: Arc<dyn AccountRepository>,
    families: Arc<dyn FamilyRepository>,
    notifications: Arc<dyn NotificationRepository>,
    source: Arc<dyn DisasterSource>,
    cache: Arc<dyn CacheStore>,
    max_age: Duration,
}

impl DisasterManager {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        families: Arc<dyn FamilyRepository>,
        notifications: Arc<dyn NotificationRepository>,
        source: Arc<dyn DisasterSource>,
        cache: Arc<dyn CacheStore>,
        max_age: Duration,
    ) -> Self {
        Self {
            accounts,
            families,
            notifications,
            source,
            cache,
            max_age,
        }
    }

    fn key(user_id: &str) -> String {
        format!("{}{}", CACHE_PREFIX_DISASTER, user_id)
    }

    async fn address_of(&self, user_id: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .find_by_id(user_id)
            .await?
            .filter(|a| a.address.as_deref().is_some_and(|s| !s.trim().is_empty())))
    }

    /// Portal lookup for an account with an address, cached on success.
    async fn fetch(&self, account: &Account) -> AppResult<Vec<Value>> {
        let address = account.address.as_deref().unwrap_or_default();
        let items = self.source.messages(address, kst_today()).await?;

        if let Err(e) = self
            .cache
            .put(
                &Self::key(&account.id),
                Value::Array(items.clone()),
                DISASTER_RETENTION,
            )
            .await
        {
            warn!(user_id = %account.id, "Disaster cache write failed: {}", e);
        }
        Ok(items)
    }

    /// One notification per message serial for the family of a main user.
    /// Items without a usable serial cannot be deduplicated and are skipped.
    async fn notify(&self, account: &Account, items: &[Value]) -> AppResult<usize> {
        if !account.is_main() || items.is_empty() {
            return Ok(0);
        }
        let Some(family) = self.families.find_by_main_user(&account.id).await? else {
            return Ok(0);
        };

        let messages = items.iter().filter_map(|item| {
            DisasterMessage::deserialize(item)
                .map_err(|e| debug!(user_id = %account.id, "Skipping disaster item: {}", e))
                .ok()
        });

        let mut created = 0;
        for message in messages {
            let input = NewNotification {
                family_id: family.id.clone(),
                notification_grade: message.grade(),
                description: message.describe(),
                message_sn: Some(message.serial),
            };
            if self.notifications.create_if_new(input).await?.is_some() {
                created += 1;
            }
        }
        Ok(created)
    }
}

#[async_trait]
impl DisasterService for DisasterManager {
    async fn check(&self, user_id: &str) -> AppResult<Vec<Value>> {
        let Some(account) = self.address_of(user_id).await? else {
            return Ok(Vec::new());
        };

        match self.fetch(&account).await {
            Ok(messages) => Ok(messages),
            Err(e) => {
                warn!(user_id, "Disaster lookup failed: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn cached(&self, user_id: &str) -> AppResult<Vec<Value>> {
        let cached: Option<(CachedEntry, Vec<Value>)> =
            match self.cache.get(&Self::key(user_id)).await {
                Ok(entry) => entry.and_then(|e| {
                    let messages = e.decode()?;
                    Some((e, messages))
                }),
                Err(e) => {
                    warn!(user_id, "Disaster cache read failed: {}", e);
                    None
                }
            };

        if let Some((entry, messages)) = &cached {
            if entry.is_fresh(self.max_age, Utc::now()) {
                debug!(user_id, "Returning cached disaster messages");
                return Ok(messages.clone());
            }
        }

        let Some(account) = self.address_of(user_id).await? else {
            return Ok(Vec::new());
        };
        match self.fetch(&account).await {
            Ok(messages) => Ok(messages),
            Err(e) => match cached {
                Some((_, stale)) => {
                    warn!(user_id, "Disaster refresh failed, serving stale messages: {}", e);
                    Ok(stale)
                }
                None => Err(AppError::server(format!(
                    "Failed to retrieve disaster messages: {}",
                    e
                ))),
            },
        }
    }

    async fn poll(&self) -> AppResult<PollSummary> {
        let accounts = self.accounts.list_with_address().await?;
        let mut summary = PollSummary {
            accounts: accounts.len(),
            ..PollSummary::default()
        };

        let fetches: Vec<_> = accounts
            .iter()
            .map(|account| async move { (account, self.fetch(account).await) })
            .collect();
        let lookups: Vec<(&Account, AppResult<Vec<Value>>)> = stream::iter(fetches)
            .buffer_unordered(POLL_CONCURRENCY)
            .collect()
            .await;

        for (account, lookup) in lookups {
            let messages = match lookup {
                Ok(messages) => messages,
                Err(e) => {
                    warn!(user_id = %account.id, "Disaster lookup failed: {}", e);
                    continue;
                }
            };
            summary.messages += messages.len();

            match self.notify(account, &messages).await {
                Ok(created) => summary.notifications += created,
                Err(e) => warn!(user_id = %account.id, "Disaster notification failed: {}", e),
            }
        }

        if summary.notifications > 0 {
            info!(
                accounts = summary.accounts,
                notifications = summary.notifications,
                "Disaster notifications created"
            );
        }
        Ok(summary)
    }
}
