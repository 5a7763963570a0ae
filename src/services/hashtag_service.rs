//! Look-aside cache in front of the hashtag acquisition pipeline.
//!
//! Entries are keyed by platform and carry an absolute expiry; freshness is
//! decided at read time against an injected [`Clock`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::acquisition::HashtagAcquirer;
use crate::config::HashtagConfig;
use crate::hashtags::catalog::fallback_list;
use crate::hashtags::{HashtagSet, Platform};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One cached result per platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub platform: Platform,
    pub tags: Vec<String>,
    pub is_estimated: bool,
    /// Label of the stage that produced the tags (source name, `static`,
    /// `generated` or `fallback`).
    pub source: String,
    pub last_updated: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    #[must_use]
    pub fn from_set(set: &HashtagSet, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            platform: set.platform,
            tags: set.tags.clone(),
            is_estimated: set.is_estimated(),
            source: set.origin.label().to_string(),
            last_updated: now,
            expires_at,
        }
    }

    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Persistence collaborator for the cache.
#[async_trait]
pub trait HashtagCacheStore: Send + Sync {
    /// The entry for `platform` if it expires strictly after `now`.
    async fn find_fresh(
        &self,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<CacheEntry>>;

    /// Inserts or replaces the single entry for `entry.platform`.
    async fn upsert(&self, entry: &CacheEntry) -> anyhow::Result<()>;

    async fn list_entries(&self) -> anyhow::Result<Vec<CacheEntry>>;

    /// Removes the entry for one platform, or every entry when `None`.
    async fn clear(&self, platform: Option<Platform>) -> anyhow::Result<u64>;

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64>;
}

#[derive(Debug, Error)]
pub enum HashtagError {
    /// The cache could not be read or written. `fallback` is the best tag
    /// list available at the point of failure.
    #[error("Hashtag cache error: {message}")]
    Persistence {
        message: String,
        fallback: Vec<String>,
        is_estimated: bool,
    },
}

/// Result of [`HashtagCacheManager::get_or_refresh`].
#[derive(Debug, Clone)]
pub struct CachedHashtags {
    pub entry: CacheEntry,
    pub cached: bool,
}

pub struct HashtagCacheManager {
    store: Arc<dyn HashtagCacheStore>,
    acquirer: Arc<HashtagAcquirer>,
    clock: Arc<dyn Clock>,
    config: HashtagConfig,
    in_flight: HashMap<Platform, Mutex<()>>,
}

impl HashtagCacheManager {
    #[must_use]
    pub fn new(
        store: Arc<dyn HashtagCacheStore>,
        acquirer: Arc<HashtagAcquirer>,
        clock: Arc<dyn Clock>,
        config: HashtagConfig,
    ) -> Self {
        let in_flight = Platform::ALL
            .into_iter()
            .map(|p| (p, Mutex::new(())))
            .collect();
        Self {
            store,
            acquirer,
            clock,
            config,
            in_flight,
        }
    }

    #[must_use]
    pub fn ttl(&self, platform: Platform) -> Duration {
        self.config.ttl_for(platform)
    }

    async fn lookup(&self, platform: Platform) -> Result<Option<CacheEntry>, HashtagError> {
        let now = self.clock.now();
        self.store
            .find_fresh(platform, now)
            .await
            .map_err(|e| HashtagError::Persistence {
                message: e.to_string(),
                fallback: fallback_list(platform),
                is_estimated: true,
            })
    }

    /// Serves a fresh cache entry, or acquires and stores a new one.
    ///
    /// Concurrent misses for the same platform are serialized; whoever waits
    /// re-reads the cache instead of running the chain again.
    pub async fn get_or_refresh(&self, platform: Platform) -> Result<CachedHashtags, HashtagError> {
        if let Some(entry) = self.lookup(platform).await? {
            return Ok(Self::hit(entry));
        }

        let _guard = match self.in_flight.get(&platform) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        if let Some(entry) = self.lookup(platform).await? {
            return Ok(Self::hit(entry));
        }

        metrics::counter!("hashtag_cache_total", "platform" => platform.as_str(), "outcome" => "miss")
            .increment(1);
        self.acquire_and_store(platform).await
    }

    /// Re-acquires regardless of freshness.
    pub async fn refresh(&self, platform: Platform) -> Result<CachedHashtags, HashtagError> {
        let _guard = match self.in_flight.get(&platform) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };
        self.acquire_and_store(platform).await
    }

    pub async fn entries(&self) -> anyhow::Result<Vec<CacheEntry>> {
        self.store.list_entries().await
    }

    pub async fn clear(&self, platform: Option<Platform>) -> anyhow::Result<u64> {
        let removed = self.store.clear(platform).await?;
        info!(removed, "Cleared hashtag cache");
        Ok(removed)
    }

    pub async fn purge_expired(&self) -> anyhow::Result<u64> {
        self.store.purge_expired(self.clock.now()).await
    }

    fn hit(entry: CacheEntry) -> CachedHashtags {
        debug!(platform = %entry.platform, "Hashtag cache hit");
        metrics::counter!("hashtag_cache_total", "platform" => entry.platform.as_str(), "outcome" => "hit")
            .increment(1);
        CachedHashtags {
            entry,
            cached: true,
        }
    }

    async fn acquire_and_store(&self, platform: Platform) -> Result<CachedHashtags, HashtagError> {
        let set = self.acquirer.acquire(platform).await;
        let entry = CacheEntry::from_set(&set, self.clock.now(), self.ttl(platform));

        if let Err(e) = self.store.upsert(&entry).await {
            return Err(HashtagError::Persistence {
                message: e.to_string(),
                fallback: entry.tags,
                is_estimated: entry.is_estimated,
            });
        }

        info!(
            platform = %platform,
            source = %entry.source,
            tags = entry.tags.len(),
            expires_at = %entry.expires_at,
            "Hashtag cache refreshed"
        );

        Ok(CachedHashtags {
            entry,
            cached: false,
        })
    }
}
