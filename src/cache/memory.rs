// ABOUTME: In-memory query cache with LRU eviction and staleness tracking
// ABOUTME: Entries go stale after the staleness window or when invalidated by a mutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{CacheClient, CacheKey, CachedResult};
use crate::config::ClientConfig;
use crate::envelope::ResponseEnvelope;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A cached envelope with fetch time and invalidation flag
#[derive(Debug, Clone)]
struct CacheEntry {
    envelope: ResponseEnvelope,
    fetched_at: Instant,
    invalidated: bool,
}

impl CacheEntry {
    fn new(envelope: ResponseEnvelope) -> Self {
        Self {
            envelope,
            fetched_at: Instant::now(),
            invalidated: false,
        }
    }

    fn is_stale(&self, stale_time: Duration) -> bool {
        self.invalidated || self.fetched_at.elapsed() >= stale_time
    }
}

/// In-memory query cache with LRU eviction
///
/// A zero staleness window makes every entry stale immediately, so each read
/// goes to the network while the last result stays available for display.
#[derive(Clone)]
pub struct InMemoryQueryCache {
    store: Arc<RwLock<LruCache<CacheKey, CacheEntry>>>,
    stale_time: Duration,
}

impl InMemoryQueryCache {
    /// Default cache capacity when zero entries are requested
    const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a cache holding at most `max_entries` results
    #[must_use]
    pub fn new(max_entries: usize, stale_time: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::DEFAULT_CACHE_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            stale_time,
        }
    }

    /// Create a cache sized and timed from client configuration
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.cache.max_entries, config.query.stale_time)
    }

    /// Number of entries currently held
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Configured staleness window
    #[must_use]
    pub const fn stale_time(&self) -> Duration {
        self.stale_time
    }
}

impl Default for InMemoryQueryCache {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[async_trait::async_trait]
impl CacheClient for InMemoryQueryCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedResult> {
        // LruCache::get is mutable (updates access order)
        let mut store = self.store.write().await;
        let entry = store.get(key)?;
        Some(CachedResult {
            envelope: entry.envelope.clone(),
            is_stale: entry.is_stale(self.stale_time),
        })
    }

    async fn set(&self, key: CacheKey, value: ResponseEnvelope) {
        self.store.write().await.push(key, CacheEntry::new(value));
    }

    async fn invalidate(&self, keys: &[CacheKey]) -> usize {
        let mut store = self.store.write().await;
        let mut affected = 0;
        for (cached_key, entry) in store.iter_mut() {
            if keys.iter().any(|prefix| cached_key.starts_with(prefix)) {
                entry.invalidated = true;
                affected += 1;
            }
        }
        drop(store);
        tracing::debug!(keys = keys.len(), affected, "Invalidated cached queries");
        affected
    }

    async fn clear_all(&self) {
        self.store.write().await.clear();
    }
}
