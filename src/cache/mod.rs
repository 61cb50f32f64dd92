// ABOUTME: Query cache abstraction: structured keys and the pluggable cache client trait
// ABOUTME: Supports get-or-fetch on reads and prefix invalidation after mutations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// In-memory LRU query cache
pub mod memory;

use crate::constants::cache::KEY_SEPARATOR;
use crate::envelope::ResponseEnvelope;
use crate::errors::AppResult;
use futures_util::future::BoxFuture;
use std::fmt;

/// Cache client trait injected into the orchestrator
///
/// # Examples
///
/// ```rust,no_run
/// use recruit_query::cache::{CacheClient, CacheKey};
/// use recruit_query::cache::memory::InMemoryQueryCache;
/// use recruit_query::envelope::ResponseEnvelope;
/// use serde_json::json;
/// use std::time::Duration;
/// # async fn example() -> recruit_query::errors::AppResult<()> {
///
/// let cache = InMemoryQueryCache::new(100, Duration::from_secs(300));
/// let key = CacheKey::from("athletes");
///
/// let envelope = cache
///     .fetch(key.clone(), Box::pin(async { Ok(ResponseEnvelope::ok(json!([]))) }))
///     .await?;
///
/// // After a mutation: the next read re-fetches
/// cache.invalidate(&[key]).await;
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait CacheClient: Send + Sync {
    /// Look up an entry, fresh or stale
    async fn get(&self, key: &CacheKey) -> Option<CachedResult>;

    /// Store a freshly fetched result
    async fn set(&self, key: CacheKey, value: ResponseEnvelope);

    /// Mark every entry under each key (segment prefix match) stale.
    /// Returns the number of entries affected.
    async fn invalidate(&self, keys: &[CacheKey]) -> usize;

    /// Drop every entry
    async fn clear_all(&self);

    /// Serve a fresh entry, otherwise await `fetcher` and store its result
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error; failed fetches are not cached
    async fn fetch(
        &self,
        key: CacheKey,
        fetcher: BoxFuture<'_, AppResult<ResponseEnvelope>>,
    ) -> AppResult<ResponseEnvelope> {
        if let Some(hit) = self.get(&key).await {
            if !hit.is_stale {
                tracing::debug!(cache.key = %key, "Query cache hit");
                return Ok(hit.envelope);
            }
        }
        let envelope = fetcher.await?;
        self.set(key, envelope.clone()).await;
        Ok(envelope)
    }
}

/// Cached envelope with its staleness at lookup time
#[derive(Debug, Clone)]
pub struct CachedResult {
    /// The cached response
    pub envelope: ResponseEnvelope,
    /// Whether the entry outlived the staleness window or was invalidated
    pub is_stale: bool,
}

/// Cache key made of ordered segments, e.g. `["athletes", "42"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    segments: Vec<String>,
}

impl CacheKey {
    /// Create a key from its segments
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a segment
    #[must_use]
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Key segments in order
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment-wise prefix test: `["a"]` covers `["a", "x"]` but not `["ab"]`
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self::new([key])
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self::new([key])
    }
}

impl From<Vec<String>> for CacheKey {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{KEY_SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
