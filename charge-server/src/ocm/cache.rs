//! Caching layer for station directory responses.
//!
//! A query session re-filters the same region many times; caching the raw
//! response for a while means changing filter criteria never re-fetches.
//! Only successful responses are cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use super::error::FetchError;
use super::request::FetchRequest;
use super::types::RawStation;
use super::StationSource;

/// Cached response entry.
type StationsEntry = Arc<Vec<RawStation>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached responses.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 64,
        }
    }
}

/// Station source with caching.
///
/// Wraps any [`StationSource`] and caches its responses keyed by
/// [`FetchRequest::cache_key`].
pub struct CachedStationSource<S> {
    source: S,
    cache: MokaCache<String, StationsEntry>,
}

impl<S: StationSource> CachedStationSource<S> {
    /// Create a new cached source.
    pub fn new(source: S, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { source, cache }
    }

    /// Fetch stations, using the cache if available.
    pub async fn fetch_shared(&self, request: &FetchRequest) -> Result<StationsEntry, FetchError> {
        let key = request.cache_key();

        if let Some(cached) = self.cache.get(&key).await {
            debug!(region = %request.region, "station cache hit");
            return Ok(cached);
        }

        let entry = Arc::new(self.source.fetch(request).await?);
        self.cache.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Access the underlying source for operations that bypass cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

impl<S: StationSource + Sync> StationSource for CachedStationSource<S> {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawStation>, FetchError> {
        let entry = self.fetch_shared(request).await?;
        Ok(entry.as_ref().clone())
    }
}
