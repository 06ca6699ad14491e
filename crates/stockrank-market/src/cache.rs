//! Short-lived cache of raw Marketstack pages
//!
//! A backfill followed by a scheduled run often asks for the same page twice
//! within minutes; caching the decoded body saves quota on the second call.

use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Query parameters that never become part of a key
const SECRET_PARAMS: &[&str] = &["access_key"];

/// Cache key for one page request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Endpoint path, e.g. `eod`
    pub endpoint: String,
    /// Query parameters, sorted, without the access key
    pub params: Vec<(String, String)>,
}

impl CacheKey {
    /// Build a key from an endpoint and its query pairs
    pub fn new<'a>(
        endpoint: impl Into<String>,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut params: Vec<(String, String)> = params
            .into_iter()
            .filter(|(name, _)| !SECRET_PARAMS.contains(name))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        params.sort();

        Self {
            endpoint: endpoint.into(),
            params,
        }
    }
}

/// Thread-safe TTL cache of page bodies
#[derive(Clone)]
pub struct ResponseCache {
    cache: Option<Arc<RwLock<TimedCache<CacheKey, serde_json::Value>>>>,
}

impl ResponseCache {
    /// Create a cache whose entries live for `ttl`; a zero TTL disables it
    pub fn new(ttl: Duration) -> Self {
        let cache = (!ttl.is_zero())
            .then(|| Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))));
        Self { cache }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Look up a page; expired entries count as misses
    pub async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let cache = self.cache.as_ref()?;
        // TimedCache evicts on read, which needs the write lock
        let hit = cache.write().await.cache_get(key).cloned();
        debug!(endpoint = %key.endpoint, hit = hit.is_some(), "page cache lookup");
        hit
    }

    pub async fn insert(&self, key: CacheKey, value: serde_json::Value) {
        if let Some(cache) = &self.cache {
            let _ = cache.write().await.cache_set(key, value);
        }
    }

    pub async fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.write().await.cache_clear();
        }
    }

    pub async fn len(&self) -> usize {
        match &self.cache {
            Some(cache) => cache.read().await.cache_size(),
            None => 0,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
