//! Short-lived cache of raw Yahoo payloads
//!
//! Peer validation and the target lookup can ask for the same symbol more
//! than once in a run; entries expire after the configured TTL.

use cached::{Cached, TimedCache};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Which upstream call a payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    QuoteSummary,
    News,
    Chart,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QuoteSummary => "quote_summary",
            Self::News => "news",
            Self::Chart => "chart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub endpoint: Endpoint,
}

impl CacheKey {
    pub fn new(symbol: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.symbol, self.endpoint.as_str())
    }
}

/// TTL cache shared by every clone of a client
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<Mutex<TimedCache<CacheKey, Value>>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Return the cached payload for `key`, or run `fetch` and keep its result
    ///
    /// Errors pass through and leave the cache untouched.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetch: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(hit) = self.entries.lock().await.cache_get(&key).cloned() {
            debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        debug!("Cache miss for {}", key);
        let value = fetch().await?;
        self.entries.lock().await.cache_set(key, value.clone());
        Ok(value)
    }
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache").finish_non_exhaustive()
    }
}
