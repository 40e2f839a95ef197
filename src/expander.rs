//! Cache expander - read-through lookups and best-effort invalidation.
//!
//! Every cache failure is swallowed here: a failed or undecodable `get` is a
//! miss, a failed `set` or `delete` is logged and reported to metrics. Callers
//! only ever see errors raised by their own loader.

use crate::backend::CacheBackend;
use crate::error::Result;
use crate::observability::{CacheMetrics, NoOpMetrics, TtlPolicy};
use crate::serialization::{deserialize_from_cache, serialize_for_cache};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Instant;

/// Core cache expander.
///
/// # Example
///
/// ```ignore
/// use book_cache::{CacheExpander, backend::InMemoryBackend};
///
/// let expander = CacheExpander::new(InMemoryBackend::new());
/// let books: Option<Vec<Book>> = expander
///     .read_through("all_books", "book", || async { repo.find_all().await.map(Some) })
///     .await?;
/// ```
pub struct CacheExpander<B: CacheBackend> {
    backend: B,
    metrics: Box<dyn CacheMetrics>,
    ttl_policy: TtlPolicy,
}

impl<B: CacheBackend> CacheExpander<B> {
    /// Create new expander with given backend and the default 10 minute TTL.
    pub fn new(backend: B) -> Self {
        CacheExpander {
            backend,
            metrics: Box::new(NoOpMetrics),
            ttl_policy: TtlPolicy::default(),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set custom TTL policy.
    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl_policy = policy;
        self
    }

    pub fn ttl_policy(&self) -> &TtlPolicy {
        &self.ttl_policy
    }

    /// Cache-first read with loader fallback.
    ///
    /// On hit the cached value is returned and `load` is never called. On
    /// miss `load` runs; a `Some` result is written back under `cache_key`
    /// with the TTL for `entity_type`, a `None` result is not cached.
    ///
    /// # Errors
    ///
    /// Only errors returned by `load` propagate.
    pub async fn read_through<V, F, Fut>(
        &self,
        cache_key: &str,
        entity_type: &str,
        load: F,
    ) -> Result<Option<V>>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>>>,
    {
        let timer = Instant::now();

        if let Some(value) = self.lookup::<V>(cache_key).await {
            self.metrics.record_hit(cache_key, timer.elapsed());
            debug!("✓ Cache hit for {}", cache_key);
            return Ok(Some(value));
        }

        self.metrics.record_miss(cache_key, timer.elapsed());
        debug!("Cache miss for {}, falling back to store", cache_key);

        let loaded = load().await?;
        if let Some(value) = &loaded {
            self.populate(cache_key, entity_type, value).await;
        }
        Ok(loaded)
    }

    /// Best-effort cache read. Backend and decoding failures count as a miss.
    pub async fn lookup<V: DeserializeOwned>(&self, cache_key: &str) -> Option<V> {
        let bytes = match self.backend.get(cache_key).await {
            Ok(bytes) => bytes?,
            Err(e) => {
                self.metrics.record_error(cache_key, &e.to_string());
                warn!("Cache read failed for {}, treating as miss: {}", cache_key, e);
                return None;
            }
        };

        match deserialize_from_cache(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                self.metrics.record_error(cache_key, &e.to_string());
                warn!("Discarding undecodable cache entry {}: {}", cache_key, e);
                None
            }
        }
    }

    /// Best-effort cache write with the policy TTL for `entity_type`.
    pub async fn populate<V: Serialize + ?Sized>(&self, cache_key: &str, entity_type: &str, value: &V) {
        let timer = Instant::now();
        let ttl = self.ttl_policy.get_ttl(entity_type);

        let outcome = match serialize_for_cache(value) {
            Ok(bytes) => self.backend.set(cache_key, bytes, ttl).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => self.metrics.record_set(cache_key, timer.elapsed()),
            Err(e) => {
                self.metrics.record_error(cache_key, &e.to_string());
                warn!("Failed to populate cache key {}: {}", cache_key, e);
            }
        }
    }

    /// Best-effort deletion of `keys` in one backend call.
    ///
    /// Returns `true` when the backend confirmed the delete.
    pub async fn invalidate(&self, keys: &[&str]) -> bool {
        let timer = Instant::now();

        match self.backend.mdelete(keys).await {
            Ok(()) => {
                for key in keys {
                    self.metrics.record_delete(key, timer.elapsed());
                }
                debug!("✓ Cache invalidated {:?}", keys);
                true
            }
            Err(e) => {
                for key in keys {
                    self.metrics.record_error(key, &e.to_string());
                }
                warn!("Failed to invalidate cache keys {:?}: {}", keys, e);
                false
            }
        }
    }

    /// Get backend reference (for health checks and tests).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
