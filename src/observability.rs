//! Cache metrics hooks and TTL policy.
//!
//! Two concerns live here:
//!
//! - **Metrics (`CacheMetrics`)**: hooks fired by the cache layer on hit, miss,
//!   set, delete and error
//! - **TTL Policies (`TtlPolicy`)**: how long populated entries live
//!
//! ```
//! use book_cache::observability::TtlPolicy;
//! use std::time::Duration;
//!
//! // Both book keys expire after ten minutes
//! let policy = TtlPolicy::default();
//! assert_eq!(policy.get_ttl("book"), Some(Duration::from_secs(600)));
//! ```
//!
//! The default metrics handler is `NoOpMetrics`. Plug in a counter-backed
//! implementation with `CacheExpander::with_metrics`.

use std::time::Duration;

/// Expiration applied to both the collection key and the per-item keys.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache set operation.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a cache delete operation.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Cache DELETE: {} took {:?}", key, duration);
    }

    /// Record a swallowed cache failure.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Metrics handler that only logs.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl CacheMetrics for LogMetrics {}

/// TTL (Time-to-Live) policy for cache entries.
#[derive(Clone, Debug)]
pub enum TtlPolicy {
    /// Fixed duration for all entries
    Fixed(Duration),

    /// No TTL (entries live until invalidated)
    Infinite,

    /// Custom per-type policy, keyed by entity prefix
    PerType(fn(&str) -> Duration),
}

impl Default for TtlPolicy {
    fn default() -> Self {
        TtlPolicy::Fixed(DEFAULT_TTL)
    }
}

impl TtlPolicy {
    /// Get TTL for an entity type.
    pub fn get_ttl(&self, entity_type: &str) -> Option<Duration> {
        match self {
            TtlPolicy::Fixed(d) => Some(*d),
            TtlPolicy::Infinite => None,
            TtlPolicy::PerType(f) => Some(f(entity_type)),
        }
    }
}
