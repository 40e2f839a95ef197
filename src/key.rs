//! Cache key derivation.

use crate::entity::CacheEntity;
use std::fmt::Display;

/// Builder for cache keys.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Per-item key: `"{prefix}:{id}"`.
    pub fn build<T: CacheEntity>(id: impl Display) -> String {
        format!("{}:{}", T::cache_prefix(), id)
    }

    /// Collection key for the full listing of `T`.
    pub fn collection<T: CacheEntity>() -> String {
        T::collection_key().to_string()
    }

    /// Every key a write to `id` must invalidate: collection first, then the item.
    pub fn affected_by_write<T: CacheEntity>(id: impl Display) -> [String; 2] {
        [Self::collection::<T>(), Self::build::<T>(id)]
    }
}
