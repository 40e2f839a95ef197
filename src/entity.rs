//! Core entity trait for records that are cached.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::hash::Hash;

/// Trait for entities whose store rows are mirrored into the cache.
///
/// An entity owns two kinds of cache keys: one per-item key
/// (`"{prefix}:{key}"`) and one collection key holding the full listing.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use book_cache::CacheEntity;
///
/// #[derive(Clone, Serialize, Deserialize)]
/// pub struct Shelf {
///     pub id: String,
/// }
///
/// impl CacheEntity for Shelf {
///     type Key = String;
///
///     fn cache_key(&self) -> Self::Key {
///         self.id.clone()
///     }
///
///     fn cache_prefix() -> &'static str {
///         "shelf"
///     }
///
///     fn collection_key() -> &'static str {
///         "all_shelves"
///     }
/// }
/// ```
pub trait CacheEntity: Send + Sync + Serialize + DeserializeOwned + Clone {
    /// Type of the entity's id.
    type Key: Display + Clone + Send + Sync + Eq + Hash + 'static;

    /// Return the entity's unique id.
    fn cache_key(&self) -> Self::Key;

    /// Namespace for per-item keys, e.g. `"book"` → `"book:{id}"`.
    fn cache_prefix() -> &'static str;

    /// Key holding the full listing of this entity type.
    fn collection_key() -> &'static str;
}
