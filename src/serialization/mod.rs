//! JSON encoding for cache values and notification payloads.
//!
//! Cached values are the plain JSON form of a `Book` or `Vec<Book>`, so other
//! consumers of the same Redis keys can read them without a framing header.
//!
//! ```rust
//! use book_cache::serialization::{deserialize_from_cache, serialize_for_cache};
//! use book_cache::Book;
//!
//! # fn main() -> book_cache::Result<()> {
//! let book = Book {
//!     id: "1".to_string(),
//!     title: "Dune".to_string(),
//!     author: "Herbert".to_string(),
//!     year: 1965,
//! };
//! let bytes = serialize_for_cache(&book)?;
//! assert_eq!(bytes[0], b'{');
//!
//! let decoded: Book = deserialize_from_cache(&bytes)?;
//! assert_eq!(decoded, book);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a value for cache storage or publication.
///
/// # Errors
///
/// Returns `Error::SerializationError` if serde_json rejects the value.
pub fn serialize_for_cache<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        log::error!("Cache serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a cached value.
///
/// # Errors
///
/// Returns `Error::DeserializationError` for malformed or mistyped bytes. The
/// caller should treat this as a miss.
pub fn deserialize_from_cache<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        log::warn!("Cache deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })
}
