//! Persistent store abstraction for books.
//!
//! The `BookRepository` trait decouples the service from a specific database.
//! Two implementations ship with the crate:
//! - [`InMemoryRepository`]: DashMap-backed, the default runtime store and the
//!   base for test doubles
//! - `PgBookRepository` (feature `postgres`): SQLx + PostgreSQL
//!
//! # Error Handling
//!
//! Implementations return `Error::RepositoryError` for connectivity, query
//! and constraint failures. "Row not found" is never an error: lookups return
//! `None`, `update_fields` returns `None` and `delete` returns `false`.

use crate::error::Result;
use crate::model::{Book, BookPatch};

pub mod inmemory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use inmemory::InMemoryRepository;
#[cfg(feature = "postgres")]
pub use postgres::PgBookRepository;

/// Trait for book store implementations.
///
/// Designed to be mockable: wrap an [`InMemoryRepository`] to count calls or
/// inject failures.
#[allow(async_fn_in_trait)]
pub trait BookRepository: Send + Sync {
    /// Every stored book, ordered by id.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable
    async fn find_all(&self) -> Result<Vec<Book>>;

    /// Fetch one book.
    ///
    /// # Returns
    /// - `Ok(Some(book))` - Book found
    /// - `Ok(None)` - No row for `id` (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable
    async fn find_by_id(&self, id: &str) -> Result<Option<Book>>;

    /// Insert a new row and return it as stored.
    ///
    /// # Errors
    /// Returns `Err` on store failure or duplicate id
    async fn insert(&self, book: &Book) -> Result<Book>;

    /// Merge the non-empty fields of `patch` into the row for `id`.
    ///
    /// Returns the post-update row, or `None` if `id` does not exist.
    ///
    /// # Errors
    /// Returns `Err` on store failure
    async fn update_fields(&self, id: &str, patch: &BookPatch) -> Result<Option<Book>>;

    /// Physically delete the row for `id`. Returns `false` if it did not exist.
    ///
    /// # Errors
    /// Returns `Err` on store failure
    async fn delete(&self, id: &str) -> Result<bool>;
}
