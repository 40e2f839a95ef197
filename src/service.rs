//! Book service - reconciles store, cache and notifications around each write.
//!
//! # Consistency contract
//!
//! - The store is authoritative. Cache entries are only ever populated from a
//!   store read and only ever invalidated (deleted) on write, never updated.
//! - Side effects run after the store write, in order: cache invalidation,
//!   then notification. Both are best-effort; a failure is logged and never
//!   fails the operation or rolls back the store write.
//! - A failed store write performs no side effects.
//!
//! Racing writers on the same id each finish with a delete of the same keys,
//! so no stale entry survives the race. A crash between commit and
//! invalidation leaves a stale entry for at most one TTL.

use crate::backend::CacheBackend;
use crate::entity::CacheEntity;
use crate::error::{Error, Result};
use crate::expander::CacheExpander;
use crate::key::CacheKeyBuilder;
use crate::model::{Book, BookPatch, DeleteAck, NewBook};
use crate::notify::{Method, Notification, NotificationSink, DEFAULT_TOPIC};
use crate::repository::BookRepository;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Reachability of the collaborators, as reported by `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub cache: bool,
    pub notifications: bool,
}

/// Single authority for Book reads and writes.
///
/// All collaborators are injected at construction. Cloning is cheap (three
/// `Arc` increments), so one instance is shared by every request worker.
///
/// # Example
///
/// ```ignore
/// use book_cache::{BookService, CacheExpander, NewBook};
/// use book_cache::backend::InMemoryBackend;
/// use book_cache::notify::InMemorySink;
/// use book_cache::repository::InMemoryRepository;
/// use std::sync::Arc;
///
/// let service = BookService::new(
///     Arc::new(InMemoryRepository::new()),
///     CacheExpander::new(InMemoryBackend::new()),
///     Arc::new(InMemorySink::new()),
/// );
/// let book = service.create(NewBook::new("Dune", "Herbert", 1965)).await?;
/// ```
pub struct BookService<R, B, N>
where
    R: BookRepository,
    B: CacheBackend,
    N: NotificationSink,
{
    repo: Arc<R>,
    cache: Arc<CacheExpander<B>>,
    sink: Arc<N>,
    topic: String,
}

impl<R, B, N> Clone for BookService<R, B, N>
where
    R: BookRepository,
    B: CacheBackend,
    N: NotificationSink,
{
    fn clone(&self) -> Self {
        BookService {
            repo: Arc::clone(&self.repo),
            cache: Arc::clone(&self.cache),
            sink: Arc::clone(&self.sink),
            topic: self.topic.clone(),
        }
    }
}

impl<R, B, N> BookService<R, B, N>
where
    R: BookRepository,
    B: CacheBackend,
    N: NotificationSink,
{
    /// Build a service publishing on the default `books` topic.
    pub fn new(repo: Arc<R>, cache: CacheExpander<B>, sink: Arc<N>) -> Self {
        BookService {
            repo,
            cache: Arc::new(cache),
            sink,
            topic: DEFAULT_TOPIC.to_string(),
        }
    }

    /// Publish notifications on `topic` instead of the default.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn cache(&self) -> &CacheExpander<B> {
        &self.cache
    }

    /// Every book, served from the collection key when present.
    ///
    /// # Errors
    /// Returns an internal error if the cache missed and the store failed.
    pub async fn list(&self) -> Result<Vec<Book>> {
        info!("[BookService] Listing books");
        let key = CacheKeyBuilder::collection::<Book>();

        let books = self
            .cache
            .read_through(&key, Book::cache_prefix(), || async {
                self.repo.find_all().await.map(Some)
            })
            .await
            .map_err(|e| self.internal("list", None, e))?;

        Ok(books.unwrap_or_default())
    }

    /// One book, served from its per-item key when present.
    ///
    /// # Errors
    /// - `Error::ValidationError`: empty id
    /// - `Error::NotFound`: no such book
    /// - internal error if the cache missed and the store failed
    pub async fn get_by_id(&self, id: &str) -> Result<Book> {
        info!("[BookService] Getting book: {}", id);
        Self::require_id(id)?;
        let key = CacheKeyBuilder::build::<Book>(id);

        self.cache
            .read_through(&key, Book::cache_prefix(), || async {
                self.repo.find_by_id(id).await
            })
            .await
            .map_err(|e| self.internal("get", Some(id), e))?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Validate, assign an id and insert.
    ///
    /// On success the collection key is invalidated and a `POST` notification
    /// carrying the full record is published.
    ///
    /// # Errors
    /// - `Error::ValidationError`: empty title or author, zero year (no store write)
    /// - internal error if the insert failed (no side effects)
    pub async fn create(&self, input: NewBook) -> Result<Book> {
        if let Err(e) = input.validate() {
            debug!("[BookService] Rejected create: {}", e);
            return Err(e);
        }

        let book = input.into_book(Uuid::now_v7().to_string());
        info!("[BookService] Creating book: {}", book.id);

        let created = self
            .repo
            .insert(&book)
            .await
            .map_err(|e| self.internal("create", Some(&book.id), e))?;

        let collection = CacheKeyBuilder::collection::<Book>();
        self.cache.invalidate(&[collection.as_str()]).await;
        self.notify(Method::Post, &created).await;

        Ok(created)
    }

    /// Merge `patch` into an existing book.
    ///
    /// Fields that are absent, empty or zero are left unchanged. On success
    /// both the collection key and the per-item key are invalidated and a
    /// `PUT` notification carrying the post-update record is published.
    ///
    /// # Errors
    /// - `Error::NotFound`: no such book (no side effects)
    /// - internal error if the lookup or update failed (no side effects)
    pub async fn update(&self, id: &str, patch: BookPatch) -> Result<Book> {
        info!("[BookService] Updating book: {}", id);
        let existing = self.find_existing("update", id).await?;

        let patch = patch.normalized();
        let updated = if patch.is_empty() {
            debug!("[BookService] Empty patch for {}, nothing to persist", id);
            existing
        } else {
            self.repo
                .update_fields(id, &patch)
                .await
                .map_err(|e| self.internal("update", Some(id), e))?
                .ok_or_else(|| Error::NotFound(id.to_string()))?
        };

        self.invalidate_book(id).await;
        self.notify(Method::Put, &updated).await;

        Ok(updated)
    }

    /// Physically delete a book.
    ///
    /// On success both keys are invalidated and a `DELETE` notification
    /// carrying the deleted record is published.
    ///
    /// # Errors
    /// - `Error::NotFound`: no such book (no side effects)
    /// - internal error if the lookup or delete failed (no side effects)
    pub async fn delete(&self, id: &str) -> Result<DeleteAck> {
        info!("[BookService] Deleting book: {}", id);
        let existing = self.find_existing("delete", id).await?;

        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(|e| self.internal("delete", Some(id), e))?;
        if !removed {
            return Err(Error::NotFound(id.to_string()));
        }

        self.invalidate_book(id).await;
        self.notify(Method::Delete, &existing).await;

        Ok(DeleteAck::default())
    }

    /// Probe the cache backend and the notification sink.
    pub async fn health(&self) -> HealthReport {
        let cache = self.cache.backend().health_check().await.unwrap_or(false);
        let notifications = self.sink.health_check().await.unwrap_or(false);
        HealthReport {
            cache,
            notifications,
        }
    }

    // Store lookup that bypasses the cache: writes must see the authoritative row.
    async fn find_existing(&self, operation: &str, id: &str) -> Result<Book> {
        Self::require_id(id)?;
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| self.internal(operation, Some(id), e))?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn invalidate_book(&self, id: &str) {
        let [collection, item] = CacheKeyBuilder::affected_by_write::<Book>(id);
        self.cache
            .invalidate(&[collection.as_str(), item.as_str()])
            .await;
    }

    async fn notify(&self, method: Method, book: &Book) {
        let outcome = match Notification::new(method, book.clone()).to_payload() {
            Ok(payload) => self.sink.publish(&self.topic, payload).await,
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            warn!(
                "[BookService] Failed to publish {} notification for {}: {}",
                method, book.id, e
            );
        }
    }

    fn require_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(Error::ValidationError("id must not be empty".to_string()));
        }
        Ok(())
    }

    fn internal(&self, operation: &str, id: Option<&str>, error: Error) -> Error {
        if error.is_internal() {
            error!(
                "[BookService] {} failed (id: {}): {}",
                operation,
                id.unwrap_or("-"),
                error
            );
        }
        error
    }
}
