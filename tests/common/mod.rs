//! Shared test doubles: an instrumented store and collaborators that always fail.

#![allow(dead_code)]

use book_cache::backend::{CacheBackend, InMemoryBackend};
use book_cache::error::{Error, Result};
use book_cache::notify::{InMemorySink, NotificationSink};
use book_cache::repository::{BookRepository, InMemoryRepository};
use book_cache::{Book, BookPatch, BookService, CacheExpander};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Text a failing store reports. Must never reach a client.
pub const STORE_FAILURE: &str = "connection refused: db-internal.example:5432";

/// Counts every store call, delegating to an in-memory store.
#[derive(Clone, Default)]
pub struct CountingRepository {
    pub inner: InMemoryRepository,
    find_all_calls: Arc<AtomicUsize>,
    find_by_id_calls: Arc<AtomicUsize>,
    write_calls: Arc<AtomicUsize>,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }
}

impl BookRepository for CountingRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, book: &Book) -> Result<Book> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(book).await
    }

    async fn update_fields(&self, id: &str, patch: &BookPatch) -> Result<Option<Book>> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update_fields(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }
}

/// Store whose writes always fail. Reads fail too when `fail_reads` is set,
/// otherwise they are served from `inner`.
#[derive(Clone, Default)]
pub struct FailingRepository {
    pub inner: InMemoryRepository,
    pub fail_reads: bool,
}

impl FailingRepository {
    /// Every call fails.
    pub fn down() -> Self {
        FailingRepository {
            inner: InMemoryRepository::new(),
            fail_reads: true,
        }
    }

    /// Reads succeed against `books`, writes fail.
    pub fn read_only(books: impl IntoIterator<Item = Book>) -> Self {
        FailingRepository {
            inner: InMemoryRepository::with_books(books),
            fail_reads: false,
        }
    }

    fn failure() -> Error {
        Error::RepositoryError(STORE_FAILURE.to_string())
    }
}

impl BookRepository for FailingRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        if self.fail_reads {
            return Err(Self::failure());
        }
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>> {
        if self.fail_reads {
            return Err(Self::failure());
        }
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, _book: &Book) -> Result<Book> {
        Err(Self::failure())
    }

    async fn update_fields(&self, _id: &str, _patch: &BookPatch) -> Result<Option<Book>> {
        Err(Self::failure())
    }

    async fn delete(&self, _id: &str) -> Result<bool> {
        Err(Self::failure())
    }
}

/// Cache that is unreachable.
#[derive(Clone, Default)]
pub struct FailingBackend;

impl CacheBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(Error::BackendError("cache unreachable".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> Result<()> {
        Err(Error::BackendError("cache unreachable".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(Error::BackendError("cache unreachable".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }
}

/// Broker that rejects every publish.
#[derive(Clone, Default)]
pub struct FailingSink;

impl NotificationSink for FailingSink {
    async fn publish(&self, topic: &str, _payload: Vec<u8>) -> Result<()> {
        Err(Error::NotificationError(format!("broker rejected {}", topic)))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }
}

/// Handles kept by a test to observe what the service did.
pub struct Harness<R: BookRepository> {
    pub service: BookService<R, InMemoryBackend, InMemorySink>,
    pub repo: R,
    pub backend: InMemoryBackend,
    pub sink: InMemorySink,
}

/// Service over `repo` with an in-memory cache and sink.
pub fn harness<R: BookRepository + Clone>(repo: R) -> Harness<R> {
    let backend = InMemoryBackend::new();
    let sink = InMemorySink::new();
    let service = BookService::new(
        Arc::new(repo.clone()),
        CacheExpander::new(backend.clone()),
        Arc::new(sink.clone()),
    );
    Harness {
        service,
        repo,
        backend,
        sink,
    }
}

pub fn dune() -> Book {
    Book {
        id: "dune-1".to_string(),
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        year: 1965,
    }
}
