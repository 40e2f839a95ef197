//! # book-cache
//!
//! A books CRUD service that keeps a cache and a change feed consistent with
//! an authoritative store.
//!
//! ## Features
//!
//! - **Read-through caching:** the full list lives under `all_books`, each
//!   record under `book:{id}`, both with a 10 minute TTL
//! - **Invalidate on write:** writes delete the affected keys, they never
//!   rewrite them
//! - **Change notifications:** every successful write publishes
//!   `{"Method": ..., "Message": Book}` on the `books` topic
//! - **Pluggable collaborators:** in-memory by default, Redis (`redis`
//!   feature) and PostgreSQL (`postgres` feature) for production
//!
//! ## Quick Start
//!
//! ```ignore
//! use book_cache::{BookService, CacheExpander, NewBook};
//! use book_cache::backend::InMemoryBackend;
//! use book_cache::notify::InMemorySink;
//! use book_cache::repository::InMemoryRepository;
//! use std::sync::Arc;
//!
//! let service = BookService::new(
//!     Arc::new(InMemoryRepository::new()),
//!     CacheExpander::new(InMemoryBackend::new()),
//!     Arc::new(InMemorySink::new()),
//! );
//!
//! let dune = service.create(NewBook::new("Dune", "Herbert", 1965)).await?;
//! let cached = service.get_by_id(&dune.id).await?;  // miss, then populated
//! let again = service.get_by_id(&dune.id).await?;   // hit
//! ```
//!
//! ## Serving over HTTP
//!
//! ```ignore
//! use actix_web::{web, App, HttpServer};
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .app_data(web::Data::new(service.clone()))
//!         .configure(book_cache::http::configure::<R, B, N>)
//! })
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod config;
pub mod entity;
pub mod error;
pub mod expander;
pub mod http;
pub mod key;
pub mod model;
pub mod notify;
pub mod observability;
pub mod repository;
pub mod serialization;
pub mod service;

// Re-exports for convenience
pub use backend::CacheBackend;
pub use config::AppConfig;
pub use entity::CacheEntity;
pub use error::{Error, ErrorKind, Result};
pub use expander::CacheExpander;
pub use model::{Book, BookPatch, DeleteAck, NewBook};
pub use notify::{Method, Notification, NotificationSink};
pub use repository::BookRepository;
pub use service::{BookService, HealthReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
