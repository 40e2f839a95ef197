//! API-level tests for the books endpoints.
//!
//! Every test runs the real actix-web routing against in-memory collaborators,
//! so no external service is required.

mod common;

use actix_web::{http::header, http::StatusCode, test, web, App};
use book_cache::backend::InMemoryBackend;
use book_cache::http::{configure, ErrorBody};
use book_cache::notify::{InMemorySink, Method};
use book_cache::repository::InMemoryRepository;
use book_cache::{Book, BookService, CacheExpander, DeleteAck};
use common::{dune, FailingRepository, STORE_FAILURE};
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// Test Setup
// ============================================================================

type InMemoryService = BookService<InMemoryRepository, InMemoryBackend, InMemorySink>;

fn in_memory_service(books: Vec<Book>) -> (InMemoryService, InMemorySink) {
    let sink = InMemorySink::new();
    let service = BookService::new(
        Arc::new(InMemoryRepository::with_books(books)),
        CacheExpander::new(InMemoryBackend::new()),
        Arc::new(sink.clone()),
    );
    (service, sink)
}

macro_rules! init_app {
    ($service:expr, $r:ty, $b:ty, $n:ty) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service))
                .configure(configure::<$r, $b, $n>),
        )
        .await
    };
    ($service:expr) => {
        init_app!($service, InMemoryRepository, InMemoryBackend, InMemorySink)
    };
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[actix_web::test]
async fn test_health_check() {
    let (service, _) = in_memory_service(vec![]);
    let app = init_app!(service);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"], true);
}

// ============================================================================
// Read Endpoints
// ============================================================================

#[actix_web::test]
async fn test_list_books_empty() {
    let (service, _) = in_memory_service(vec![]);
    let app = init_app!(service);

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;

    assert!(books.is_empty());
}

#[actix_web::test]
async fn test_get_book_by_query_id() {
    let (service, _) = in_memory_service(vec![dune()]);
    let app = init_app!(service);

    let req = test::TestRequest::get()
        .uri("/books?id=dune-1")
        .to_request();
    let book: Book = test::call_and_read_body_json(&app, req).await;

    assert_eq!(book, dune());
}

#[actix_web::test]
async fn test_empty_query_id_lists() {
    let (service, _) = in_memory_service(vec![dune()]);
    let app = init_app!(service);

    for uri in ["/books?id=", "/books?id=%20", "/books?id=%20%20"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);

        let books: Vec<Book> = test::read_body_json(resp).await;
        assert_eq!(books, vec![dune()], "{}", uri);
    }
}

#[actix_web::test]
async fn test_get_missing_book_is_404() {
    let (service, _) = in_memory_service(vec![]);
    let app = init_app!(service);

    let req = test::TestRequest::get()
        .uri("/books?id=missing")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.detail, "Book not found");
}

// ============================================================================
// Write Endpoints
// ============================================================================

#[actix_web::test]
async fn test_create_book_returns_201() {
    let (service, sink) = in_memory_service(vec![]);
    let app = init_app!(service);

    let req = test::TestRequest::post()
        .uri("/books")
        .set_json(json!({"title": "Dune", "author": "Herbert", "year": 1965}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let book: Book = test::read_body_json(resp).await;
    assert!(!book.id.is_empty());
    assert_eq!(book.title, "Dune");

    let published = sink.notifications("books");
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].method, Method::Post);
    assert_eq!(published[0].message, book);
}

#[actix_web::test]
async fn test_create_missing_field_is_400() {
    let (service, sink) = in_memory_service(vec![]);
    let app = init_app!(service);

    let req = test::TestRequest::post()
        .uri("/books")
        .set_json(json!({"title": "Dune", "year": 1965}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.detail, "author is required");
    assert!(sink.is_empty());
}

#[actix_web::test]
async fn test_malformed_json_is_400_without_parser_text() {
    let (service, _) = in_memory_service(vec![]);
    let app = init_app!(service);

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(r#"{"title": "Dune", "year": "nineteen"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.detail, "Invalid input");
}

#[actix_web::test]
async fn test_update_book_partial() {
    let (service, sink) = in_memory_service(vec![dune()]);
    let app = init_app!(service);

    let req = test::TestRequest::put()
        .uri("/books/dune-1")
        .set_json(json!({"year": 1966}))
        .to_request();
    let book: Book = test::call_and_read_body_json(&app, req).await;

    assert_eq!(book.year, 1966);
    assert_eq!(book.title, "Dune");
    assert_eq!(sink.notifications("books")[0].message, book);
}

#[actix_web::test]
async fn test_update_missing_book_is_404() {
    let (service, sink) = in_memory_service(vec![]);
    let app = init_app!(service);

    let req = test::TestRequest::put()
        .uri("/books/missing")
        .set_json(json!({"title": "T2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(sink.is_empty());
}

#[actix_web::test]
async fn test_delete_book_returns_ack() {
    let (service, _) = in_memory_service(vec![dune()]);
    let app = init_app!(service);

    let req = test::TestRequest::delete().uri("/books/dune-1").to_request();
    let ack: DeleteAck = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ack.message, "Book deleted successfully");

    let req = test::TestRequest::delete().uri("/books/dune-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Store Failures
// ============================================================================

#[actix_web::test]
async fn test_store_failures_are_500_without_cause() {
    let service = BookService::new(
        Arc::new(FailingRepository::down()),
        CacheExpander::new(InMemoryBackend::new()),
        Arc::new(InMemorySink::new()),
    );
    let app = init_app!(service, FailingRepository, InMemoryBackend, InMemorySink);

    let requests = [
        test::TestRequest::get().uri("/books"),
        test::TestRequest::get().uri("/books?id=dune-1"),
        test::TestRequest::post()
            .uri("/books")
            .set_json(json!({"title": "Dune", "author": "Herbert", "year": 1965})),
        test::TestRequest::put()
            .uri("/books/dune-1")
            .set_json(json!({"title": "T2"})),
        test::TestRequest::delete().uri("/books/dune-1"),
    ];

    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(resp).await;
        let text = String::from_utf8_lossy(&body);
        assert!(!text.contains(STORE_FAILURE), "leaked: {}", text);
    }
}

// ============================================================================
// Scenario
// ============================================================================

#[actix_web::test]
async fn test_dune_lifecycle_over_http() {
    let (service, sink) = in_memory_service(vec![]);
    let app = init_app!(service);

    let req = test::TestRequest::post()
        .uri("/books")
        .set_json(json!({"title": "Dune", "author": "Herbert", "year": 1965}))
        .to_request();
    let created: Book = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/books?id={}", created.id))
        .to_request();
    let fetched: Book = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::put()
        .uri(&format!("/books/{}", created.id))
        .set_json(json!({"year": 1966}))
        .to_request();
    let updated: Book = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.year, 1966);
    assert_eq!(updated.title, "Dune");

    let req = test::TestRequest::delete()
        .uri(&format!("/books/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/books?id={}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let methods: Vec<Method> = sink
        .notifications("books")
        .into_iter()
        .map(|n| n.method)
        .collect();
    assert_eq!(methods, [Method::Post, Method::Put, Method::Delete]);
}
