//! Request handlers. Each one delegates to [`BookService`] and maps the result.

use super::error::{ApiError, Result};
use crate::backend::CacheBackend;
use crate::model::{BookPatch, NewBook};
use crate::notify::NotificationSink;
use crate::repository::BookRepository;
use crate::service::BookService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

/// Shared handler state.
pub type BookData<R, B, N> = web::Data<BookService<R, B, N>>;

/// Query string of `GET /books`.
#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    pub id: Option<String>,
}

impl BookQuery {
    /// The requested id, if one was given. A blank `?id=` lists.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

// ============================================================================
// Health Check
// ============================================================================

pub async fn health_check<R, B, N>(data: BookData<R, B, N>) -> Result<HttpResponse>
where
    R: BookRepository + 'static,
    B: CacheBackend + 'static,
    N: NotificationSink + 'static,
{
    let report = data.health().await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "cache": report.cache,
        "notifications": report.notifications,
    })))
}

// ============================================================================
// Book Endpoints
// ============================================================================

/// GET /books and GET /books?id={id}
pub async fn get_books<R, B, N>(
    query: web::Query<BookQuery>,
    data: BookData<R, B, N>,
) -> Result<HttpResponse>
where
    R: BookRepository + 'static,
    B: CacheBackend + 'static,
    N: NotificationSink + 'static,
{
    match query.id() {
        Some(id) => {
            let book = data
                .get_by_id(id)
                .await
                .map_err(|e| ApiError::from_service("get book", e))?;
            Ok(HttpResponse::Ok().json(book))
        }
        None => {
            let books = data
                .list()
                .await
                .map_err(|e| ApiError::from_service("list books", e))?;
            Ok(HttpResponse::Ok().json(books))
        }
    }
}

/// POST /books
pub async fn create_book<R, B, N>(
    req: web::Json<NewBook>,
    data: BookData<R, B, N>,
) -> Result<HttpResponse>
where
    R: BookRepository + 'static,
    B: CacheBackend + 'static,
    N: NotificationSink + 'static,
{
    let created = data
        .create(req.into_inner())
        .await
        .map_err(|e| ApiError::from_service("create book", e))?;
    Ok(HttpResponse::Created().json(created))
}

/// PUT /books/{id}
pub async fn update_book<R, B, N>(
    path: web::Path<String>,
    req: web::Json<BookPatch>,
    data: BookData<R, B, N>,
) -> Result<HttpResponse>
where
    R: BookRepository + 'static,
    B: CacheBackend + 'static,
    N: NotificationSink + 'static,
{
    let id = path.into_inner();
    let updated = data
        .update(&id, req.into_inner())
        .await
        .map_err(|e| ApiError::from_service("update book", e))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /books/{id}
pub async fn delete_book<R, B, N>(
    path: web::Path<String>,
    data: BookData<R, B, N>,
) -> Result<HttpResponse>
where
    R: BookRepository + 'static,
    B: CacheBackend + 'static,
    N: NotificationSink + 'static,
{
    let id = path.into_inner();
    let ack = data
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_service("delete book", e))?;
    Ok(HttpResponse::Ok().json(ack))
}
