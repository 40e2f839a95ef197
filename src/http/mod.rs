//! actix-web transport.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/health` | [`routes::health_check`] |
//! | GET | `/books` (`?id=`) | [`routes::get_books`] |
//! | POST | `/books` | [`routes::create_book`] |
//! | PUT | `/books/{id}` | [`routes::update_book`] |
//! | DELETE | `/books/{id}` | [`routes::delete_book`] |
//!
//! The service itself must be registered by the caller as
//! `web::Data<BookService<R, B, N>>`.

use crate::backend::CacheBackend;
use crate::notify::NotificationSink;
use crate::repository::BookRepository;
use actix_web::web;

pub mod error;
pub mod routes;

pub use error::{ApiError, ErrorBody};

/// Register every route for a service over `R`, `B` and `N`.
pub fn configure<R, B, N>(cfg: &mut web::ServiceConfig)
where
    R: BookRepository + 'static,
    B: CacheBackend + 'static,
    N: NotificationSink + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .route("/health", web::get().to(routes::health_check::<R, B, N>))
        .service(
            web::resource("/books")
                .route(web::get().to(routes::get_books::<R, B, N>))
                .route(web::post().to(routes::create_book::<R, B, N>)),
        )
        .service(
            web::resource("/books/{id}")
                .route(web::put().to(routes::update_book::<R, B, N>))
                .route(web::delete().to(routes::delete_book::<R, B, N>)),
        );
}
