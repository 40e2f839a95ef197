//! PostgreSQL book store (SQLx).

use super::BookRepository;
use crate::error::{Error, Result};
use crate::model::{Book, BookPatch};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Pure repository layer - SQLx + PostgreSQL, no cache logic.
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and apply the bundled migrations.
    ///
    /// # Errors
    /// Returns `Error::RepositoryError` if the database is unreachable or a
    /// migration fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::RepositoryError(format!("Migration failed: {}", e)))?;

        info!(
            "✓ PostgreSQL repository initialized (max connections: {})",
            max_connections
        );
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl BookRepository for PgBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, year FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, year FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn insert(&self, book: &Book) -> Result<Book> {
        let stored = sqlx::query_as::<_, Book>(
            "INSERT INTO books (id, title, author, year) VALUES ($1, $2, $3, $4) \
             RETURNING id, title, author, year",
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn update_fields(&self, id: &str, patch: &BookPatch) -> Result<Option<Book>> {
        let patch = patch.clone().normalized();
        let updated = sqlx::query_as::<_, Book>(
            "UPDATE books SET \
                 title = COALESCE($2, title), \
                 author = COALESCE($3, author), \
                 year = COALESCE($4, year) \
             WHERE id = $1 \
             RETURNING id, title, author, year",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.author)
        .bind(patch.year)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
