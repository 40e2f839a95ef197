//! In-memory book store.

use super::BookRepository;
use crate::error::{Error, Result};
use crate::model::{Book, BookPatch};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// DashMap-backed store.
///
/// Used when no `DATABASE_URL` is configured, and as the base for test
/// doubles. Clones share the same rows.
///
/// # Example Usage
///
/// ```ignore
/// let repo = InMemoryRepository::new();
/// repo.insert(&book).await?;
/// assert_eq!(repo.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    rows: Arc<DashMap<String, Book>>,
}

impl InMemoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows directly, bypassing the service. Existing ids are overwritten.
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let repo = Self::new();
        for book in books {
            repo.rows.insert(book.id.clone(), book);
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl BookRepository for InMemoryRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        let mut books: Vec<Book> = self.rows.iter().map(|row| row.value().clone()).collect();
        books.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(books)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>> {
        Ok(self.rows.get(id).map(|row| row.value().clone()))
    }

    async fn insert(&self, book: &Book) -> Result<Book> {
        match self.rows.entry(book.id.clone()) {
            Entry::Occupied(_) => Err(Error::RepositoryError(format!(
                "duplicate key value violates unique constraint: id={}",
                book.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(book.clone());
                Ok(book.clone())
            }
        }
    }

    async fn update_fields(&self, id: &str, patch: &BookPatch) -> Result<Option<Book>> {
        Ok(self.rows.get_mut(id).map(|mut row| {
            patch.apply_to(row.value_mut());
            row.value().clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.rows.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "Herbert".to_string(),
            year: 1965,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryRepository::new();
        repo.insert(&book("1", "Dune")).await.expect("Failed to insert");

        let found = repo.find_by_id("1").await.expect("Failed to fetch");
        assert_eq!(found.map(|b| b.title), Some("Dune".to_string()));
        assert!(repo.find_by_id("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let repo = InMemoryRepository::new();
        repo.insert(&book("1", "Dune")).await.unwrap();

        let result = repo.insert(&book("1", "Children of Dune")).await;
        assert!(matches!(result, Err(Error::RepositoryError(_))));
        assert_eq!(repo.find_by_id("1").await.unwrap().unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryRepository::with_books([book("b", "Two"), book("a", "One")]);

        let all = repo.find_all().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_update_fields_merges() {
        let repo = InMemoryRepository::with_books([book("1", "Dune")]);

        let updated = repo
            .update_fields("1", &BookPatch::default().year(1966))
            .await
            .unwrap()
            .expect("row exists");

        assert_eq!(updated.year, 1966);
        assert_eq!(updated.title, "Dune");
        assert!(repo
            .update_fields("missing", &BookPatch::default().year(1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryRepository::with_books([book("1", "Dune")]);

        assert!(repo.delete("1").await.unwrap());
        assert!(!repo.delete("1").await.unwrap());
        assert!(repo.is_empty());
    }
}
