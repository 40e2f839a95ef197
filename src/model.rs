//! Book entity and the request shapes that create or modify it.

use crate::entity::CacheEntity;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A book record. The store row is the source of truth; cached copies are derivative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Book {
    /// Assigned once by the service at creation.
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl CacheEntity for Book {
    type Key = String;

    fn cache_key(&self) -> Self::Key {
        self.id.clone()
    }

    fn cache_prefix() -> &'static str {
        "book"
    }

    fn collection_key() -> &'static str {
        "all_books"
    }
}

/// Input for `create()`. Missing fields deserialize to their zero value and
/// are rejected by [`NewBook::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: i32,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        NewBook {
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Reject empty title, empty author or a zero year.
    ///
    /// # Errors
    /// Returns `Error::ValidationError` naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::ValidationError("title is required".to_string()));
        }
        if self.author.trim().is_empty() {
            return Err(Error::ValidationError("author is required".to_string()));
        }
        if self.year == 0 {
            return Err(Error::ValidationError("year is required".to_string()));
        }
        Ok(())
    }

    /// Build the record to insert under a freshly assigned id.
    pub fn into_book(self, id: String) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
        }
    }
}

/// Partial update for `update()`.
///
/// Merge semantics: an absent, empty or zero-valued field leaves the stored
/// value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl BookPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Drop zero-valued fields so only meaningful changes remain.
    /// Blank strings count as zero, matching `NewBook::validate`.
    pub fn normalized(self) -> Self {
        BookPatch {
            title: self.title.filter(|t| !t.trim().is_empty()),
            author: self.author.filter(|a| !a.trim().is_empty()),
            year: self.year.filter(|y| *y != 0),
        }
    }

    /// True when the normalized patch changes nothing.
    pub fn is_empty(&self) -> bool {
        let normalized = self.clone().normalized();
        normalized.title.is_none() && normalized.author.is_none() && normalized.year.is_none()
    }

    /// Merge this patch into `book` in place.
    pub fn apply_to(&self, book: &mut Book) {
        let patch = self.clone().normalized();
        if let Some(title) = patch.title {
            book.title = title;
        }
        if let Some(author) = patch.author {
            book.author = author;
        }
        if let Some(year) = patch.year {
            book.year = year;
        }
    }
}

/// Acknowledgment returned by `delete()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub message: String,
}

impl Default for DeleteAck {
    fn default() -> Self {
        DeleteAck {
            message: "Book deleted successfully".to_string(),
        }
    }
}
