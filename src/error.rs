//! Error types for the book service.

use thiserror::Error;

/// Result type for book service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-facing classification of an [`Error`].
///
/// The transport layer maps these onto 400 / 404 / 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or empty required input.
    Validation,
    /// The id has no matching store row.
    NotFound,
    /// Store, cache, notification or configuration failure.
    Internal,
}

/// Error types for the book service.
///
/// Only `ValidationError` and `NotFound` are expected outcomes. Every other
/// variant is an internal failure whose message stays server-side.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Required input missing or empty.
    ///
    /// Raised by `create()` when title, author or year is absent, and by
    /// lookups given an empty id.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No store row for the given id.
    #[error("Book not found: {0}")]
    NotFound(String),

    /// Persistent store failure (connection lost, constraint violation, ...).
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Cache backend failure.
    ///
    /// Never fails a service operation; the service treats it as a miss or no-op.
    #[error("Backend error: {0}")]
    BackendError(String),

    /// Encoding a value for the cache or a notification failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Cached bytes could not be decoded.
    ///
    /// **Recovery:** treated as a cache miss, the entry is overwritten on repopulation.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Publishing a change notification failed.
    #[error("Notification error: {0}")]
    NotificationError(String),

    /// Invalid configuration at startup.
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Classify this error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ValidationError(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }

    /// True for failures that must be logged and hidden from the caller.
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::BackendError(format!("Redis error: {}", e))
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::RepositoryError(e.to_string())
    }
}
