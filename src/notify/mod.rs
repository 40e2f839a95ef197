//! Change notifications.
//!
//! Every successful write publishes one [`Notification`] to a topic. The wire
//! payload is JSON:
//!
//! ```text
//! {"Method":"PUT","Message":{"id":"...","title":"...","author":"...","year":1966}}
//! ```
//!
//! Publication is fire-and-forget: the service logs a failed publish and
//! carries on.

use crate::error::Result;
use crate::model::Book;
use crate::serialization::serialize_for_cache;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemorySink;
#[cfg(feature = "redis")]
pub use redis::RedisSink;

/// Default topic for book change events.
pub const DEFAULT_TOPIC: &str = "books";

/// Kind of write that produced a notification, named after the HTTP verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A change event: the write kind plus the affected record.
///
/// `PUT` carries the post-update record, `DELETE` the record as it was before
/// removal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    pub method: Method,
    pub message: Book,
}

impl Notification {
    pub fn new(method: Method, message: Book) -> Self {
        Notification { method, message }
    }

    /// JSON payload bytes.
    ///
    /// # Errors
    /// Returns `Error::SerializationError` if encoding fails.
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        serialize_for_cache(self)
    }
}

/// Append-only publish channel.
///
/// Implementations must be safe for concurrent use; delivery acknowledgment is
/// not required.
#[allow(async_fn_in_trait)]
pub trait NotificationSink: Send + Sync {
    /// Publish `payload` on `topic`.
    ///
    /// # Errors
    /// Returns `Error::NotificationError` if the broker rejected or could not
    /// be reached.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;

    /// Verify the sink is reachable.
    ///
    /// # Errors
    /// Returns `Err` if the broker cannot be reached
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
