//! In-process notification sink.

use super::{Notification, NotificationSink};
use crate::error::Result;
use crate::serialization::deserialize_from_cache;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Messages retained by [`InMemorySink::new`].
pub const DEFAULT_CAPACITY: usize = 1024;

/// A message as it was handed to the sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Keeps the most recent published messages in a bounded ring.
///
/// Used when no broker is configured (messages are also logged at `info`) and
/// by tests to assert on what was published. Once `capacity` is reached the
/// oldest message is dropped for each new one. Clones share the same log.
#[derive(Clone)]
pub struct InMemorySink {
    messages: Arc<Mutex<VecDeque<PublishedMessage>>>,
    capacity: usize,
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain at most `capacity` messages (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        InMemorySink {
            messages: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(64)))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A poisoned lock only means a reader panicked; the log is still valid.
    fn log(&self) -> MutexGuard<'_, VecDeque<PublishedMessage>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the retained messages, oldest first.
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.log().iter().cloned().collect()
    }

    /// Decoded notifications published on `topic`, oldest first.
    /// Payloads that are not notifications are skipped.
    pub fn notifications(&self, topic: &str) -> Vec<Notification> {
        self.log()
            .iter()
            .filter(|m| m.topic == topic)
            .filter_map(|m| deserialize_from_cache(&m.payload).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }
}

impl NotificationSink for InMemorySink {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        info!(
            "✓ Notification on '{}': {}",
            topic,
            String::from_utf8_lossy(&payload)
        );
        let mut log = self.log();
        if log.len() >= self.capacity {
            log.pop_front();
        }
        log.push_back(PublishedMessage {
            topic: topic.to_string(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Book;
    use crate::notify::Method;

    #[tokio::test]
    async fn test_inmemory_sink_records_in_order() {
        let sink = InMemorySink::new();
        let book = Book {
            id: "1".to_string(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            year: 1965,
        };

        for method in [Method::Post, Method::Delete] {
            let payload = Notification::new(method, book.clone()).to_payload().unwrap();
            sink.publish("books", payload).await.unwrap();
        }
        sink.publish("other", b"raw".to_vec()).await.unwrap();

        assert_eq!(sink.len(), 3);
        let methods: Vec<Method> = sink
            .notifications("books")
            .into_iter()
            .map(|n| n.method)
            .collect();
        assert_eq!(methods, [Method::Post, Method::Delete]);
        assert!(sink.notifications("other").is_empty());
    }

    #[tokio::test]
    async fn test_inmemory_sink_drops_oldest_beyond_capacity() {
        let sink = InMemorySink::with_capacity(3);

        for i in 0..10u8 {
            sink.publish("books", vec![i]).await.unwrap();
        }

        assert_eq!(sink.len(), 3);
        let payloads: Vec<Vec<u8>> = sink.messages().into_iter().map(|m| m.payload).collect();
        assert_eq!(payloads, [vec![7], vec![8], vec![9]]);
    }

    #[test]
    fn test_inmemory_sink_default_capacity() {
        assert_eq!(InMemorySink::new().capacity(), DEFAULT_CAPACITY);
        assert_eq!(InMemorySink::with_capacity(0).capacity(), 1);
    }
}
