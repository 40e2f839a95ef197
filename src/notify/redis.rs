//! Redis pub/sub notification sink.

use super::NotificationSink;
use crate::error::{Error, Result};
use deadpool_redis::{redis::AsyncCommands, Pool};

/// Publishes notifications with `PUBLISH <topic> <payload>`.
///
/// Shares the connection pool of a [`RedisBackend`](crate::backend::RedisBackend).
#[derive(Clone)]
pub struct RedisSink {
    pool: Pool,
}

impl RedisSink {
    pub fn new(pool: Pool) -> Self {
        RedisSink { pool }
    }
}

impl NotificationSink for RedisSink {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        let mut conn = self.pool.get().await.map_err(|e| {
            Error::NotificationError(format!("Failed to get Redis connection: {}", e))
        })?;

        let receivers: i64 = conn.publish(topic, payload).await.map_err(|e| {
            Error::NotificationError(format!("Redis PUBLISH to {} failed: {}", topic, e))
        })?;

        debug!("✓ Redis PUBLISH {} ({} receivers)", topic, receivers);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.pool.get().await.is_ok())
    }
}
