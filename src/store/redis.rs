use crate::error::{AppError, Result};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;

/// Redis-backed store. `ConnectionManager` is `Arc`-based internally, so
/// each call clones it instead of holding a lock.
pub struct RedisStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    pub async fn new(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = ::redis::Client::open(redis_url)
            .map_err(|e| AppError::Storage(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to connect to Redis: {}", e)))?;

        tracing::info!("Redis store connection established");

        Ok(RedisStore {
            connection,
            key_prefix: key_prefix.into(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(self.full_key(key)).await?;
        tracing::debug!(key, hit = value.is_some(), "Redis get: {}", key);
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut conn = self.connection.clone();
        let bytes = value.len();
        let _: () = conn.set(self.full_key(key), value).await?;
        tracing::debug!(key, bytes, "Redis set: {} ({} bytes)", key, bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(self.full_key(key)).await?;
        tracing::debug!(key, "Redis delete: {}", key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.connection.clone();
        let result: ::redis::RedisResult<String> =
            ::redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
