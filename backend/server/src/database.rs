//! # Redis
//!
//! Cache-aside store for both feeds.
//!
//! ## Keys
//!
//! - `satcatData`: catalog rows, JSON array, TTL 24 hours
//! - `celestrakData`: positioned tracks, JSON array, TTL 2 hours
//! - `<key>:last-good`: copy of the last successful write, no TTL
//!
//! Both writes go through one `MULTI` so the live key and its last-good
//! copy never disagree.
//!
//! ## Connection
//!
//! One `ConnectionManager` per process, cloned per command. A dropped
//! connection surfaces as [`StoreError::Disconnected`] and the refresh
//! policy calls [`CacheStore::reconnect`], which swaps in a fresh manager.
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tokio::sync::RwLock;
use tracing::info;

use crate::store::{CacheStore, KeyTtl, StoreError, last_good_key};

impl From<RedisError> for StoreError {
    fn from(e: RedisError) -> Self {
        if e.is_connection_dropped() || e.is_connection_refusal() || e.is_io_error() || e.is_timeout() {
            StoreError::Disconnected(e.to_string())
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

pub struct RedisStore {
    client: Client,
    connection: RwLock<ConnectionManager>,
}

pub async fn init_redis(redis_url: &str) -> Result<RedisStore, StoreError> {
    let client = Client::open(redis_url)?;
    let connection = client
        .get_connection_manager_with_config(manager_config())
        .await?;

    info!("Connected to Redis");

    Ok(RedisStore {
        client,
        connection: RwLock::new(connection),
    })
}

fn manager_config() -> ConnectionManagerConfig {
    ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500))
}

impl RedisStore {
    async fn connection(&self) -> ConnectionManager {
        self.connection.read().await.clone()
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection().await;

        Ok(connection.get::<_, Option<String>>(key).await?)
    }

    async fn get_stale(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection().await;

        if let Some(value) = connection.get::<_, Option<String>>(key).await? {
            return Ok(Some(value));
        }

        Ok(connection
            .get::<_, Option<String>>(last_good_key(key))
            .await?)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut connection = self.connection().await;

        redis::pipe()
            .atomic()
            .set_ex(key, value, ttl.as_secs().max(1))
            .ignore()
            .set(last_good_key(key), value)
            .ignore()
            .query_async::<()>(&mut connection)
            .await?;

        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl, StoreError> {
        let mut connection = self.connection().await;
        let seconds = connection.ttl::<_, i64>(key).await?;

        Ok(KeyTtl::from_seconds(seconds))
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection().await;
        let removed = connection.del::<_, usize>(key).await?;

        Ok(removed > 0)
    }

    async fn reconnect(&self) -> Result<(), StoreError> {
        let fresh = self
            .client
            .get_connection_manager_with_config(manager_config())
            .await?;

        *self.connection.write().await = fresh;
        info!("Reconnected to Redis");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use redis::ErrorKind;

    use super::*;

    #[test]
    fn test_error_classification() {
        let reset = RedisError::from(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert!(matches!(StoreError::from(reset), StoreError::Disconnected(_)));

        let wrong_type = RedisError::from((ErrorKind::TypeError, "not a string"));
        assert!(matches!(StoreError::from(wrong_type), StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        match init_redis("redis://127.0.0.1:1").await {
            Err(StoreError::Disconnected(_)) => {}
            Err(e) => panic!("expected a disconnect, got {e}"),
            Ok(_) => panic!("nothing listens on port 1"),
        }
    }

    #[test]
    fn test_bad_url() {
        assert!(matches!(
            Client::open("not a url").map_err(StoreError::from),
            Err(StoreError::Backend(_))
        ));
    }

    /// Needs a running Redis, `REDIS_URL` or localhost.
    #[tokio::test]
    #[ignore]
    async fn test_live_last_good_outlives_expiry() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let store = init_redis(&url).await.unwrap();
        let key = "server-test:last-good";

        store.set_ex(key, "[1]", Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.get(key).await.unwrap().as_deref(), Some("[1]"));
        assert!(matches!(store.ttl(key).await.unwrap(), KeyTtl::Expires(_)));

        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(store.get(key).await.unwrap(), None);
        assert_eq!(store.ttl(key).await.unwrap(), KeyTtl::Missing);
        assert_eq!(store.get_stale(key).await.unwrap().as_deref(), Some("[1]"));

        store.reconnect().await.unwrap();
        assert!(!store.del(key).await.unwrap());
        assert_eq!(store.get_stale(key).await.unwrap().as_deref(), Some("[1]"));

        store
            .connection()
            .await
            .del::<_, ()>(last_good_key(key))
            .await
            .unwrap();
    }
}
