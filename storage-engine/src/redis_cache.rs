//! Redis cache backend.

use async_trait::async_trait;
use bytes::Bytes;
use cachepoint::ports::CacheBackend;
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use shared::{Error, Result, TtlMs};
use std::fmt::Debug;
use std::sync::Mutex;
use std::time::Duration;

enum ConnectionState {
    Idle,
    Connected(ConnectionManager),
    Closed,
}

/// Redis-backed cache handle.
///
/// The connection is opened on first use, so an unreachable server fails the
/// request that needed it rather than process startup. Connecting is bounded
/// by `CONNECT_TIMEOUT` and never holds the state lock.
pub struct RedisBackend {
    client: redis::Client,
    state: Mutex<ConnectionState>,
}

fn unavailable(err: redis::RedisError) -> Error {
    Error::CacheUnavailable(err.to_string())
}

impl RedisBackend {
    pub const CACHE_ID: &str = "REDIS_CACHE";

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
    const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);
    const CONNECT_RETRIES: usize = 1;
    const MAX_RETRY_DELAY_MS: u64 = 500;

    /// Validate the URL and prepare a client. Does not connect.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| Error::Config(format!("invalid redis url '{}': {}", url, e)))?;

        Ok(Self {
            client,
            state: Mutex::new(ConnectionState::Idle),
        })
    }

    fn manager_config() -> ConnectionManagerConfig {
        ConnectionManagerConfig::new()
            .set_number_of_retries(Self::CONNECT_RETRIES)
            .set_max_delay(Self::MAX_RETRY_DELAY_MS)
            .set_connection_timeout(Self::CONNECT_TIMEOUT)
            .set_response_timeout(Self::RESPONSE_TIMEOUT)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ConnectionState> {
        // The state is only swapped under the lock, a poisoned guard is still consistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current(&self) -> Result<Option<ConnectionManager>> {
        match &*self.lock_state() {
            ConnectionState::Connected(conn) => Ok(Some(conn.clone())),
            ConnectionState::Closed => {
                Err(Error::CacheUnavailable("connection closed".to_string()))
            }
            ConnectionState::Idle => Ok(None),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        if let Some(conn) = self.current()? {
            return Ok(conn);
        }

        // Concurrent first callers may each connect; the first one stored wins
        let addr = &self.client.get_connection_info().addr;
        let conn = ConnectionManager::new_with_config(self.client.clone(), Self::manager_config())
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to Redis at {}: {}", addr, e);
                unavailable(e)
            })?;

        let mut state = self.lock_state();
        match &*state {
            ConnectionState::Connected(existing) => Ok(existing.clone()),
            ConnectionState::Closed => {
                Err(Error::CacheUnavailable("connection closed".to_string()))
            }
            ConnectionState::Idle => {
                tracing::info!("Connected to Redis at {}", addr);
                *state = ConnectionState::Connected(conn.clone());
                Ok(conn)
            }
        }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let mut conn = self.connection().await?;

        let value: Option<Vec<u8>> = conn.get(key).await.map_err(unavailable)?;

        tracing::debug!(key = key, hit = value.is_some(), "Redis get");
        Ok(value.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: TtlMs) -> Result<()> {
        let mut conn = self.connection().await?;

        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value.as_ref())
            .arg("PX")
            .arg(ttl.0)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        tracing::debug!(key = key, ttl_ms = ttl.0, "Redis set");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        // Dropping the manager closes the multiplexed connection
        let previous = std::mem::replace(&mut *self.lock_state(), ConnectionState::Closed);
        if let ConnectionState::Connected(_) = previous {
            tracing::debug!("Redis connection released");
        }
        Ok(())
    }
}

impl Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend")
            .field("addr", &self.client.get_connection_info().addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_config_error() {
        let result = RedisBackend::new("not a redis url");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_new_does_not_connect() {
        // Host does not need to resolve until the first command
        let backend = RedisBackend::new("redis://redis").unwrap();
        assert_eq!(backend.name(), "redis");
    }

    #[tokio::test]
    async fn test_closed_backend_rejects_commands() {
        let backend = RedisBackend::new("redis://redis").unwrap();

        backend.close().await.unwrap();
        backend.close().await.unwrap();

        assert!(matches!(
            backend.get("some_cached_key").await,
            Err(Error::CacheUnavailable(_))
        ));
        assert!(matches!(
            backend
                .set("some_cached_key", Bytes::from("new_value"), TtlMs::from_secs(5))
                .await,
            Err(Error::CacheUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        // Nothing listens on port 1
        let backend = RedisBackend::new("redis://127.0.0.1:1").unwrap();

        let result = tokio::time::timeout(Duration::from_secs(10), backend.get("k"))
            .await
            .expect("get against an unreachable server should not hang");

        assert!(matches!(result, Err(Error::CacheUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_concurrent_callers() {
        let backend = RedisBackend::new("redis://127.0.0.1:1").unwrap();

        let results = tokio::time::timeout(Duration::from_secs(10), async {
            tokio::join!(
                backend.get("k"),
                backend.get("k"),
                backend.set("k", Bytes::from("new_value"), TtlMs::from_secs(5)),
            )
        })
        .await
        .expect("concurrent callers should not queue behind a failing connect");

        assert!(matches!(results.0, Err(Error::CacheUnavailable(_))));
        assert!(matches!(results.1, Err(Error::CacheUnavailable(_))));
        assert!(matches!(results.2, Err(Error::CacheUnavailable(_))));

        // Shutdown is not blocked either
        tokio::time::timeout(Duration::from_secs(1), backend.close())
            .await
            .expect("close should not wait on connects")
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a Redis server at REDIS_URL"]
    async fn test_redis_set_get_expire() {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1".to_string());
        let backend = RedisBackend::new(&url).unwrap();

        backend
            .set("cachepoint_test_key", Bytes::from("value"), TtlMs(200))
            .await
            .unwrap();
        assert_eq!(
            backend.get("cachepoint_test_key").await.unwrap(),
            Some(Bytes::from("value"))
        );

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(backend.get("cachepoint_test_key").await.unwrap().is_none());

        backend.close().await.unwrap();
    }
}
