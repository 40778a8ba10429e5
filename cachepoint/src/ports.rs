#![deny(clippy::all)]

use async_trait::async_trait;
use bytes::Bytes;
use shared::{Result, TtlMs};
use std::sync::Arc;

// Ports are the pluggable extension points for external cache services

/// Port for building a cache handle from a connection target
/// This allows different cache services to be plugged in at startup
pub trait BackendFactory: Send + Sync + 'static {
    /// Create a handle for `url` together with the registry id it belongs under
    fn connect(&self, url: &str) -> Result<(String, Arc<dyn CacheBackend>)>;
}

/// Port for a session with an external key-value service that expires entries
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Short label for logs and health output
    fn name(&self) -> &str;

    /// Returns `None` when the key was never written or its ttl elapsed
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    async fn set(&self, key: &str, value: Bytes, ttl: TtlMs) -> Result<()>;

    /// Release the underlying connection. Repeated calls are no-ops.
    async fn close(&self) -> Result<()>;
}
