use super::registry::CacheRegistry;
use crate::ports::BackendFactory;
use shared::Result;
use std::sync::Arc;

/// Startup and shutdown hooks for the cache handle.
///
/// `start` must complete before the first request is routed; `stop` runs once
/// the server has drained its in-flight requests.
pub struct CacheLifecycle {
    registry: CacheRegistry,
    factory: Arc<dyn BackendFactory>,
    cache_url: String,
}

impl CacheLifecycle {
    pub fn new(
        registry: CacheRegistry,
        factory: Arc<dyn BackendFactory>,
        cache_url: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            factory,
            cache_url: cache_url.into(),
        }
    }

    pub fn registry(&self) -> &CacheRegistry {
        &self.registry
    }

    /// Build the cache handle and install it. Returns the registry id it was installed under.
    pub async fn start(&self) -> Result<String> {
        let (id, handle) = self.factory.connect(&self.cache_url)?;
        tracing::info!(
            "Installing {} cache '{}' for {}",
            handle.name(),
            id,
            self.cache_url
        );
        self.registry.set(id.clone(), handle).await;
        Ok(id)
    }

    pub async fn stop(&self) {
        tracing::info!("Releasing cache connections...");
        self.registry.close_all().await;
    }
}
