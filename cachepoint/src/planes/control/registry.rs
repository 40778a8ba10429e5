use crate::ports::CacheBackend;
use shared::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::RwLock;

/// CacheRegistry holds the live cache handles, keyed by a fixed identifier.
/// Handles are installed once at startup and read by every request.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    // Maps cache id -> handle to the external service
    caches: Arc<RwLock<HashMap<String, Arc<dyn CacheBackend>>>>,
}

impl Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("caches", &"<RwLock<HashMap>>")
            .finish()
    }
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handle` under `id`, replacing any previous handle for that id
    pub async fn set(&self, id: impl Into<String>, handle: Arc<dyn CacheBackend>) {
        let id = id.into();
        let mut caches = self.caches.write().await;
        if caches.insert(id.clone(), handle).is_some() {
            tracing::debug!("Replaced cache handle '{}'", id);
        } else {
            tracing::debug!("Registered cache handle '{}'", id);
        }
    }

    pub async fn get(&self, id: &str) -> Result<Arc<dyn CacheBackend>> {
        let caches = self.caches.read().await;
        caches
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotInitialized(id.to_string()))
    }

    pub async fn ids(&self) -> Vec<String> {
        let caches = self.caches.read().await;
        let mut ids: Vec<String> = caches.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Close every registered handle and empty the registry.
    /// A handle that fails to close is logged and skipped.
    pub async fn close_all(&self) {
        let drained: Vec<(String, Arc<dyn CacheBackend>)> = {
            let mut caches = self.caches.write().await;
            caches.drain().collect()
        };

        for (id, handle) in drained {
            match handle.close().await {
                Ok(()) => tracing::info!("Closed cache '{}' ({})", id, handle.name()),
                Err(e) => tracing::warn!("Failed to close cache '{}': {}", id, e),
            }
        }
    }
}
