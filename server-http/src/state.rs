use cachepoint::{CacheRegistry, ReadThroughPolicy, ReadThroughService};
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: CacheRegistry,
    pub read_through: Arc<ReadThroughService>,
}

impl AppState {
    /// `cache_id` is the id the startup hook installed the handle under
    pub fn new(registry: CacheRegistry, cache_id: impl Into<String>) -> Self {
        Self::with_policy(registry, cache_id, ReadThroughPolicy::default())
    }

    pub fn with_policy(
        registry: CacheRegistry,
        cache_id: impl Into<String>,
        policy: ReadThroughPolicy,
    ) -> Self {
        let read_through = Arc::new(ReadThroughService::new(
            registry.clone(),
            cache_id,
            policy,
        ));

        Self {
            registry,
            read_through,
        }
    }
}
