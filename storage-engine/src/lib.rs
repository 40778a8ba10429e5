use cachepoint::ports::{BackendFactory, CacheBackend};
use shared::{Error, Result};
use std::sync::Arc;

pub mod moka_cache;
pub mod redis_cache;

pub use moka_cache::MokaBackend;
pub use redis_cache::RedisBackend;

/// Picks the backend from the connection target's scheme:
/// `redis://` / `rediss://` for Redis, `memory://` for the in-process Moka cache.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnifiedBackendFactory;

impl BackendFactory for UnifiedBackendFactory {
    fn connect(&self, url: &str) -> Result<(String, Arc<dyn CacheBackend>)> {
        let scheme = url.split_once("://").map(|(scheme, _)| scheme);

        match scheme {
            Some("redis") | Some("rediss") => {
                let backend: Arc<dyn CacheBackend> = Arc::new(RedisBackend::new(url)?);
                Ok((RedisBackend::CACHE_ID.to_string(), backend))
            }
            Some("memory") => {
                let backend: Arc<dyn CacheBackend> =
                    Arc::new(MokaBackend::new(MokaBackend::CACHE_ID, None));
                Ok((MokaBackend::CACHE_ID.to_string(), backend))
            }
            _ => Err(Error::Config(format!(
                "unsupported cache url '{}': expected redis://, rediss:// or memory://",
                url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_redis_url() {
        let (id, backend) = UnifiedBackendFactory.connect("redis://redis").unwrap();
        assert_eq!(id, "REDIS_CACHE");
        assert_eq!(backend.name(), "redis");
    }

    #[test]
    fn test_factory_memory_url() {
        let (id, backend) = UnifiedBackendFactory.connect("memory://").unwrap();
        assert_eq!(id, "IN_MEMORY");
        assert_eq!(backend.name(), "memory");
    }

    #[test]
    fn test_factory_rejects_unknown_scheme() {
        for url in ["memcached://cache:11211", "redis", ""] {
            let result = UnifiedBackendFactory.connect(url);
            assert!(matches!(result, Err(Error::Config(_))), "url: {url}");
        }
    }
}
