use crate::domain::{ReadResponse, ReadThroughPolicy};
use crate::planes::control::CacheRegistry;
use bytes::Bytes;
use shared::Result;

/// Application service behind the read-through endpoint.
///
/// A hit returns the stored value. A miss writes the populate value with the
/// policy ttl and returns the default value, so callers only see the written
/// value on their next read inside the ttl window.
#[derive(Clone, Debug)]
pub struct ReadThroughService {
    registry: CacheRegistry,
    cache_id: String,
    policy: ReadThroughPolicy,
}

impl ReadThroughService {
    pub fn new(
        registry: CacheRegistry,
        cache_id: impl Into<String>,
        policy: ReadThroughPolicy,
    ) -> Self {
        Self {
            registry,
            cache_id: cache_id.into(),
            policy,
        }
    }

    pub fn cache_id(&self) -> &str {
        &self.cache_id
    }

    pub fn policy(&self) -> &ReadThroughPolicy {
        &self.policy
    }

    pub async fn read_or_populate(&self) -> Result<ReadResponse> {
        let cache = self.registry.get(&self.cache_id).await?;
        let key = self.policy.key.as_str();

        match cache.get(key).await? {
            // An empty value counts as a miss
            Some(value) if !value.is_empty() => {
                tracing::debug!("Cache hit for key '{}' in '{}'", key, self.cache_id);
                Ok(ReadResponse::new(true, String::from_utf8_lossy(&value)))
            }
            _ => {
                tracing::debug!("Cache miss for key '{}' in '{}'", key, self.cache_id);

                // The populate write never fails the request
                let value = Bytes::from(self.policy.populate_value.clone());
                if let Err(e) = cache.set(key, value, self.policy.ttl).await {
                    tracing::warn!(
                        "Failed to populate key '{}' in '{}': {}",
                        key,
                        self.cache_id,
                        e
                    );
                }

                Ok(ReadResponse::new(false, self.policy.default_value.clone()))
            }
        }
    }
}
