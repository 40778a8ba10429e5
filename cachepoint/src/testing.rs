use crate::ports::CacheBackend;
use async_trait::async_trait;
use bytes::Bytes;
use shared::{Error, Result, TtlMs};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::Barrier;

/// In-process stand-in for an external cache service
#[derive(Default)]
pub(crate) struct FakeBackend {
    entries: Mutex<HashMap<String, (Bytes, Instant)>>,
    fail_get: bool,
    fail_set: bool,
    get_barrier: Option<Arc<Barrier>>,
    closed: AtomicBool,
    pub sets: AtomicUsize,
    pub closes: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_get() -> Self {
        Self {
            fail_get: true,
            ..Self::default()
        }
    }

    pub fn failing_set() -> Self {
        Self {
            fail_set: true,
            ..Self::default()
        }
    }

    /// Every `get` parks on the barrier before reading
    pub fn gated(barrier: Arc<Barrier>) -> Self {
        Self {
            get_barrier: Some(barrier),
            ..Self::default()
        }
    }

    pub fn insert(&self, key: &str, value: &str, ttl: TtlMs) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            (Bytes::from(value.to_string()), Instant::now() + ttl.as_duration()),
        );
    }

    fn check_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::CacheUnavailable("connection closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        if let Some(barrier) = &self.get_barrier {
            barrier.wait().await;
        }
        self.check_open()?;
        if self.fail_get {
            return Err(Error::CacheUnavailable("connection refused".to_string()));
        }

        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: TtlMs) -> Result<()> {
        self.check_open()?;
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_set {
            return Err(Error::CacheUnavailable("connection reset".to_string()));
        }

        self.entries.lock().unwrap().insert(
            key.to_string(),
            (value, Instant::now() + ttl.as_duration()),
        );
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
