use shared::TtlMs;

/// The fixed key/value pair served by the read-through endpoint.
#[derive(Clone, Debug)]
pub struct ReadThroughPolicy {
    pub key: String,
    pub populate_value: String, // written on a miss
    pub default_value: String,  // returned on a miss
    pub ttl: TtlMs,
}

impl ReadThroughPolicy {
    pub const DEFAULT_KEY: &str = "some_cached_key";
    pub const DEFAULT_POPULATE_VALUE: &str = "new_value";
    pub const DEFAULT_VALUE: &str = "default";
    pub const DEFAULT_TTL_SECS: u64 = 5;

    pub fn new(
        key: impl Into<String>,
        populate_value: impl Into<String>,
        default_value: impl Into<String>,
        ttl: TtlMs,
    ) -> Self {
        Self {
            key: key.into(),
            populate_value: populate_value.into(),
            default_value: default_value.into(),
            ttl,
        }
    }

    pub fn with_ttl(mut self, ttl: TtlMs) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for ReadThroughPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_KEY,
            Self::DEFAULT_POPULATE_VALUE,
            Self::DEFAULT_VALUE,
            TtlMs::from_secs(Self::DEFAULT_TTL_SECS),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadResponse {
    pub found: bool,
    pub value: String,
}

impl ReadResponse {
    pub fn new(found: bool, value: impl Into<String>) -> Self {
        Self {
            found,
            value: value.into(),
        }
    }
}
