use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub cache_url: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8000;
    const DEFAULT_CACHE_URL: &str = "redis://redis";

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_port = match lookup("CACHEPOINT_HTTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!(
                    "CACHEPOINT_HTTP_PORT={} is not a valid port, using {}",
                    raw,
                    Self::DEFAULT_HTTP_PORT
                );
                Self::DEFAULT_HTTP_PORT
            }),
            None => Self::DEFAULT_HTTP_PORT,
        };

        Self {
            host: lookup("CACHEPOINT_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port,
            cache_url: lookup("CACHEPOINT_CACHE_URL")
                .unwrap_or_else(|| Self::DEFAULT_CACHE_URL.to_string()),
            allowed_origins: lookup("CACHEPOINT_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}
