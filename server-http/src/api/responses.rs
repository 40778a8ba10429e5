use serde::{Deserialize, Serialize};

/// Body of `GET /`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub caches: Vec<String>,
}

// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
