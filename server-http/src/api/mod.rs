pub mod responses;

pub use responses::{CachedResponse, ErrorResponse, HealthResponse};
