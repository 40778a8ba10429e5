use crate::api::{CachedResponse, ErrorResponse};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info};

/// GET /
pub async fn read_or_populate(
    State(state): State<AppState>,
) -> Result<Json<CachedResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.read_through.read_or_populate().await {
        Ok(result) => {
            info!(
                "READ: cache={}, key={}, found={}",
                state.read_through.cache_id(),
                state.read_through.policy().key,
                result.found
            );
            Ok(Json(CachedResponse {
                response: result.value,
            }))
        }
        Err(e) => {
            error!("Read-through failed: {}", e);
            let message = match e {
                shared::Error::NotInitialized(_) => "Cache not initialized",
                shared::Error::CacheUnavailable(_) => "Cache unavailable",
                _ => "Internal server error",
            };
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(message)),
            ))
        }
    }
}
