use cachepoint::{CacheLifecycle, CacheRegistry};
use server_http::{build_router, AppState};
use shared::config::Config;
use std::sync::Arc;
use storage_engine::UnifiedBackendFactory;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before the subscriber so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting cachepoint HTTP server...");

    match dotenv {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    // Load configuration from environment variables
    let config = Config::from_env();

    // Startup hook: install the cache handle before any request is accepted
    let registry = CacheRegistry::new();
    let lifecycle = CacheLifecycle::new(
        registry.clone(),
        Arc::new(UnifiedBackendFactory),
        config.cache_url.clone(),
    );
    let cache_id = lifecycle.start().await?;

    let state = AppState::new(registry, cache_id);
    let router = build_router(state, &config);

    let listener = match TcpListener::bind(config.bind_addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            lifecycle.stop().await;
            return Err(e.into());
        }
    };

    info!("HTTP Server listening on http://{}", config.bind_addr());
    info!("Try: curl http://localhost:{}/", config.http_port);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Shutdown hook: in-flight requests have drained at this point
    lifecycle.stop().await;
    info!("Server shutdown complete");

    served?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
