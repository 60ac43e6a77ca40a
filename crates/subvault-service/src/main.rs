//! Subvault Service - HTTP API for transcripts and saved subtitles
//!
//! This is the main entry point for the subvault service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use subvault_service::{create_router, AppState, ServiceConfig};
use subvault_store::{PgStore, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,subvault=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Subvault Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        postgres = %config.database_url.is_some(),
        data_dir = %config.data_dir,
        transcript_api_url = %config.transcript_api_url,
        default_key_configured = %config.transcript_api_key.is_some(),
        free_tier_limit = config.free_tier_limit,
        "Service configuration loaded"
    );

    let store = open_store(&config).await?;

    // Build app state
    let state = AppState::new(store, config.clone())?;

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Pick the storage backend: Postgres when `DATABASE_URL` is set, otherwise the
/// embedded store.
async fn open_store(
    config: &ServiceConfig,
) -> Result<Arc<dyn Store>, Box<dyn std::error::Error>> {
    if let Some(url) = &config.database_url {
        tracing::info!("Connecting to Postgres store");
        return Ok(Arc::new(PgStore::connect(url).await?));
    }

    #[cfg(feature = "rocksdb-backend")]
    {
        tracing::info!(path = %config.data_dir, "Opening RocksDB store");
        Ok(Arc::new(subvault_store::RocksStore::open(&config.data_dir)?))
    }

    #[cfg(not(feature = "rocksdb-backend"))]
    {
        tracing::warn!("No DATABASE_URL and RocksDB disabled - using in-memory store, data will not persist");
        Ok(Arc::new(subvault_store::MemoryStore::new()))
    }
}
