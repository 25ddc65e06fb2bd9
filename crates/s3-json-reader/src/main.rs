//! S3 JSON Reader - periodic JSON loader with an HTTP query surface

use document_cache::CacheStore;
use s3_json_reader::{
    start_server, BackendConfig, Config, JsonReader, ReaderError, RefreshScheduler, Result,
    ServerState, SharedState,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("s3_json_reader=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting S3 JSON Reader...");

    let config = Config::from_env()?;
    info!("Port: {}", config.port);
    match &config.backend {
        BackendConfig::S3(s3) => info!(
            bucket = %s3.bucket,
            region = %s3.region,
            endpoint = ?s3.endpoint,
            "Using S3 backend"
        ),
        BackendConfig::Http { base_url, .. } => info!(base_url = %base_url, "Using HTTP backend"),
    }
    info!("Document key: {}", config.json_file_key);

    let fetcher = config.backend.build_fetcher()?;
    let cache = Arc::new(CacheStore::new());
    let reader = JsonReader::new(fetcher, config.json_file_key.clone());

    let scheduler = Arc::new(RefreshScheduler::new(
        config.scheduler.clone(),
        reader.clone(),
        cache.clone(),
    )?);
    scheduler.start()?;

    let state: SharedState = Arc::new(ServerState::new(cache, scheduler.clone(), reader));

    // Serve until SIGINT/SIGTERM
    let served = start_server(state, config.port).await;

    if let Err(e) = scheduler.shutdown().await {
        error!(error = %e, "Scheduler shutdown did not complete cleanly");
    }

    served.map_err(ReaderError::from)?;
    info!("Shutdown complete");

    Ok(())
}
