mod config;
mod cv;
mod errors;
mod guidance;
mod interview;
mod llm_client;
mod retention;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::retention::RetentionScheduler;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FsStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing model credential)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Beacon API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.google_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize CV storage
    tokio::fs::create_dir_all(&config.storage_dir).await?;
    let storage: Arc<dyn Storage> = Arc::new(FsStorage);
    info!("CV storage directory ready: {}", config.storage_dir.display());

    // Start the recurring CV cleanup task
    let scheduler = RetentionScheduler::new(
        storage.clone(),
        config.storage_dir.clone(),
        config.retention_policy(),
    );
    let cancel = scheduler.cancellation_token();
    let scheduler_handle = scheduler.spawn();

    // Build app state
    let state = AppState {
        llm,
        storage,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict to known frontend origins in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the cleanup task before exiting
    cancel.cancel();
    scheduler_handle.await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
