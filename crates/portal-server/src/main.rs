mod config;
mod error;
mod http;
mod metrics;
mod state;
mod static_ui;

use anyhow::Context;
use clap::Parser;
use config::Config;
use http::router;
use portal_core::{JsonFileStore, UploadDir};
use state::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_json);

    info!("Starting Incident Portal");
    info!(
        "Data file: {:?}, uploads: {:?}",
        config.data_file, config.uploads_dir
    );

    let store = JsonFileStore::open(&config.data_file)
        .with_context(|| format!("Failed to open incident store {:?}", config.data_file))?;
    let uploads = UploadDir::open(&config.uploads_dir)
        .with_context(|| format!("Failed to create uploads directory {:?}", config.uploads_dir))?;
    let metrics_handle = metrics::init_metrics().context("Failed to install Prometheus metrics exporter")?;

    if let Some(dir) = &config.client_build {
        info!("Serving client build from {:?}", dir);
    }

    let state = AppState::new(Arc::new(store), uploads)
        .with_metrics(metrics_handle)
        .with_client_build(config.client_build.clone());
    let app = router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on port {}", config.port);
    info!("API available at http://{}/api", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
