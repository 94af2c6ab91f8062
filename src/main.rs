// main.rs
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hue_gateway::{
    cache::ControllerCache,
    config::{self, ConfigService, SharedConfig},
    devices::HueBridgeClient,
    metrics,
    models::AppState,
    refresh,
    registry::RegistryClient,
    routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = config::Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hue_gateway=info,tower_http=info")),
        )
        .init();

    if settings.metrics.enabled {
        metrics::setup_metrics(settings.metrics.port)
            .map_err(|e| anyhow::anyhow!("Failed to setup metrics: {}", e))?;
        info!("Metrics exported on port {}", settings.metrics.port);
    }

    let http = reqwest::Client::builder()
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

    let config_service = ConfigService::new(http.clone(), &settings.services);
    let bridges = Arc::new(SharedConfig::default());
    bridges
        .reload(&config_service)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load bridge configuration: {}", e))?;

    let cache = Arc::new(ControllerCache::new(
        bridges.clone(),
        Arc::new(HueBridgeClient::new(http.clone())),
        Arc::new(RegistryClient::new(http, &settings.services.registry_url)),
    ));
    if let Err(e) = cache.rebuild().await {
        warn!(error = %e, "initial rebuild incomplete");
    }

    let cancel = CancellationToken::new();
    let refresher = refresh::spawn(cache.clone(), &settings.refresh, cancel.clone());

    let state = Arc::new(AppState::new(cache, bridges, config_service));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&settings.server.address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind address: {}", e))?;

    info!("Server started on {}", settings.server.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    cancel.cancel();
    refresher
        .await
        .map_err(|e| anyhow::anyhow!("Refresh task failed: {}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
