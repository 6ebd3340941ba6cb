// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::application::streaming_service::StreamingSparklineService;
use crate::infrastructure::config::{load_service_config, load_sparkline_settings};
use crate::infrastructure::ts_source::HttpMetricsSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, defaulting to info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let service_config = load_service_config().context("Failed to load service config")?;
    let sparkline_settings =
        load_sparkline_settings().context("Failed to load sparkline config")?;
    let sparkline_config = sparkline_settings.to_config()?;

    // Create metrics source (infrastructure layer)
    let source = Arc::new(HttpMetricsSource::new(
        service_config.source.host.clone(),
        service_config.source.window()?,
        service_config.source.sample_period()?,
    ));

    // Create services (application layer)
    let sparkline_service = StreamingSparklineService::new(
        source,
        sparkline_config,
        sparkline_settings.metrics.clone(),
        service_config.server.refresh_interval()?,
    );

    let state = Arc::new(AppState { sparkline_service });

    // Build router (presentation layer)
    let app = router(state);

    let addr = service_config.server.listen_addr()?;
    tracing::info!(
        "Starting qps-sparkline on {} (metrics from {})",
        addr,
        service_config.source.host
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
