// Main entry point for the generation API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::{
    kernel::{jobs, ServerDeps},
    server::build_app,
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MulmoScript generation server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // The static file route and the pipeline both need the output directory
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let deps = Arc::new(ServerDeps::from_config(&config)?);

    // Hourly retention sweep; the scheduler stops when dropped, so keep it
    let _sweeper = jobs::start_sweeper(deps.jobs.clone(), deps.progress.clone())
        .await
        .context("Failed to start retention sweeper")?;

    let app = build_app(deps, &config.output_dir);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Submit jobs: POST http://localhost:{}/api/generate", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
