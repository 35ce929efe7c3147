pub mod analysis; // Prompt selection, reply normalization, orchestration, reports
pub mod api; // HTTP router + server lifecycle
pub mod config;
pub mod upstream; // Hosted vision model client

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::analysis::ScanAnalyzer;
use crate::api::{start_server, ApiContext, ServerError};
use crate::config::{AppConfig, ConfigError};
use crate::upstream::{AzureOpenAiClient, UpstreamError};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Vision client error: {0}")]
    Client(#[from] UpstreamError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Start the service and block until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::info!(
        endpoint = %config.upstream.endpoint,
        deployment = %config.upstream.deployment,
        api_version = %config.upstream.api_version,
        verify_ssl = config.upstream.verify_ssl,
        "Upstream model configured"
    );

    let client = AzureOpenAiClient::new(&config.upstream)?;
    let analyzer = Arc::new(ScanAnalyzer::new(Arc::new(client)));
    let ctx = ApiContext::new(analyzer);

    let server = start_server(
        ctx,
        config.server.bind_addr,
        Some(config.server.frontend_dir.as_path()),
    )
    .await?;
    tracing::info!(addr = %server.local_addr, "{} listening", config::APP_NAME);

    tokio::signal::ctrl_c().await.map_err(StartupError::Signal)?;
    tracing::info!("Shutdown requested");
    server.stop().await;

    Ok(())
}
