pub mod api;
pub mod config;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::pipeline::generation::RetryPolicy;
use crate::pipeline::summary::SummaryError;

/// Errors that stop the service before it starts serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("LLM client error: {0}")]
    Llm(#[from] SummaryError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the service until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = AppConfig::from_env()?;
    tracing::info!(
        provider = cfg.llm.provider.as_str(),
        model = %cfg.llm.model,
        bind_addr = %cfg.bind_addr,
        "Configuration loaded"
    );
    let llm = pipeline::llm::client_from_settings(&cfg.llm)?;
    let retry = RetryPolicy::with_unit(cfg.retry_unit);
    let ctx = api::ApiContext::new(llm, retry);

    let server = api::start_api_server(ctx, cfg.bind_addr, &cfg.cors_origins).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
    tracing::info!("Received Ctrl-C, shutting down");
    server.stop().await;
    Ok(())
}
