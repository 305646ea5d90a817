pub mod api;
pub mod core;
pub mod providers;

use crate::core::AppConfig;
use crate::core::config::ProviderFlavor;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds the provider and router from `config` and serves until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<()> {
    debug!("Loaded config: {config:#?}");
    info!(
        port = config.port,
        flavor = ?config.provider.flavor,
        api_key_configured = config.has_api_key(),
        "Currency converter proxy starting..."
    );
    if config.provider.flavor == ProviderFlavor::Keyed && !config.has_api_key() {
        warn!("Keyed provider selected without EXCHANGE_RATE_API_KEY; rate requests will fail");
    }

    let provider =
        providers::ExchangeRateApiProvider::new(&config.provider, config.api_key.clone())?;
    let state = api::AppState::new(Arc::new(provider));
    let app = api::build_router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, static_dir = %config.static_dir.display(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
