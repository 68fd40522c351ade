use anyhow::Context;

use crate::config::AppConfig;
use crate::state::AppState;

pub async fn handle(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.api.port = port;
    }

    tracing::info!("Starting Noter API in {:?} mode", config.environment);
    tracing::info!(
        "Rate limiter backend {:?} on {:?}",
        config.rate_limit.backend,
        config.rate_limit.paths
    );

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config).context("invalid security configuration, is JWT_SECRET set?")?;
    let app = crate::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Noter API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
