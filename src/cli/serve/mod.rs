//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use super::shutdown_signal;
use crate::api::{AppState, create_router};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::infrastructure::observability::init_metrics;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let addr = build_socket_addr(&config)?;
    let metrics = init_metrics(&config.metrics).map(|m| (m, config.metrics.path.clone()));

    let context = AppContext::build(config).await?;
    let app = create_router(AppState::from_context(&context), metrics);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            context.shutdown().await;
            return Err(e.into());
        }
    };
    info!("Starting API server on {}", addr);

    // In-flight pipelines observe the token, so draining does not wait on slow model calls
    let token = context.shutdown.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            token.cancel();
        })
        .await;

    context.shutdown().await;
    result?;

    info!("API server shutdown complete");
    Ok(())
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
