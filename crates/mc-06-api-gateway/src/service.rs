//! HTTP server entry point.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// Bind `config.http_addr` and serve `router` until `shutdown` flips to true.
pub async fn serve(
    router: Router,
    config: &GatewayConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<(), GatewayError> {
    config.validate().map_err(GatewayError::Config)?;
    let listener = TcpListener::bind(config.http_addr)
        .await
        .map_err(|e| GatewayError::Bind(format!("{}: {}", config.http_addr, e)))?;
    serve_on(listener, router, shutdown).await
}

/// Serve on an already bound listener.
pub async fn serve_on(
    listener: TcpListener,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), GatewayError> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    info!("[mc-06] HTTP server listening on {:?}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            // A dropped sender also stops the server.
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await
        .map_err(|e| GatewayError::Serve(e.to_string()))?;

    info!("[mc-06] HTTP server stopped");
    Ok(())
}
