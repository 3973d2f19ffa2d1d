use crate::{ProxyError, Result};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Serves `app` on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ProxyError::Bind { addr, source })?;
    let local = listener.local_addr().map_err(ProxyError::Serve)?;
    tracing::info!(addr = %local, "Proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ProxyError::Serve)?;

    tracing::info!("Proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
