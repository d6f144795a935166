//! Binding and running the HTTP server.

use std::net::SocketAddr;

use eiptools_core::{Error, Result};
use tokio::net::TcpListener;

use crate::routes::create_router;
use crate::state::AppState;

/// Serve `state` on `addr` until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let router = create_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("cannot bind {addr}: {e}")))?;
    let local = listener.local_addr()?;
    log::info!("eiptools listening on http://{local}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
