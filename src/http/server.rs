//! HTTP server startup logic.

use std::net::{SocketAddr, TcpListener};

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;

use super::shutdown::{self, ShutdownSignal};

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Bind the configured address and serve until shutdown.
///
/// This function blocks until the server shuts down.
pub async fn start_server(
    app: Router,
    config: &AppConfig,
    signal: ShutdownSignal,
) -> Result<(), ServerError> {
    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)?;
    serve(listener, app, signal).await
}

/// Serve on an already bound listener until shutdown completes.
///
/// Returns once the listener is closed and in-flight requests have drained.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    signal: ShutdownSignal,
) -> Result<(), ServerError> {
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Starting HTTP server");

    let handle = Handle::new();
    shutdown::setup_shutdown_handler(handle.clone(), signal);

    axum_server::from_tcp(listener)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
