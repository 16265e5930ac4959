//! In-band shutdown endpoint.

use axum::extract::State;

use crate::state::AppState;

pub const SHUTDOWN_MESSAGE: &str = "Server shutting down...";

/// Signal the serving loop to stop.
///
/// The listener closes right away; this response still completes because
/// graceful shutdown drains in-flight requests before the process exits.
pub async fn shutdown(State(state): State<AppState>) -> &'static str {
    tracing::warn!("Shutdown requested");
    state.shutdown.trigger();
    SHUTDOWN_MESSAGE
}
