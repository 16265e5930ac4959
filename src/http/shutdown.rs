//! Graceful shutdown and signal handling.
//!
//! Handles:
//! - SIGTERM/SIGINT: Graceful shutdown with connection draining
//! - `ShutdownSignal::trigger`: the same, requested from a handler

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum_server::Handle;
use tokio::sync::Notify;

use crate::config::SHUTDOWN_GRACE_SECS;

/// Cancellation signal shared between handlers and the serving loop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    notify: Arc<Notify>,
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Later calls are no-ops.
    pub fn trigger(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            // notify_one stores a permit if nobody is waiting yet
            self.notify.notify_one();
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolves once [`trigger`](Self::trigger) has been called.
    pub async fn requested(&self) {
        if self.is_requested() {
            return;
        }
        self.notify.notified().await;
    }
}

/// Setup graceful shutdown on SIGTERM, SIGINT and the in-band signal.
///
/// When any of them fires, the server will:
/// 1. Stop accepting new connections
/// 2. Wait for existing connections to complete
/// 3. Shutdown gracefully
pub fn setup_shutdown_handler(handle: Handle, signal: ShutdownSignal) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
            _ = signal.requested() => {
                tracing::info!("Shutdown requested over HTTP, initiating graceful shutdown");
            }
        }

        handle.graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_SECS)));
        tracing::info!(
            grace_secs = SHUTDOWN_GRACE_SECS,
            "Graceful shutdown initiated, waiting for connections to close"
        );
    });
}
