//! HTTP server module.
//!
//! Plain HTTP only; TLS is terminated by the ingress in front of the pod.
//!
//! The server includes:
//! - Graceful shutdown on SIGTERM/SIGINT
//! - Graceful shutdown requested in-band through `/shutdown`

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
pub use shutdown::ShutdownSignal;
