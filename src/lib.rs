//! podprobe - Downward API diagnostic service
//!
//! Reports the runtime environment a pod was given by the orchestrator: injected
//! environment variables and the files of the mounted podinfo volume. Also serves
//! a health probe and an in-band shutdown endpoint.

pub mod config;
pub mod counter;
pub mod downward;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
