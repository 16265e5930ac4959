//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::counter::RequestCounter;
use crate::downward::EnvSource;
use crate::http::ShutdownSignal;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Each state owns its own request counter, so separate routers never share counts.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub counter: Arc<RequestCounter>,
    pub env: Arc<dyn EnvSource>,
    pub shutdown: ShutdownSignal,
}

impl AppState {
    pub fn new(config: AppConfig, env: Arc<dyn EnvSource>, shutdown: ShutdownSignal) -> Self {
        Self {
            config: Arc::new(config),
            counter: Arc::new(RequestCounter::new()),
            env,
            shutdown,
        }
    }
}
