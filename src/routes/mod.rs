//! HTTP route handlers.
//!
//! `/healthz` and `/shutdown` match exactly; every other path, `/` included, falls
//! through to the introspection report. All responses are marked `no-store`.
//!
//! Each request is logged inside a span carrying its id, method, path and Host.

pub mod health;
pub mod introspect;
pub mod shutdown;

use axum::{
    http::header::{HeaderValue, CACHE_CONTROL},
    middleware,
    routing::{any, get},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_span_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", any(health::health))
        .route("/shutdown", get(shutdown::shutdown))
        .fallback(introspect::report)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Outermost, so the span covers the header layer and every handler
        .layer(middleware::from_fn(request_span_layer))
}
