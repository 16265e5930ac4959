//! Per-request logging span.
//!
//! Every request, probes and shutdown included, runs inside a `request` span that
//! carries a fresh id plus the method, path and `Host` it arrived with, so podinfo
//! read warnings can be tied back to the request that hit them. Completion is logged
//! with the status and elapsed time.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{header::HOST, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// `Host` header value, empty when the client sent none.
pub fn request_host(headers: &HeaderMap) -> String {
    headers
        .get(HOST)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// Wrap the request in a span and log its outcome.
///
/// Installed as the outermost layer so the span covers every handler.
pub async fn request_span_layer(request: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
        host = %request_host(request.headers()),
    );

    async move {
        let start = Instant::now();
        let response = next.run(request).await;

        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request served"
        );
        response
    }
    .instrument(span)
    .await
}
