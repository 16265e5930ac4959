//! Health check endpoint for container orchestration.
//!
//! Used as both liveness and readiness probe. It only checks that the process can
//! respond to HTTP, and echoes the build metadata captured at startup.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health document. Field order gives sorted keys on the wire.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    #[serde(rename = "BuildTime")]
    pub build_time: String,
    #[serde(rename = "Version")]
    pub version: String,
    pub health: &'static str,
}

/// Health check handler. Always 200 with compact JSON.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        build_time: state.config.build_time.clone(),
        version: state.config.version.clone(),
        health: "ok",
    })
}
