//! Health check API

use axum::{Json, Router, routing::get};
use serde::Serialize;
use shared::ApiResponse;

use crate::core::ServerState;
use crate::utils::ok;

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub timestamp: i64,
}

/// GET /api/health - liveness probe, public
async fn health() -> Json<ApiResponse<HealthInfo>> {
    ok(HealthInfo {
        status: "ok",
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: shared::util::now_millis(),
    })
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}
