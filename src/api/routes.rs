//! GET-only routes exposing runtime reports.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::provider::StatusProvider;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the status router over a shared provider.
pub fn status_routes(provider: Arc<dyn StatusProvider>) -> Router {
    Router::new()
        .route("/v1/runtime/status", get(runtime_status_handler))
        .route("/v1/runner/cycle", get(runner_cycle_handler))
        .route("/v1/deployer/last", get(deployer_last_handler))
        .route("/v1/gateway/exposure", get(gateway_exposure_handler))
        .route("/health", get(health_handler))
        .with_state(provider)
}

async fn runtime_status_handler(
    State(provider): State<Arc<dyn StatusProvider>>,
) -> impl IntoResponse {
    Json(provider.get_runtime_status())
}

async fn runner_cycle_handler(
    State(provider): State<Arc<dyn StatusProvider>>,
) -> impl IntoResponse {
    Json(provider.get_runner_cycle())
}

async fn deployer_last_handler(
    State(provider): State<Arc<dyn StatusProvider>>,
) -> impl IntoResponse {
    Json(provider.get_deployer_last())
}

async fn gateway_exposure_handler(
    State(provider): State<Arc<dyn StatusProvider>>,
) -> impl IntoResponse {
    Json(provider.get_gateway_exposure())
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}
