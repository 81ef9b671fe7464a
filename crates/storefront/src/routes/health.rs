//! Health checks.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::db::StoreKind;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub store: StoreKind,
}

/// Liveness health check endpoint.
///
/// Does not check dependencies.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Readiness health check endpoint.
///
/// Pings the store and reports which backend is serving.
/// Returns 503 Service Unavailable if the ping fails.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let store = state.store();

    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                store: store.kind(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable",
                    store: store.kind(),
                }),
            )
        }
    }
}
