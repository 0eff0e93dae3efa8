//! HTTP handlers for registration-service.

pub mod dashboard;
pub mod invoices;
pub mod registrations;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use service_core::error::AppError;

use crate::startup::AppState;

/// Health check endpoint. Probes the database; a pool that cannot serve a
/// trivial query reports 503 rather than a hollow "ok".
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state
        .db
        .health_check()
        .await
        .map_err(|_| AppError::ServiceUnavailable)?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "registration-service",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    ))
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        crate::services::get_metrics(),
    )
}
