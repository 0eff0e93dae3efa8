//! Dashboard endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use service_core::error::AppError;

use crate::models::DashboardStats;
use crate::startup::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// `GET /api/dashboard/stats`
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = state.dashboard.stats().await?;

    Ok(Json(ApiResponse {
        success: true,
        data: stats,
    }))
}
