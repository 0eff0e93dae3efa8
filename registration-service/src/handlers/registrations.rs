//! Registration endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{
    CreateRegistrationRequest, ListParams, Page, PaginatedResponse, Registration,
    RegistrationBrief, RegistrationWithCount, UpdateStatusRequest,
};
use crate::startup::AppState;

/// `GET /api/registrations?page&limit&search`
pub async fn list_registrations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedResponse<RegistrationWithCount>>, AppError> {
    let page = Page::clamped(params.page, params.limit);
    let search = params.search.as_deref().filter(|s| !s.is_empty());

    Ok(Json(state.registrations.list(page, search).await?))
}

/// `GET /api/registrations/all`
pub async fn list_all_registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistrationBrief>>, AppError> {
    Ok(Json(state.registrations.list_all_brief().await?))
}

/// `POST /api/registrations`
pub async fn create_registration(
    State(state): State<AppState>,
    Json(payload): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<Registration>), AppError> {
    tracing::info!(company = %payload.company, "Creating registration");

    let registration = state.registrations.create(payload).await?;

    Ok((StatusCode::CREATED, Json(registration)))
}

/// `PATCH /api/registrations/:id/status`
pub async fn update_registration_status(
    State(state): State<AppState>,
    Path(registration_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Registration>, AppError> {
    tracing::info!(
        registration_id = %registration_id,
        status = %payload.status,
        "Updating registration status"
    );

    let registration = state
        .registrations
        .set_status(registration_id, &payload.status)
        .await?;

    Ok(Json(registration))
}

/// `DELETE /api/registrations/:id` — responds with the deleted id.
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(registration_id): Path<Uuid>,
) -> Result<Json<Uuid>, AppError> {
    tracing::info!(registration_id = %registration_id, "Deleting registration");

    let deleted = state.registrations.remove(registration_id).await?;

    Ok(Json(deleted))
}
