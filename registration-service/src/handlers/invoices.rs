//! Invoice endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{
    CreateInvoiceRequest, InvoiceWithItems, ListParams, Page, PaginatedResponse,
    UpdateInvoiceRequest,
};
use crate::startup::AppState;

/// `GET /api/invoices?page&limit`
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedResponse<InvoiceWithItems>>, AppError> {
    let page = Page::clamped(params.page, params.limit);

    Ok(Json(state.invoices.list(page).await?))
}

/// `POST /api/invoices`
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceWithItems>), AppError> {
    tracing::info!(
        registration_id = %payload.registration_id,
        items = payload.items.len(),
        "Creating invoice"
    );

    let invoice = state.invoices.create(payload).await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

/// `PATCH /api/invoices/:id`
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceWithItems>, AppError> {
    tracing::info!(invoice_id = %invoice_id, "Updating invoice");

    let invoice = state.invoices.update(invoice_id, payload).await?;

    Ok(Json(invoice))
}

/// `DELETE /api/invoices/:id` — responds with the deleted id.
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Uuid>, AppError> {
    tracing::info!(invoice_id = %invoice_id, "Deleting invoice");

    let deleted = state.invoices.remove(invoice_id).await?;

    Ok(Json(deleted))
}
