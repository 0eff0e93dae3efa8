//! Invoice lifecycle service.

use rust_decimal::Decimal;
use service_core::error::AppError;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreateInvoiceRequest, InvoiceStatus, InvoiceWithItems, Page, PaginatedResponse,
    PaginationMeta, UpdateInvoiceRequest,
};
use crate::services::metrics::INVOICES_TOTAL;
use crate::services::Database;

/// 20% VAT applies when the client does not specify a rate.
fn default_vat_rate() -> Decimal {
    Decimal::new(20, 2)
}

#[derive(Clone)]
pub struct InvoiceService {
    db: Database,
}

impl InvoiceService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Page of invoices with their items, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, page: Page) -> Result<PaginatedResponse<InvoiceWithItems>, AppError> {
        let total = self.db.count_invoices().await?;
        let invoices = self.db.list_invoices(page).await?;

        let ids: Vec<Uuid> = invoices.iter().map(|inv| inv.invoice_id).collect();
        let mut items_by_invoice: HashMap<Uuid, Vec<_>> = HashMap::new();
        for item in self.db.list_items_for_invoices(&ids).await? {
            items_by_invoice
                .entry(item.invoice_id)
                .or_default()
                .push(item);
        }

        let data = invoices
            .into_iter()
            .map(|invoice| {
                let items = items_by_invoice
                    .remove(&invoice.invoice_id)
                    .unwrap_or_default();
                InvoiceWithItems { invoice, items }
            })
            .collect();

        Ok(PaginatedResponse {
            data,
            meta: PaginationMeta::new(page, total),
        })
    }

    /// Create an invoice against an existing registration. The invoice
    /// number is derived and the invoice and its items are persisted in one
    /// transaction.
    #[instrument(skip(self, input), fields(registration_id = %input.registration_id))]
    pub async fn create(&self, input: CreateInvoiceRequest) -> Result<InvoiceWithItems, AppError> {
        input.validate()?;

        let status = InvoiceStatus::parse(&input.status).ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Invalid invoice status: {}", input.status))
        })?;

        // The registration must exist; an invoice cannot dangle.
        self.db
            .get_registration(input.registration_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Registration not found")))?;

        let vat_rate = input.vat_rate.unwrap_or_else(default_vat_rate);

        let created = self
            .db
            .create_invoice_with_items(
                input.registration_id,
                input.due_date,
                status.as_str(),
                vat_rate,
                input.notes.as_deref(),
                &input.items,
            )
            .await?;

        INVOICES_TOTAL.with_label_values(&[status.as_str()]).inc();

        Ok(created)
    }

    /// Patch status/notes and optionally replace the full item set. Partial
    /// item edits are unsupported by design.
    #[instrument(skip(self, input), fields(invoice_id = %invoice_id))]
    pub async fn update(
        &self,
        invoice_id: Uuid,
        input: UpdateInvoiceRequest,
    ) -> Result<InvoiceWithItems, AppError> {
        input.validate()?;

        let status = match input.status.as_deref() {
            Some(s) => Some(InvoiceStatus::parse(s).ok_or_else(|| {
                AppError::BadRequest(anyhow::anyhow!("Invalid invoice status: {}", s))
            })?),
            None => None,
        };

        self.db
            .update_invoice_with_items(
                invoice_id,
                status.map(|s| s.as_str()),
                input.notes.as_deref(),
                input.items.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))
    }

    /// Delete an invoice and its items.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn remove(&self, invoice_id: Uuid) -> Result<Uuid, AppError> {
        self.db
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

        self.db.delete_invoice(invoice_id).await?;

        Ok(invoice_id)
    }
}
