//! Dashboard aggregation service.

use rust_decimal::Decimal;
use service_core::error::AppError;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{DashboardStats, InvoiceItem, RegistrationStatus, StatusBucket};
use crate::services::{finance, Database};

const RECENT_ACTIVITY_SIZE: i64 = 5;

#[derive(Clone)]
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Compute the dashboard snapshot. Revenue is a full scan over every
    /// invoice and its items; nothing is cached.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let total_registrations = self.db.count_registrations(None).await?;
        let pending_registrations = self
            .db
            .count_registrations_by_status(RegistrationStatus::Pending.as_str())
            .await?;
        let approved_registrations = self
            .db
            .count_registrations_by_status(RegistrationStatus::Approved.as_str())
            .await?;
        let rejected_registrations = self
            .db
            .count_registrations_by_status(RegistrationStatus::Rejected.as_str())
            .await?;

        let total_revenue = self.total_revenue().await?;
        let recent_activity = self.db.recent_registrations(RECENT_ACTIVITY_SIZE).await?;

        Ok(DashboardStats {
            total_registrations,
            pending_registrations,
            approved_registrations,
            rejected_registrations,
            total_revenue,
            recent_activity,
            status_distribution: vec![
                StatusBucket {
                    name: "Pending",
                    value: pending_registrations,
                    color: "#f59e0b",
                },
                StatusBucket {
                    name: "Approved",
                    value: approved_registrations,
                    color: "#22c55e",
                },
                StatusBucket {
                    name: "Rejected",
                    value: rejected_registrations,
                    color: "#ef4444",
                },
            ],
        })
    }

    /// Gross revenue (VAT included) summed over all invoices at full
    /// precision, rounded once at this display boundary.
    async fn total_revenue(&self) -> Result<Decimal, AppError> {
        let invoices = self.db.list_all_invoices().await?;
        let ids: Vec<Uuid> = invoices.iter().map(|inv| inv.invoice_id).collect();

        let mut items_by_invoice: HashMap<Uuid, Vec<InvoiceItem>> = HashMap::new();
        for item in self.db.list_items_for_invoices(&ids).await? {
            items_by_invoice
                .entry(item.invoice_id)
                .or_default()
                .push(item);
        }

        let mut revenue = Decimal::ZERO;
        for invoice in &invoices {
            let items = items_by_invoice
                .get(&invoice.invoice_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let subtotal = finance::subtotal(items);
            let vat = finance::vat_amount(subtotal, invoice.vat_rate);
            revenue += finance::total(subtotal, vat);
        }

        Ok(finance::round_display(revenue))
    }
}
