//! Invoice model for registration-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::invoice_item::{InvoiceItem, InvoiceItemRequest};

/// Invoice payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "UNPAID",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNPAID" => Some(InvoiceStatus::Unpaid),
            "PAID" => Some(InvoiceStatus::Paid),
            "OVERDUE" => Some(InvoiceStatus::Overdue),
            _ => None,
        }
    }
}

/// Invoice row. Monetary aggregates (subtotal, VAT, total) are derived via
/// `services::finance` and never persisted.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "id")]
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub registration_id: Uuid,
    pub due_date: NaiveDate,
    pub status: String,
    pub vat_rate: Decimal,
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_utc: DateTime<Utc>,
}

/// Invoice with its ordered line items, the shape every invoice endpoint
/// returns.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceWithItems {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

fn default_invoice_status() -> String {
    InvoiceStatus::Unpaid.as_str().to_string()
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub registration_id: Uuid,
    pub due_date: NaiveDate,
    #[serde(default = "default_invoice_status")]
    pub status: String,
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Vec<InvoiceItemRequest>,
    pub vat_rate: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Option<Vec<InvoiceItemRequest>>,
}
