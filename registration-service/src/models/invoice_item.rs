//! Invoice line item model for registration-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Line item row. Items are owned by their invoice and replaced wholesale on
/// edit, never diffed.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(rename = "id")]
    pub item_id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Line item as submitted by the client. Serialize is required by the
/// nested-collection validation on invoice requests, which captures the
/// offending value in its error params.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceItemRequest {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("price");
        err.message = Some("price must be zero or positive".into());
        return Err(err);
    }
    Ok(())
}
