//! Sequential invoice number derivation.
//!
//! Numbers take the form `INV-<year>-<4-digit counter>`. The year segment
//! comes from the invoice's due date; the counter continues from the most
//! recently created invoice regardless of its year segment, so counters do
//! not reset at calendar-year boundaries. The generator alone gives no
//! uniqueness guarantee: callers must pair it with the storage-level UNIQUE
//! constraint on `invoice_number` and retry on conflict (see
//! `Database::create_invoice_with_items`).

use anyhow::anyhow;
use service_core::error::AppError;

pub const INVOICE_PREFIX: &str = "INV";

/// Derive the next invoice number from the previously created one.
///
/// With no prior invoice the counter starts at 1. A prior number that does
/// not parse is an error; minting a garbage identifier would poison every
/// number generated after it.
pub fn next_invoice_number(year: i32, last: Option<&str>) -> Result<String, AppError> {
    let counter = match last {
        None => 1,
        Some(number) => parse_counter(number)? + 1,
    };
    Ok(format!("{INVOICE_PREFIX}-{year}-{counter:04}"))
}

fn parse_counter(number: &str) -> Result<u32, AppError> {
    number
        .split('-')
        .nth(2)
        .and_then(|segment| segment.parse::<u32>().ok())
        .ok_or_else(|| {
            AppError::InternalError(anyhow!("malformed invoice number: {number}"))
        })
}
