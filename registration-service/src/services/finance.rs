//! Invoice arithmetic.
//!
//! Pure functions over `Decimal`. Full precision is kept through every
//! intermediate step; rounding to 2 decimal places happens only at display
//! boundaries via [`round_display`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::InvoiceItem;

/// Sum of `quantity * price` over the item set.
pub fn subtotal(items: &[InvoiceItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}

/// VAT surcharge on a subtotal at the given fractional rate (0.20 = 20%).
pub fn vat_amount(subtotal: Decimal, rate: Decimal) -> Decimal {
    subtotal * rate
}

/// Gross total.
pub fn total(subtotal: Decimal, vat: Decimal) -> Decimal {
    subtotal + vat
}

/// Round a monetary amount for display. Never apply mid-calculation.
///
/// The result always carries two decimal places so serialized amounts read
/// as money (240.00, not 240).
pub fn round_display(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
