use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{FinancialTotals, LineItem};

/// VAT applied to every quotation: 5%.
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Round to 2 fractional digits, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed two-digit rendering used in the item table and totals rows.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round2(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Derive subtotal, VAT and grand total from the authoritative per-item amounts.
///
/// `subtotal` is the exact sum and is only rounded when displayed. The tax is
/// computed against that exact sum, and the grand total against the
/// full-precision tax. An empty slice yields all-zero totals.
pub fn compute_totals(items: &[LineItem]) -> FinancialTotals {
    let subtotal: Decimal = items.iter().map(|item| item.total_amount).sum();
    let tax = subtotal * TAX_RATE;

    FinancialTotals {
        subtotal,
        tax_amount: round2(tax),
        grand_total: round2(subtotal + tax),
    }
}

