//! Display helpers for amounts and opaque ids

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol used for all amounts
pub const CURRENCY_SYMBOL: &str = "₦";

/// Format an amount as `₦1234.50`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", CURRENCY_SYMBOL, rounded)
}

/// Leading eight characters of an opaque id, followed by `...`
pub fn short_ref(id: &str) -> String {
    let head: String = id.chars().take(8).collect();
    format!("{}...", head)
}
