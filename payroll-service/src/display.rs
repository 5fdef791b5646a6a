//! Display formatting for amounts and hours.

/// Peso sign used when no other symbol is configured
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";

/// `{symbol} {amount}` with two decimals, e.g. `₱ 1583.00`
pub fn format_currency(amount: f64, symbol: &str) -> String {
    format!("{} {:.2}", symbol, amount)
}

pub fn format_hours(hours: f64) -> String {
    format!("{:.2}", hours)
}
