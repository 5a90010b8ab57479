//! Display formatting for metric cards.

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use tracing::debug;

/// Formats an amount in the given ISO currency ("$1,234.50" for USD).
///
/// Unknown or missing currency codes fall back to a plain two-decimal number,
/// followed by the code when there is one.
pub fn format_money(amount: Decimal, currency: Option<&str>) -> String {
    match currency.and_then(iso::find) {
        Some(currency) => Money::from_decimal(amount, currency).to_string(),
        None => {
            let rounded = amount.round_dp(2);
            match currency {
                Some(code) if !code.is_empty() => {
                    debug!(code, "Unknown currency code, formatting as plain number");
                    format!("{:.2} {}", rounded, code)
                }
                _ => format!("{:.2}", rounded),
            }
        }
    }
}

/// Formats a signed percentage with one decimal, or "N/A".
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(pct) if pct.is_finite() => format!("{:.1}%", pct),
        _ => "N/A".to_string(),
    }
}
