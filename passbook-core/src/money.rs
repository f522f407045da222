//! Amount text handling for extracted statement columns.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const CURRENCY_SYMBOLS: [char; 3] = ['£', '$', '€'];

/// Parse an extracted amount column.
///
/// Thousands separators, currency symbols and whitespace are stripped. An
/// empty cell or a lone `.` (an extraction artefact) is zero. Returns `None`
/// for anything else that is not a decimal number.
pub fn parse_amount_text(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !CURRENCY_SYMBOLS.contains(c) && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned == "." {
        return Some(Decimal::ZERO);
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format a money amount with two decimal places, rounding half away from
/// zero
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
