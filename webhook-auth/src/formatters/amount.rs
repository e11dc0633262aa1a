//! Currency-aware amount formatting.
//!
//! The decimal table and rounding are part of the signing contract: the
//! provider formats amounts exactly this way before hashing.

use super::coerce::to_fixed;

/// Decimal places used when a currency is not listed.
pub const DEFAULT_CURRENCY_DECIMALS: usize = 2;

/// ISO 4217 codes with their minor-unit precision.
const CURRENCY_DECIMALS: [(&str, usize); 10] = [
    ("BHD", 3),
    ("KWD", 3),
    ("OMR", 3),
    ("AED", 2),
    ("SAR", 2),
    ("QAR", 2),
    ("USD", 2),
    ("EUR", 2),
    ("GBP", 2),
    ("EGP", 2),
];

/// Decimal places for a currency code. Unknown codes silently use
/// [`DEFAULT_CURRENCY_DECIMALS`].
pub fn currency_decimals(currency_code: &str) -> usize {
    CURRENCY_DECIMALS
        .iter()
        .find(|(code, _)| *code == currency_code)
        .map(|(_, decimals)| *decimals)
        .unwrap_or(DEFAULT_CURRENCY_DECIMALS)
}

/// Formats an amount with exactly as many fraction digits as the currency uses.
pub fn format_amount(amount: f64, currency_code: &str) -> String {
    to_fixed(amount, currency_decimals(currency_code))
}
