//! Lenient price and quantity parsing.
//!
//! Prices arrive from loosely-shaped payloads as JSON numbers or as strings
//! that may use a comma as the decimal separator (`"4,50"`). Quantities may
//! arrive as numbers or numeric strings. Anything unparseable resolves to
//! zero rather than failing; callers that need strict input validation use
//! [`parse_price_input`].

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Number of decimal places kept for prices entered by hand.
pub const PRICE_SCALE: u32 = 2;

/// Parse a price from a JSON value, defaulting to zero.
///
/// Numbers are converted exactly through their decimal representation.
/// Strings go through [`parse_price_str`]. Every other shape is zero.
#[must_use]
pub fn parse_price(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or(Decimal::ZERO),
        Value::String(s) => parse_price_str(s).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Parse a price string, accepting a comma as decimal separator.
///
/// Only the first comma is treated as the separator. Surrounding whitespace
/// is ignored and a blank string is zero. Returns `None` when the string is
/// not a number.
///
/// ```
/// use item_purchase_core::parse_price_str;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price_str("4,50"), Some(Decimal::new(450, 2)));
/// assert_eq!(parse_price_str("9.99"), Some(Decimal::new(999, 2)));
/// assert_eq!(parse_price_str(""), Some(Decimal::ZERO));
/// assert_eq!(parse_price_str("abc"), None);
/// ```
#[must_use]
pub fn parse_price_str(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replacen(',', ".", 1);
    if normalized.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Parse a hand-entered price for a new catalog item.
///
/// Returns `Ok(None)` for blank input and rounds to two decimal places
/// (half away from zero) otherwise.
///
/// # Errors
///
/// Returns the trimmed input back when it is not a number.
pub fn parse_price_input(raw: &str) -> Result<Option<Decimal>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let normalized = trimmed.replacen(',', ".", 1);
    Decimal::from_str(&normalized)
        .map(|d| {
            Some(d.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero))
        })
        .map_err(|_| trimmed.to_owned())
}

/// Parse an integer quantity from a JSON value, defaulting to zero.
///
/// Numbers are truncated toward zero. Strings contribute their leading
/// integer prefix (`"3"`, `" 3 pcs"`, `"-2"`), mirroring how form inputs
/// report quantities. Every other shape is zero.
#[must_use]
pub fn parse_quantity(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| {
            #[allow(clippy::cast_possible_truncation)] // Out-of-range floats saturate
            let truncated = n
                .as_f64()
                .filter(|f| f.is_finite())
                .map_or(0, |f| f.trunc() as i64);
            truncated
        }),
        Value::String(s) => leading_integer(s).unwrap_or(0),
        _ => 0,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits.get(..end)?.parse::<i64>().ok().map(|n| sign * n)
}
