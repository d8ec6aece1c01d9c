//! Money calculation for order intake
//!
//! All arithmetic runs on `Decimal` and converts to `f64` only for
//! storage/serialization. Totals are rounded to 2 decimal places, half-up
//! on the cent boundary. Once an order is written these numbers never
//! change, regardless of later menu edits.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal, treating non-representable values as zero
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal back to f64 for storage
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Round to 2 decimal places, half-up
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-line subtotal: price × quantity, rounded to 2 decimals
pub fn line_total(price: f64, quantity: u32) -> f64 {
    let total = to_decimal(price) * Decimal::from(quantity);
    to_f64(round_money(total))
}

/// Grand total over line subtotals, rounded to 2 decimals
pub fn order_total(line_totals: &[f64]) -> f64 {
    let sum = line_totals
        .iter()
        .fold(Decimal::ZERO, |acc, t| acc + to_decimal(*t));
    to_f64(round_money(sum))
}

/// Parse a requested quantity as a positive integer.
///
/// The order endpoint accepts whatever the cart sends: a number, a numeric
/// string, or nothing. Anything that does not parse to a positive integer
/// falls back to 1.
pub fn normalize_quantity(value: Option<&serde_json::Value>) -> u32 {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(q) if q >= 1 => u32::try_from(q).unwrap_or(1),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scenario_a_total() {
        // [{price:100, qty:2}, {price:50, qty:1}] → 250.00
        let lines = vec![line_total(100.0, 2), line_total(50.0, 1)];
        assert_eq!(lines, vec![200.0, 50.0]);
        assert_eq!(order_total(&lines), 250.0);
    }

    #[test]
    fn test_half_up_rounding_on_cent_boundary() {
        // 33.335 rounds up, not to even
        assert_eq!(line_total(6.667, 5), 33.34);
        // 2.5 cents rounds to 3 cents
        assert_eq!(line_total(0.005, 5), 0.03);
    }

    #[test]
    fn test_accumulation_precision() {
        // 0.1 * 3 == 0.3 exactly under Decimal, unlike f64
        assert_eq!(line_total(0.1, 3), 0.3);

        let lines: Vec<f64> = (0..100).map(|_| line_total(0.01, 1)).collect();
        assert_eq!(order_total(&lines), 1.0);
    }

    #[test]
    fn test_normalize_quantity() {
        assert_eq!(normalize_quantity(Some(&json!(3))), 3);
        assert_eq!(normalize_quantity(Some(&json!("4"))), 4);
        assert_eq!(normalize_quantity(Some(&json!(" 2 "))), 2);

        // Missing or invalid values fall back to 1
        assert_eq!(normalize_quantity(None), 1);
        assert_eq!(normalize_quantity(Some(&json!(0))), 1);
        assert_eq!(normalize_quantity(Some(&json!(-5))), 1);
        assert_eq!(normalize_quantity(Some(&json!("abc"))), 1);
        assert_eq!(normalize_quantity(Some(&json!(2.7))), 1);
        assert_eq!(normalize_quantity(Some(&json!(null))), 1);
    }
}
