//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done on `Decimal` internally, then converted to `f64`
//! for storage/serialization. Totals are rounded to 2 decimal places,
//! half-up.

use crate::db::models::OrderLine;
use crate::orders::OrderError;
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 100_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: u32 = 999;

fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::InvalidOrder(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate one priced order line before totalling
pub fn validate_line(line: &OrderLine) -> Result<(), OrderError> {
    require_finite(line.unit_price, "unit_price")?;
    if line.unit_price < 0.0 {
        return Err(OrderError::InvalidOrder(format!(
            "unit_price must be non-negative, got {}",
            line.unit_price
        )));
    }
    if line.unit_price > MAX_PRICE {
        return Err(OrderError::InvalidOrder(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, line.unit_price
        )));
    }
    if line.quantity == 0 {
        return Err(OrderError::InvalidOrder(format!(
            "quantity must be at least 1 for '{}'",
            line.name
        )));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidOrder(format!(
            "quantity exceeds maximum allowed ({}) for '{}'",
            MAX_QUANTITY, line.name
        )));
    }
    Ok(())
}

/// Sum of `unit_price × quantity` over all lines, rounded to 2 decimals
pub fn order_total(lines: &[OrderLine]) -> Result<f64, OrderError> {
    let mut total = Decimal::ZERO;

    for line in lines {
        validate_line(line)?;
        let price = Decimal::from_f64(line.unit_price).ok_or_else(|| {
            OrderError::InvalidOrder(format!("unit_price {} is not representable", line.unit_price))
        })?;
        total += price * Decimal::from(line.quantity);
    }

    total
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .ok_or_else(|| OrderError::InvalidOrder("total is not representable".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit_price: f64, quantity: u32) -> OrderLine {
        OrderLine {
            name: name.to_string(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn total_is_sum_of_line_totals() {
        let lines = vec![line("Tea", 10.0, 2), line("Samosa", 15.5, 3)];
        assert_eq!(order_total(&lines).unwrap(), 66.5);
    }

    #[test]
    fn total_avoids_float_drift() {
        // 0.1 + 0.2 style accumulation must still come out exact at 2 dp
        let lines = vec![line("A", 0.1, 1), line("B", 0.2, 1)];
        assert_eq!(order_total(&lines).unwrap(), 0.3);
    }

    #[test]
    fn empty_lines_total_zero() {
        assert_eq!(order_total(&[]).unwrap(), 0.0);
    }

    #[test]
    fn rejects_zero_quantity() {
        let lines = vec![line("Tea", 10.0, 0)];
        assert!(matches!(
            order_total(&lines),
            Err(OrderError::InvalidOrder(_))
        ));
    }

    #[test]
    fn rejects_non_finite_price() {
        let lines = vec![line("Tea", f64::NAN, 1)];
        assert!(matches!(
            order_total(&lines),
            Err(OrderError::InvalidOrder(_))
        ));
    }

    #[test]
    fn rejects_excessive_price() {
        let lines = vec![line("Tea", 1_000_000.0, 1)];
        assert!(matches!(
            order_total(&lines),
            Err(OrderError::InvalidOrder(_))
        ));
    }
}
