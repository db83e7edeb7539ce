use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};

use super::errors::DomainError;

/// Decimal places kept for every persisted currency amount.
pub const CURRENCY_PRECISION: i64 = 2;

/// Round `amount` to `precision` decimal digits, ties away from zero.
///
/// Rounding works on the shortest decimal text of the float (what `Display`
/// prints), so `2.005` rounds as the decimal 2.005 and not as the binary
/// value just below it. Non-finite input is returned unchanged.
pub fn normalize(amount: f64, precision: i64) -> f64 {
    if !amount.is_finite() {
        return amount;
    }
    let Ok(decimal) = BigDecimal::from_str(&amount.to_string()) else {
        return amount;
    };
    decimal
        .with_scale_round(precision, RoundingMode::HalfUp)
        .to_f64()
        .unwrap_or(amount)
}

/// Normalize a price on its way into the store.
pub fn normalize_price(amount: f64) -> Result<f64, DomainError> {
    if !amount.is_finite() {
        return Err(DomainError::InvalidInput(format!(
            "price must be a finite number, got {amount}"
        )));
    }
    Ok(normalize(amount, CURRENCY_PRECISION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(normalize(2.005, 2), 2.01);
        assert_eq!(normalize(-2.005, 2), -2.01);
        assert_eq!(normalize(2.5, 0), 3.0);
        assert_eq!(normalize(-2.5, 0), -3.0);
    }

    #[test]
    fn rounds_to_nearest_otherwise() {
        assert_eq!(normalize(9.995, 2), 10.0);
        assert_eq!(normalize(4.5, 2), 4.5);
        assert_eq!(normalize(1.234, 2), 1.23);
        assert_eq!(normalize(-1.236, 2), -1.24);
    }

    #[test]
    fn normalize_is_idempotent() {
        for x in [0.0, 0.1, 0.125, 2.005, 3.14159, 1e6 + 0.005, -7.777, 123.455] {
            let once = normalize(x, 2);
            assert_eq!(normalize(once, 2), once, "not idempotent for {x}");
        }
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(normalize(f64::NAN, 2).is_nan());
        assert_eq!(normalize(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn normalize_price_rejects_non_finite() {
        assert!(matches!(
            normalize_price(f64::NAN),
            Err(DomainError::InvalidInput(_))
        ));
        assert_eq!(normalize_price(19.999).unwrap(), 20.0);
    }
}
