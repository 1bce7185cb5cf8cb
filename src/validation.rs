// Validation utilities module
// Field-level checks shared by the product create/update paths

use rust_decimal::Decimal;

/// Validates that a required text field is present and within its bound
pub fn bounded_text(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if trimmed.len() > max_len {
        return Err(format!("{} cannot exceed {} characters", field, max_len));
    }
    Ok(())
}

/// Validates that a price is strictly positive
pub fn positive_price(field: &str, value: Decimal) -> Result<(), String> {
    if value <= Decimal::ZERO {
        Err(format!("{} must be greater than zero", field))
    } else {
        Ok(())
    }
}

/// Validates that a quantity is not negative
pub fn non_negative_quantity(value: i32) -> Result<(), String> {
    if value < 0 {
        Err("quantity cannot be negative".to_string())
    } else {
        Ok(())
    }
}

/// Validates that a discounted price, when present, undercuts the list price
pub fn discount_below_price(price: Decimal, discounted: Option<Decimal>) -> Result<(), String> {
    match discounted {
        Some(d) if d >= price => {
            Err("discounted_price must be less than price".to_string())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bounded_text_rejects_empty() {
        assert!(bounded_text("name", "", 100).is_err());
        assert!(bounded_text("name", "   ", 100).is_err());
    }

    #[test]
    fn test_bounded_text_rejects_overlong() {
        let long = "a".repeat(101);
        assert!(bounded_text("name", &long, 100).is_err());
        assert!(bounded_text("name", "Bread", 100).is_ok());
    }

    #[test]
    fn test_positive_price() {
        assert!(positive_price("price", dec!(10.50)).is_ok());
        assert!(positive_price("price", Decimal::ZERO).is_err());
        assert!(positive_price("price", dec!(-1)).is_err());
    }

    #[test]
    fn test_non_negative_quantity() {
        assert!(non_negative_quantity(0).is_ok());
        assert!(non_negative_quantity(5).is_ok());
        assert!(non_negative_quantity(-1).is_err());
    }

    #[test]
    fn test_discount_must_undercut_price() {
        assert!(discount_below_price(dec!(10), Some(dec!(8))).is_ok());
        assert!(discount_below_price(dec!(10), Some(dec!(10))).is_err());
        assert!(discount_below_price(dec!(10), Some(dec!(12))).is_err());
        assert!(discount_below_price(dec!(10), None).is_ok());
    }
}
