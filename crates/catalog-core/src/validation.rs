//! # Validation Module
//!
//! Input validation for catalog entities.
//!
//! ## Where It Runs
//! ```text
//! Caller builds Product
//!      │
//!      ▼
//! validate_product() ← THIS MODULE
//!      │
//!      ▼
//! ProductRepository::add / update  →  document store
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{validate_product_code, validate_movement};
//!
//! validate_product_code("C1").unwrap();
//! validate_movement(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CODE_LEN, MAX_NAME_LEN, MAX_STOCK, MAX_STOCK_MOVEMENT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product business code.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_CODE_LEN`] characters
/// - No whitespace
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_product_code;
///
/// assert!(validate_product_code("C1").is_ok());
/// assert!(validate_product_code("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("has space").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product value. Zero is allowed, negatives are not.
pub fn validate_value(value: Money) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "value".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level: `0..=MAX_STOCK`.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates the amount of a single stock movement (debit or restock).
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_STOCK_MOVEMENT`]
pub fn validate_movement(amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if amount > MAX_STOCK_MOVEMENT {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: MAX_STOCK_MOVEMENT,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates every field of a product before it is written.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_code(&product.code)?;
    validate_product_name(&product.name)?;
    validate_value(product.value)?;
    validate_stock(product.stock)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("C1").is_ok());
        assert!(validate_product_code("WIDGET-001").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("C 1").is_err());
        assert!(validate_product_code(&"A".repeat(MAX_CODE_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Widget").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_value_and_stock() {
        assert!(validate_value(Money::zero()).is_ok());
        assert!(validate_value(Money::from_cents(1250)).is_ok());
        assert!(validate_value(Money::from_cents(-1)).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(MAX_STOCK).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_stock(MAX_STOCK + 1).is_err());
        assert!(validate_stock(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_movement() {
        assert!(validate_movement(1).is_ok());
        assert!(validate_movement(MAX_STOCK_MOVEMENT).is_ok());

        assert!(validate_movement(0).is_err());
        assert!(validate_movement(-3).is_err());
        assert!(validate_movement(MAX_STOCK_MOVEMENT + 1).is_err());
    }

    #[test]
    fn test_validate_product() {
        let good = Product::new("C1", "Widget", Money::from_cents(1000), 5);
        assert!(validate_product(&good).is_ok());

        let mut bad = good.clone();
        bad.name = String::new();
        assert!(matches!(
            validate_product(&bad),
            Err(ValidationError::Required { .. })
        ));
    }
}
