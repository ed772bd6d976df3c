//! # Validation Module
//!
//! Commit-time validation for values about to be sent to the backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard form (TypeScript)                                  │
//! │  ├── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Live preview (this crate)                                    │
//! │  └── Clamp / exclude, NEVER fail mid-edit                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Commit (this crate, THIS MODULE)                             │
//! │  └── Reject bad values before the write request is built               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use resello_core::validation::{validate_quantity, validate_percent};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_percent("tax_rate", Decimal::from(8)).is_ok());
//! assert!(validate_percent("tax_rate", Decimal::from(101)).is_err());
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price that may be zero (free items, free plans).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a wholesale price, which must be strictly positive to be priced.
pub fn validate_wholesale_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "wholesale_price".to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage in `[0, 100]` (discounts, tax rates).
pub fn validate_percent(field: &str, percent: Decimal) -> ValidationResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a markup value. No upper bound: a 300% markup is legitimate.
pub fn validate_markup_value(value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "markup".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Period Validators
// =============================================================================

/// Validates that a billing period ends after it starts.
pub fn validate_period(start: DateTime<Utc>, end: DateTime<Utc>) -> ValidationResult<()> {
    if end <= start {
        return Err(ValidationError::InvalidPeriod);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
