//! # Error Types
//!
//! Domain-specific error types for stokpro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stokpro-core errors (this file)                                       │
//! │  ├── CoreError        - Calculation and business rule errors           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product ID, line index, etc.)
//! 3. Errors are enum variants, never String
//! 4. Missing catalog lookups are NOT errors: calculators treat them as
//!    zero stock / zero cost and leave integrity checks to the catalog owner

use thiserror::Error;

use crate::units::Unit;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// None of these are transient. Calculators are pure, so retrying a call
/// with the same snapshot reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The product does not define the packaging ratio the unit needs.
    ///
    /// ## When This Occurs
    /// - Operator picks "Pack" for a product without `pieces_per_pack`
    /// - Operator picks "Carton" for a product missing either ratio
    ///
    /// ## User Workflow
    /// ```text
    /// Stock In: 3 × Carton
    ///      │
    ///      ▼
    /// to_pieces(3, Carton, { ppp: 12, ppc: None })
    ///      │
    ///      ▼
    /// UnsupportedUnit { unit: Carton }
    ///      │
    ///      ▼
    /// UI shows: "Carton is not available for this product"
    /// ```
    #[error("{unit} is not available for this product")]
    UnsupportedUnit { unit: Unit },

    /// A sale line references zero or both of product/bundle.
    ///
    /// Indicates corrupted upstream data. The line is excluded from every
    /// total and reported back to the caller.
    #[error("Malformed sale line #{index}: {reason}")]
    MalformedLineItem { index: usize, reason: String },

    /// Insufficient stock to complete a stock-out.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: u64,
        requested: u64,
    },

    /// A piece count does not fit in 64 bits.
    #[error("Quantity overflow while computing {context}")]
    QuantityOverflow { context: &'static str },

    /// Product cannot be found in the snapshot.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Bundle cannot be found in the snapshot.
    #[error("Bundle not found: {0}")]
    BundleNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when catalog data doesn't meet requirements.
/// Used for early validation when a snapshot is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unknown unit name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., product listed twice in one bundle).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: "prod-1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for prod-1: available 3, requested 5"
        );

        let err = CoreError::UnsupportedUnit { unit: Unit::Carton };
        assert_eq!(err.to_string(), "carton is not available for this product");

        let err = CoreError::MalformedLineItem {
            index: 2,
            reason: "references both a product and a bundle".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed sale line #2: references both a product and a bundle"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "required_quantity".to_string(),
        };
        assert_eq!(err.to_string(), "required_quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
