//! # Validation Module
//!
//! Business-rule checks for catalog rows and operator input.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Backend row / CLI argument                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  serde deserialization (types, required fields)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  THIS MODULE                                                           │
//! │  ├── Catalog::new() runs validate_product / validate_bundle            │
//! │  └── CLI runs validate_stock_in / validate_stock_out / validate_sale_  │
//! │      line on every snapshot movement, validate_quantity on arguments   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Calculators assume validated input (e.g. required_quantity > 0)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::movement::{StockIn, StockOut};
use crate::types::{Bundle, Product, SaleLineItem};
use crate::{MAX_MOVEMENT_QUANTITY, MAX_PACKAGING_RATIO, MAX_STOCK_LEVEL};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a row identifier.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a product or bundle name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use stokpro_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Taro Net 36g").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product category. Empty is allowed (uncategorized).
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock movement quantity in pieces.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_MOVEMENT_QUANTITY`]
pub fn validate_quantity(qty: u64) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_MOVEMENT_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_MOVEMENT_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates an on-hand stock level or restock threshold.
///
/// Zero is allowed. Anything above [`MAX_STOCK_LEVEL`] is a corrupt row.
pub fn validate_stock_level(field: &str, level: u64) -> ValidationResult<()> {
    if level > MAX_STOCK_LEVEL {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_STOCK_LEVEL as i64,
        });
    }
    Ok(())
}

/// Validates a price. Zero is allowed (samples, giveaways).
///
/// ## Example
/// ```rust
/// use stokpro_core::money::Money;
/// use stokpro_core::validation::validate_price;
///
/// assert!(validate_price("sale_price", Money::from_amount(5_000)).is_ok());
/// assert!(validate_price("sale_price", Money::zero()).is_ok());
/// assert!(validate_price("sale_price", Money::from_amount(-1)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a packaging ratio.
///
/// Absent and `0` both mean "unit not offered" and pass.
pub fn validate_packaging_ratio(field: &str, ratio: Option<u32>) -> ValidationResult<()> {
    match ratio {
        Some(r) if r > MAX_PACKAGING_RATIO => Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PACKAGING_RATIO as i64,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Row Validators
// =============================================================================

/// Validates a whole product row.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_id("product id", &product.id)?;
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_stock_level("stock", product.stock)?;
    validate_stock_level("min_stock", product.min_stock)?;
    validate_price("purchase_price", product.purchase_price)?;
    validate_price("sale_price", product.sale_price)?;
    validate_packaging_ratio("pieces_per_pack", product.pieces_per_pack)?;
    validate_packaging_ratio("packs_per_carton", product.packs_per_carton)?;
    Ok(())
}

/// Validates a bundle and its recipe.
///
/// ## Rules
/// - Id and name required
/// - Sale price non-negative
/// - Every component requires at least one piece and at most
///   [`MAX_MOVEMENT_QUANTITY`]
/// - A product appears at most once in the recipe
pub fn validate_bundle(bundle: &Bundle) -> ValidationResult<()> {
    validate_id("bundle id", &bundle.id)?;
    validate_product_name(&bundle.name)?;
    validate_price("sale_price", bundle.sale_price)?;

    let mut seen = HashSet::with_capacity(bundle.components.len());
    for component in &bundle.components {
        validate_id("component product id", &component.product_id)?;

        if component.required_quantity == 0 {
            return Err(ValidationError::MustBePositive {
                field: format!("required quantity of {}", component.product_id),
            });
        }

        if component.required_quantity > MAX_MOVEMENT_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: format!("required quantity of {}", component.product_id),
                min: 1,
                max: MAX_MOVEMENT_QUANTITY as i64,
            });
        }

        if !seen.insert(component.product_id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "component product".to_string(),
                value: component.product_id.clone(),
            });
        }
    }

    Ok(())
}

/// Validates a recorded delivery.
pub fn validate_stock_in(delivery: &StockIn) -> ValidationResult<()> {
    validate_id("product id", &delivery.product_id)?;
    validate_quantity(delivery.quantity)?;
    validate_price("purchase_price", delivery.purchase_price)?;
    Ok(())
}

/// Validates a recorded shipment.
pub fn validate_stock_out(shipment: &StockOut) -> ValidationResult<()> {
    validate_id("item id", &shipment.item_id)?;
    validate_quantity(shipment.quantity)?;
    validate_price("sale_price", shipment.sale_price)?;
    validate_price("additional_cost", shipment.additional_cost)?;
    Ok(())
}

/// Validates the quantity of a sale line.
///
/// Which item the line references is not checked here. Lines with neither or
/// both references are reported by the margin aggregation instead.
pub fn validate_sale_line(line: &SaleLineItem) -> ValidationResult<()> {
    validate_quantity(line.quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================
