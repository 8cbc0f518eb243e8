//! # Stock Levels
//!
//! Restock alerts and stock-out guards.
//!
//! ## Status Thresholds
//! ```text
//!   stock  <  min_stock   ──► Critical   (red)
//!   stock  == min_stock   ──► Low        (amber)
//!   stock  >  min_stock   ──► Healthy
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bundle::{component_demand, shortages};
use crate::catalog::{Catalog, CatalogLookup};
use crate::error::{CoreError, CoreResult};
use crate::types::{Bundle, Product};

// =============================================================================
// Alerts
// =============================================================================

/// Where a product sits relative to its restock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Healthy,
    Low,
    Critical,
}

impl StockStatus {
    /// Whether the product belongs on the restock list.
    pub fn needs_restock(&self) -> bool {
        !matches!(self, StockStatus::Healthy)
    }
}

/// One row of the low-stock alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockAlert {
    pub product_id: String,
    pub name: String,
    pub stock: u64,
    pub min_stock: u64,
    pub status: StockStatus,
    /// Stock as a share of the threshold, capped at 100.
    pub fill_percent: f64,
}

/// Assesses one product against its threshold.
///
/// ## Example
/// ```rust
/// use stokpro_core::money::Money;
/// use stokpro_core::stock::{assess, StockStatus};
/// use stokpro_core::types::Product;
///
/// let product = Product {
///     id: "p1".into(),
///     name: "Nabati".into(),
///     category: String::new(),
///     supplier_id: None,
///     stock: 5,
///     min_stock: 20,
///     purchase_price: Money::from_amount(2_000),
///     sale_price: Money::from_amount(3_500),
///     pieces_per_pack: None,
///     packs_per_carton: None,
/// };
///
/// let alert = assess(&product);
/// assert_eq!(alert.status, StockStatus::Critical);
/// assert_eq!(alert.fill_percent, 25.0);
/// ```
pub fn assess(product: &Product) -> StockAlert {
    let status = match product.stock.cmp(&product.min_stock) {
        std::cmp::Ordering::Greater => StockStatus::Healthy,
        std::cmp::Ordering::Equal => StockStatus::Low,
        std::cmp::Ordering::Less => StockStatus::Critical,
    };

    let fill_percent = if product.min_stock == 0 {
        100.0
    } else {
        (product.stock as f64 / product.min_stock as f64 * 100.0).min(100.0)
    };

    StockAlert {
        product_id: product.id.clone(),
        name: product.name.clone(),
        stock: product.stock,
        min_stock: product.min_stock,
        status,
        fill_percent,
    }
}

/// Alerts for every product at or below its threshold, in catalog order.
pub fn low_stock(catalog: &Catalog) -> Vec<StockAlert> {
    catalog
        .products()
        .iter()
        .map(assess)
        .filter(|alert| alert.status.needs_restock())
        .collect()
}

// =============================================================================
// Stock-Out Guards
// =============================================================================

/// Checks that a product can ship `requested` pieces.
///
/// ## Errors
/// `InsufficientStock` when `requested` exceeds current stock.
pub fn check_stock_out(product: &Product, requested: u64) -> CoreResult<()> {
    if requested > product.stock {
        return Err(CoreError::InsufficientStock {
            product_id: product.id.clone(),
            available: product.stock,
            requested,
        });
    }
    Ok(())
}

/// Checks that `count` bundles can ship from current component stock.
///
/// ## Errors
/// - `InsufficientStock` naming the first component that falls short
/// - `QuantityOverflow` when the component demand does not fit in a `u64`
pub fn check_bundle_stock_out(
    bundle: &Bundle,
    count: u64,
    current_stock: &HashMap<String, u64>,
) -> CoreResult<()> {
    let demand = component_demand(&bundle.components, count)?;

    for (product_id, requested) in demand {
        let available = current_stock.get(&product_id).copied().unwrap_or(0);
        if requested > available {
            return Err(CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            });
        }
    }
    Ok(())
}

/// Checks a shipment of `requested` pieces of the product with `product_id`.
///
/// ## Errors
/// - `ProductNotFound` if the id is not in the catalog
/// - `InsufficientStock` as for [`check_stock_out`]
pub fn check_product_shipment(
    catalog: &Catalog,
    product_id: &str,
    requested: u64,
) -> CoreResult<()> {
    let product = catalog
        .product(product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
    check_stock_out(product, requested)
}

/// Checks a shipment of `count` bundles with `bundle_id`.
///
/// ## Errors
/// - `BundleNotFound` if the id is not in the catalog
/// - `InsufficientStock` / `QuantityOverflow` as for [`check_bundle_stock_out`]
pub fn check_bundle_shipment(catalog: &Catalog, bundle_id: &str, count: u64) -> CoreResult<()> {
    let bundle = catalog
        .bundle(bundle_id)
        .ok_or_else(|| CoreError::BundleNotFound(bundle_id.to_string()))?;
    check_bundle_stock_out(bundle, count, &catalog.stock_levels())
}

/// Component ids that cannot cover even a single bundle.
pub fn blocking_components(bundle: &Bundle, current_stock: &HashMap<String, u64>) -> Vec<String> {
    shortages(&bundle.components, current_stock)
        .into_iter()
        .map(|s| s.product_id)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSnapshot;
    use crate::money::Money;
    use crate::types::{BundleCategory, BundleComponent};

    fn product(id: &str, stock: u64, min_stock: u64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            category: "Snack".to_string(),
            supplier_id: None,
            stock,
            min_stock,
            purchase_price: Money::from_amount(2_000),
            sale_price: Money::from_amount(3_000),
            pieces_per_pack: None,
            packs_per_carton: None,
        }
    }

    fn hampers() -> Bundle {
        Bundle {
            id: "bun-1".to_string(),
            name: "Hampers".to_string(),
            category: BundleCategory::Hampers,
            sale_price: Money::from_amount(100_000),
            components: vec![BundleComponent::new("A", 2), BundleComponent::new("B", 1)],
        }
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(assess(&product("p", 21, 20)).status, StockStatus::Healthy);
        assert_eq!(assess(&product("p", 20, 20)).status, StockStatus::Low);
        assert_eq!(assess(&product("p", 19, 20)).status, StockStatus::Critical);
    }

    #[test]
    fn test_fill_percent() {
        assert_eq!(assess(&product("p", 10, 40)).fill_percent, 25.0);
        assert_eq!(assess(&product("p", 90, 40)).fill_percent, 100.0);
        assert_eq!(assess(&product("p", 0, 0)).fill_percent, 100.0);
    }

    #[test]
    fn test_low_stock_keeps_catalog_order() {
        let catalog = Catalog::new(CatalogSnapshot {
            products: vec![
                product("a", 5, 10),
                product("b", 50, 10),
                product("c", 10, 10),
            ],
            ..Default::default()
        })
        .unwrap();

        let ids: Vec<String> = low_stock(&catalog).into_iter().map(|a| a.product_id).collect();
        assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_check_stock_out() {
        let p = product("p", 3, 0);
        assert!(check_stock_out(&p, 3).is_ok());
        assert_eq!(
            check_stock_out(&p, 5),
            Err(CoreError::InsufficientStock {
                product_id: "p".to_string(),
                available: 3,
                requested: 5,
            })
        );
    }

    #[test]
    fn test_check_bundle_stock_out() {
        let stock: HashMap<String, u64> =
            HashMap::from([("A".to_string(), 10), ("B".to_string(), 3)]);

        assert!(check_bundle_stock_out(&hampers(), 3, &stock).is_ok());
        assert_eq!(
            check_bundle_stock_out(&hampers(), 4, &stock),
            Err(CoreError::InsufficientStock {
                product_id: "B".to_string(),
                available: 3,
                requested: 4,
            })
        );
    }

    #[test]
    fn test_check_bundle_missing_component_is_zero_stock() {
        let stock: HashMap<String, u64> = HashMap::from([("A".to_string(), 10)]);
        assert!(matches!(
            check_bundle_stock_out(&hampers(), 1, &stock),
            Err(CoreError::InsufficientStock { available: 0, .. })
        ));
        assert_eq!(blocking_components(&hampers(), &stock), vec!["B".to_string()]);
    }

    #[test]
    fn test_shipment_checks_by_id() {
        let catalog = Catalog::new(CatalogSnapshot {
            products: vec![product("A", 10, 0), product("B", 3, 0)],
            bundles: vec![hampers()],
            ..Default::default()
        })
        .unwrap();

        assert!(check_product_shipment(&catalog, "A", 10).is_ok());
        assert!(matches!(
            check_product_shipment(&catalog, "A", 11),
            Err(CoreError::InsufficientStock { available: 10, .. })
        ));
        assert_eq!(
            check_product_shipment(&catalog, "ghost", 1),
            Err(CoreError::ProductNotFound("ghost".to_string()))
        );

        assert!(check_bundle_shipment(&catalog, "bun-1", 3).is_ok());
        assert!(check_bundle_shipment(&catalog, "bun-1", 4).is_err());
        assert_eq!(
            check_bundle_shipment(&catalog, "nope", 1),
            Err(CoreError::BundleNotFound("nope".to_string()))
        );
    }
}
