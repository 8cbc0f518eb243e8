//! # Bundle Availability
//!
//! Answers "can I assemble this bundle right now, and at most how many".
//!
//! ## Bottleneck Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Goodiebag: 2 × A, 1 × B          Stock: A = 10, B = 3                 │
//! │                                                                         │
//! │    A: floor(10 / 2) = 5 bundles                                        │
//! │    B: floor( 3 / 1) = 3 bundles  ◄── scarcest ingredient               │
//! │                                                                         │
//! │    max_assemblable = min(5, 3) = 3, limited by B                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A component whose product is missing from the stock map counts as zero
//! stock, so the bundle shows as unavailable rather than failing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::BundleComponent;

// =============================================================================
// Availability
// =============================================================================

/// Result of evaluating a bundle recipe against current stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BundleAvailability {
    /// Every component has at least its required quantity in stock.
    pub available: bool,
    /// The component that caps `max_assemblable` (first one on ties).
    pub limiting_product_id: Option<String>,
    /// How many bundles current stock can produce.
    pub max_assemblable: u64,
}

/// Evaluates a bundle recipe against a stock snapshot.
///
/// An empty recipe is trivially available and produces nothing:
/// `{ available: true, limiting_product_id: None, max_assemblable: 0 }`.
///
/// ## Example
/// ```rust
/// use std::collections::HashMap;
/// use stokpro_core::bundle::evaluate;
/// use stokpro_core::types::BundleComponent;
///
/// let components = vec![BundleComponent::new("A", 2), BundleComponent::new("B", 1)];
/// let stock = HashMap::from([("A".to_string(), 10), ("B".to_string(), 3)]);
///
/// let result = evaluate(&components, &stock);
/// assert!(result.available);
/// assert_eq!(result.max_assemblable, 3);
/// assert_eq!(result.limiting_product_id.as_deref(), Some("B"));
/// ```
pub fn evaluate(
    components: &[BundleComponent],
    current_stock: &HashMap<String, u64>,
) -> BundleAvailability {
    let mut available = true;
    let mut limit: Option<(&str, u64)> = None;

    for component in components {
        let stock = stock_of(current_stock, &component.product_id);
        if stock < component.required_quantity {
            available = false;
        }

        // Validated recipes never hold 0; treat one as producing nothing
        let possible = stock
            .checked_div(component.required_quantity)
            .unwrap_or(0);

        if limit.map_or(true, |(_, current)| possible < current) {
            limit = Some((&component.product_id, possible));
        }
    }

    BundleAvailability {
        available,
        limiting_product_id: limit.map(|(id, _)| id.to_string()),
        max_assemblable: limit.map_or(0, |(_, max)| max),
    }
}

// =============================================================================
// Shortages
// =============================================================================

/// A component that does not have enough stock for one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComponentShortage {
    pub product_id: String,
    pub required: u64,
    pub in_stock: u64,
}

/// Lists every component short of its per-bundle requirement, in recipe order.
pub fn shortages(
    components: &[BundleComponent],
    current_stock: &HashMap<String, u64>,
) -> Vec<ComponentShortage> {
    components
        .iter()
        .filter_map(|component| {
            let in_stock = stock_of(current_stock, &component.product_id);
            (in_stock < component.required_quantity).then(|| ComponentShortage {
                product_id: component.product_id.clone(),
                required: component.required_quantity,
                in_stock,
            })
        })
        .collect()
}

// =============================================================================
// Component Demand
// =============================================================================

/// Pieces of each product consumed by assembling `bundle_count` bundles.
///
/// Products listed more than once in the recipe are summed. Output keeps the
/// order of first appearance.
///
/// ## Errors
/// `QuantityOverflow` when a demand does not fit in a `u64`.
pub fn component_demand(
    components: &[BundleComponent],
    bundle_count: u64,
) -> CoreResult<Vec<(String, u64)>> {
    let overflow = || CoreError::QuantityOverflow {
        context: "bundle component demand",
    };

    let mut demand: Vec<(String, u64)> = Vec::with_capacity(components.len());
    for component in components {
        let pieces = component
            .required_quantity
            .checked_mul(bundle_count)
            .ok_or_else(overflow)?;

        match demand.iter_mut().find(|(id, _)| *id == component.product_id) {
            Some((_, total)) => *total = total.checked_add(pieces).ok_or_else(overflow)?,
            None => demand.push((component.product_id.clone(), pieces)),
        }
    }
    Ok(demand)
}

fn stock_of(current_stock: &HashMap<String, u64>, product_id: &str) -> u64 {
    current_stock.get(product_id).copied().unwrap_or(0)
}

// =============================================================================
// Unit Tests
// =============================================================================
