//! # Catalog Snapshot
//!
//! An immutable, indexed copy of the catalog as fetched from the backend.
//!
//! ## Snapshot Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Backend query (products, bundles, suppliers)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogSnapshot (plain lists, serde)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Catalog::new() ← validates rows, builds id indexes                    │
//! │       │                                                                 │
//! │       ├──► bundle::evaluate(.., &catalog.stock_levels())               │
//! │       ├──► margin::aggregate(.., &catalog)                             │
//! │       └──► dashboard / stock checks                                    │
//! │                                                                         │
//! │  Callers re-fetch a fresh snapshot before any mutating stock action.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bundle::{self, BundleAvailability};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Bundle, Product, Supplier};
use crate::validation::{validate_bundle, validate_product};

// =============================================================================
// Lookup Trait
// =============================================================================

/// Key-based lookup the calculators need from a catalog store.
///
/// [`Catalog`] is the in-memory implementation. Anything that can answer
/// these two questions (a cache, a test fixture) can stand in for it.
pub trait CatalogLookup {
    /// Looks up a product by id.
    fn product(&self, id: &str) -> Option<&Product>;

    /// Looks up a bundle by id.
    fn bundle(&self, id: &str) -> Option<&Bundle>;
}

// =============================================================================
// Snapshot
// =============================================================================

/// Raw catalog lists as delivered by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub bundles: Vec<Bundle>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Validated, indexed catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    bundles: Vec<Bundle>,
    suppliers: Vec<Supplier>,
    product_index: HashMap<String, usize>,
    bundle_index: HashMap<String, usize>,
}

impl Catalog {
    /// Validates every row and builds the id indexes.
    ///
    /// ## Errors
    /// - `Validation` for the first invalid product or bundle
    /// - `Validation(Duplicate)` when two products or two bundles share an id
    ///
    /// Bundle components pointing at unknown products are accepted. The
    /// calculators read them as zero stock and zero cost.
    pub fn new(snapshot: CatalogSnapshot) -> CoreResult<Self> {
        let CatalogSnapshot {
            products,
            bundles,
            suppliers,
        } = snapshot;

        let mut product_index = HashMap::with_capacity(products.len());
        for (i, product) in products.iter().enumerate() {
            validate_product(product)?;
            if product_index.insert(product.id.clone(), i).is_some() {
                return Err(duplicate("product id", &product.id));
            }
        }

        let mut bundle_index = HashMap::with_capacity(bundles.len());
        for (i, bundle) in bundles.iter().enumerate() {
            validate_bundle(bundle)?;
            if bundle_index.insert(bundle.id.clone(), i).is_some() {
                return Err(duplicate("bundle id", &bundle.id));
            }
        }

        Ok(Catalog {
            products,
            bundles,
            suppliers,
            product_index,
            bundle_index,
        })
    }

    /// All products, in snapshot order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All bundles, in snapshot order.
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// Finds a supplier by id.
    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    /// Current stock per product id, in pieces.
    pub fn stock_levels(&self) -> HashMap<String, u64> {
        self.products
            .iter()
            .map(|p| (p.id.clone(), p.stock))
            .collect()
    }

    /// Availability of one bundle against current stock.
    ///
    /// ## Errors
    /// `BundleNotFound` if the id is not in the snapshot.
    pub fn bundle_availability(&self, bundle_id: &str) -> CoreResult<BundleAvailability> {
        let bundle = self
            .bundle(bundle_id)
            .ok_or_else(|| CoreError::BundleNotFound(bundle_id.to_string()))?;
        Ok(bundle::evaluate(&bundle.components, &self.stock_levels()))
    }

    /// Display name for a product id, or the id itself when unknown.
    pub fn product_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.product(id).map(|p| p.name.as_str()).unwrap_or(id)
    }
}

impl CatalogLookup for Catalog {
    fn product(&self, id: &str) -> Option<&Product> {
        self.product_index.get(id).map(|i| &self.products[*i])
    }

    fn bundle(&self, id: &str) -> Option<&Bundle> {
        self.bundle_index.get(id).map(|i| &self.bundles[*i])
    }
}

fn duplicate(field: &str, value: &str) -> CoreError {
    ValidationError::Duplicate {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================
