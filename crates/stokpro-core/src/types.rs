//! # Domain Types
//!
//! Catalog and sales types consumed by the calculators.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Bundle      │   │  SaleLineItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  components[]   │   │  product_id?    │       │
//! │  │  stock (pcs)    │   │  sale_price     │   │  bundle_id?     │       │
//! │  │  purchase_price │   │  category       │   │  quantity       │       │
//! │  │  sale_price     │   └─────────────────┘   │  revenue        │       │
//! │  │  ratios         │                         └─────────────────┘       │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ BundleComponent │   │    Supplier     │                             │
//! │  │  product_id     │   │  name, contact  │                             │
//! │  │  required_qty   │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of these are read-only projections of rows owned by the hosted
//! backend. Nothing in this crate creates or mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::units::{from_pieces, PackagingRatios, StockBreakdown};

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Backend row identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-form category ("Snack", "Biskuit", ...).
    #[serde(default)]
    pub category: String,

    /// Default supplier, if any.
    #[serde(default)]
    pub supplier_id: Option<String>,

    /// Current stock in pieces.
    pub stock: u64,

    /// Restock threshold in pieces.
    #[serde(default)]
    pub min_stock: u64,

    /// Purchase (cost) price per piece.
    pub purchase_price: Money,

    /// Sale price per piece.
    pub sale_price: Money,

    /// Pieces in one pack. `None` or `0` when packs are not offered.
    #[serde(default)]
    pub pieces_per_pack: Option<u32>,

    /// Packs in one carton. `None` or `0` when cartons are not offered.
    #[serde(default)]
    pub packs_per_carton: Option<u32>,
}

impl Product {
    /// Returns the packaging ratios.
    #[inline]
    pub fn ratios(&self) -> PackagingRatios {
        PackagingRatios::new(self.pieces_per_pack, self.packs_per_carton)
    }

    /// Current stock decomposed into cartons, packs and pieces.
    pub fn stock_breakdown(&self) -> StockBreakdown {
        from_pieces(self.stock, self.ratios())
    }

    /// Sale price minus purchase price, per piece.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.sale_price - self.purchase_price
    }

    /// Stock valued at purchase price.
    #[inline]
    pub fn asset_value(&self) -> Money {
        self.purchase_price.multiply_quantity(self.stock)
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// Bundle category as sold in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BundleCategory {
    /// Gift hampers.
    Hampers,
    /// Party goodie bags.
    #[default]
    Goodiebag,
}

/// One line of a bundle recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BundleComponent {
    pub product_id: String,
    /// Pieces consumed per assembled bundle. Always > 0 once validated.
    pub required_quantity: u64,
}

impl BundleComponent {
    pub fn new(product_id: impl Into<String>, required_quantity: u64) -> Self {
        BundleComponent {
            product_id: product_id.into(),
            required_quantity,
        }
    }
}

/// A sellable fixed recipe of component products.
///
/// The bundle has no stored cost. Cost is derived from component purchase
/// prices every time it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bundle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: BundleCategory,
    pub sale_price: Money,
    #[serde(default)]
    pub components: Vec<BundleComponent>,
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier of stock-in deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// Whether a sold item is a product or a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Product,
    Bundle,
}

/// A validated reference to exactly one sold item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: String,
}

/// A completed sale line as recorded by the backend.
///
/// ## Shape
/// The backend stores two nullable foreign keys. Exactly one must be set;
/// [`SaleLineItem::item_ref`] enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineItem {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub bundle_id: Option<String>,
    /// Pieces for products, bundle count for bundles.
    pub quantity: u64,
    /// Revenue actually recorded for the line (after discounts and extra costs).
    pub revenue: Money,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
}

impl SaleLineItem {
    /// A line selling a standalone product.
    pub fn for_product(
        product_id: impl Into<String>,
        quantity: u64,
        revenue: Money,
        sold_at: DateTime<Utc>,
    ) -> Self {
        SaleLineItem {
            product_id: Some(product_id.into()),
            bundle_id: None,
            quantity,
            revenue,
            sold_at,
        }
    }

    /// A line selling a bundle.
    pub fn for_bundle(
        bundle_id: impl Into<String>,
        quantity: u64,
        revenue: Money,
        sold_at: DateTime<Utc>,
    ) -> Self {
        SaleLineItem {
            product_id: None,
            bundle_id: Some(bundle_id.into()),
            quantity,
            revenue,
            sold_at,
        }
    }

    /// Resolves the line to exactly one item.
    ///
    /// ## Errors
    /// `MalformedLineItem` when neither or both references are set.
    /// `index` is the line's position in the caller's input, carried into
    /// the error for reporting.
    pub fn item_ref(&self, index: usize) -> CoreResult<ItemRef> {
        match (&self.product_id, &self.bundle_id) {
            (Some(id), None) => Ok(ItemRef {
                kind: ItemKind::Product,
                id: id.clone(),
            }),
            (None, Some(id)) => Ok(ItemRef {
                kind: ItemKind::Bundle,
                id: id.clone(),
            }),
            (Some(_), Some(_)) => Err(CoreError::MalformedLineItem {
                index,
                reason: "references both a product and a bundle".to_string(),
            }),
            (None, None) => Err(CoreError::MalformedLineItem {
                index,
                reason: "references neither a product nor a bundle".to_string(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
