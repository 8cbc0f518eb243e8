//! # stokpro-core: Pure Inventory Calculations for StokPro
//!
//! This crate holds the business logic of StokPro as pure functions with
//! zero I/O dependencies. Persistence, authentication and notifications are
//! owned by the hosted backend; this crate only computes over snapshots of
//! its data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StokPro Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Hosted backend (rows, auth, realtime)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON snapshot                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stokpro CLI / frontend bindings                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stokpro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────────────┐   │   │
//! │  │   │  units  │  │ bundle  │  │ margin  │  │ stock/dashboard │   │   │
//! │  │   │ pcs/pack│  │ max qty │  │ profit  │  │ alerts, charts  │   │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Piece / pack / carton conversion
//! - [`bundle`] - Bundle availability and component demand
//! - [`margin`] - Margin and realized-profit aggregation
//! - [`stock`] - Low-stock alerts and stock-out guards
//! - [`dashboard`] - Overview metrics, best sellers, monthly flow
//! - [`catalog`] - Indexed catalog snapshot
//! - [`movement`] - Stock-in / stock-out records
//! - [`types`] - Domain types (Product, Bundle, SaleLineItem, ...)
//! - [`money`] - Integer money
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot in, same result out
//! 2. **No I/O**: file system, database and network access are forbidden here
//! 3. **Pieces Everywhere**: stock is stored and computed in pieces; packs
//!    and cartons exist only at the edges
//! 4. **Integer Money**: amounts are whole rupiah (i64), never floats
//!
//! ## Example Usage
//!
//! ```rust
//! use stokpro_core::units::{from_pieces, to_pieces, PackagingRatios, Unit};
//!
//! // 12 pieces per pack, 10 packs per carton
//! let ratios = PackagingRatios::new(Some(12), Some(10));
//!
//! assert_eq!(to_pieces(2, Unit::Carton, ratios).unwrap(), 240);
//!
//! let breakdown = from_pieces(145, ratios);
//! assert_eq!(breakdown.to_string(), "1 Dus, 2 Pack, 1 Pcs");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bundle;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod margin;
pub mod money;
pub mod movement;
pub mod stock;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, CatalogLookup, CatalogSnapshot};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use movement::{Ledger, StockIn, StockOut};
pub use types::*;
pub use units::{PackagingRatios, StockBreakdown, Unit, UnitLabels};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity accepted for a single stock movement, in pieces.
///
/// ## Business Reason
/// Catches typos such as an extra zero on a carton count before they reach
/// the backend.
pub const MAX_MOVEMENT_QUANTITY: u64 = 1_000_000;

/// Largest on-hand stock or restock threshold accepted for a product, in pieces.
///
/// ## Business Reason
/// Stock × purchase price must stay well inside `i64` rupiah for asset
/// values to be meaningful.
pub const MAX_STOCK_LEVEL: u64 = 1_000_000_000;

/// Largest pieces-per-pack or packs-per-carton ratio accepted.
pub const MAX_PACKAGING_RATIO: u32 = 10_000;

/// Number of best sellers shown on the dashboard by default.
pub const DEFAULT_TOP_PRODUCTS: usize = 5;
