//! # Dashboard Metrics
//!
//! Headline numbers, best sellers and the monthly stock-flow series shown on
//! the overview screen.
//!
//! ## Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog ──► total_products, total_stock, asset value, low stock count │
//! │                                                                         │
//! │  Ledger (period) ──► stock in / stock out quantities                   │
//! │                                                                         │
//! │  Sale lines (period) ──► margin::aggregate ──► revenue, profit         │
//! │                                                                         │
//! │  Ledger (all) ──► top_products  (bundle sales expand to components)    │
//! │  Ledger (year) ──► stock_flow   (12 monthly buckets)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{Catalog, CatalogLookup};
use crate::margin::{aggregate_period, ReportPeriod};
use crate::money::Money;
use crate::movement::Ledger;
use crate::stock::low_stock;
use crate::types::{ItemKind, SaleLineItem};

// =============================================================================
// Headline Metrics
// =============================================================================

/// Overview numbers for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardMetrics {
    pub period: ReportPeriod,
    pub total_products: usize,
    /// Pieces on hand across all products.
    pub total_stock: u64,
    /// Stock valued at purchase price.
    pub total_asset_value: Money,
    pub low_stock_count: usize,
    /// Pieces received in the period.
    pub stock_in_quantity: u64,
    /// Quantity shipped in the period, as recorded (bundles count as bundles).
    pub stock_out_quantity: u64,
    pub revenue: Money,
    pub profit: Money,
}

impl DashboardMetrics {
    /// Computes the overview for `period`.
    ///
    /// Revenue and profit come from `sales`, the same lines the margin
    /// report uses, so both screens agree. Lines outside `period` are
    /// skipped. Stock figures reflect the snapshot, not the period end.
    pub fn compute(
        catalog: &Catalog,
        ledger: &Ledger,
        sales: &[SaleLineItem],
        period: ReportPeriod,
    ) -> Self {
        let products = catalog.products();
        let report = aggregate_period(sales, catalog, period);

        DashboardMetrics {
            period,
            total_products: products.len(),
            total_stock: saturating_total(products.iter().map(|p| p.stock)),
            total_asset_value: products.iter().map(|p| p.asset_value()).sum(),
            low_stock_count: low_stock(catalog).len(),
            stock_in_quantity: saturating_total(ledger.stock_in_within(period).map(|s| s.quantity)),
            stock_out_quantity: saturating_total(
                ledger.stock_out_within(period).map(|s| s.quantity),
            ),
            revenue: report.totals.total_revenue,
            profit: report.totals.total_realized_profit,
        }
    }
}

fn saturating_total(quantities: impl Iterator<Item = u64>) -> u64 {
    quantities.fold(0, u64::saturating_add)
}

// =============================================================================
// Top Products
// =============================================================================

/// A best-selling product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    /// Pieces shipped, including pieces inside sold bundles.
    pub sold: u64,
}

/// Ranks products by pieces shipped, most first, ties by name.
///
/// Bundle shipments count every component piece they consumed. Bundles no
/// longer in the catalog contribute nothing.
pub fn top_products(catalog: &Catalog, ledger: &Ledger, limit: usize) -> Vec<TopProduct> {
    let mut sold: HashMap<&str, u64> = HashMap::new();

    for out in &ledger.stock_out {
        match out.kind {
            ItemKind::Product => {
                let entry = sold.entry(out.item_id.as_str()).or_insert(0);
                *entry = entry.saturating_add(out.quantity);
            }
            ItemKind::Bundle => {
                let Some(bundle) = catalog.bundle(&out.item_id) else {
                    continue;
                };
                for component in &bundle.components {
                    let pieces = component.required_quantity.saturating_mul(out.quantity);
                    let entry = sold.entry(component.product_id.as_str()).or_insert(0);
                    *entry = entry.saturating_add(pieces);
                }
            }
        }
    }

    let mut ranked: Vec<TopProduct> = sold
        .into_iter()
        .filter(|(_, pieces)| *pieces > 0)
        .map(|(id, pieces)| TopProduct {
            product_id: id.to_string(),
            name: catalog.product_name(id).to_string(),
            sold: pieces,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.sold
            .cmp(&a.sold)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}

// =============================================================================
// Stock Flow
// =============================================================================

/// Stock moved in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyFlow {
    /// 1 = January.
    pub month: u32,
    pub stock_in: u64,
    pub stock_out: u64,
}

/// Twelve monthly buckets of stock in and stock out for `year` (UTC).
pub fn stock_flow(ledger: &Ledger, year: i32) -> Vec<MonthlyFlow> {
    let mut months: Vec<MonthlyFlow> = (1..=12)
        .map(|month| MonthlyFlow {
            month,
            ..Default::default()
        })
        .collect();

    for delivery in &ledger.stock_in {
        if delivery.received_at.year() == year {
            let bucket = &mut months[delivery.received_at.month0() as usize];
            bucket.stock_in = bucket.stock_in.saturating_add(delivery.quantity);
        }
    }

    for out in &ledger.stock_out {
        if out.shipped_at.year() == year {
            let bucket = &mut months[out.shipped_at.month0() as usize];
            bucket.stock_out = bucket.stock_out.saturating_add(out.quantity);
        }
    }

    months
}

// =============================================================================
// Unit Tests
// =============================================================================
