//! # Stock Movements
//!
//! Stock-in deliveries and stock-out shipments as recorded by the backend.
//!
//! ```text
//! Supplier ──► StockIn  (+pieces, purchase price)  ──┐
//!                                                     ├──► Ledger
//! Customer ◄── StockOut (−pieces or bundles, revenue) ┘        │
//!                                                              ▼
//!                                               SaleLineItem[] ──► margin
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::margin::ReportPeriod;
use crate::money::Money;
use crate::types::{ItemKind, SaleLineItem};

// =============================================================================
// Stock In
// =============================================================================

/// A delivery received from a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockIn {
    #[serde(default)]
    pub id: String,
    pub product_id: String,
    #[serde(default)]
    pub supplier_id: Option<String>,
    /// Pieces received.
    pub quantity: u64,
    /// Purchase price per piece on this delivery.
    pub purchase_price: Money,
    #[ts(as = "String")]
    pub received_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

impl StockIn {
    /// Quantity × purchase price.
    pub fn total_cost(&self) -> Money {
        self.purchase_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Stock Out
// =============================================================================

/// A shipment to a customer, of either a product or a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockOut {
    #[serde(default)]
    pub id: String,
    pub kind: ItemKind,
    pub item_id: String,
    /// Pieces for products, bundle count for bundles.
    pub quantity: u64,
    /// Sale price per piece or per bundle on this shipment.
    pub sale_price: Money,
    /// Shipping, packaging and similar costs borne by the shop.
    #[serde(default)]
    pub additional_cost: Money,
    #[ts(as = "String")]
    pub shipped_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

impl StockOut {
    /// Quantity × sale price.
    pub fn subtotal(&self) -> Money {
        self.sale_price.multiply_quantity(self.quantity)
    }

    /// Subtotal minus additional cost.
    pub fn revenue(&self) -> Money {
        self.subtotal() - self.additional_cost
    }

    /// The sale line this shipment records.
    pub fn to_sale_line(&self) -> SaleLineItem {
        match self.kind {
            ItemKind::Product => SaleLineItem::for_product(
                self.item_id.clone(),
                self.quantity,
                self.revenue(),
                self.shipped_at,
            ),
            ItemKind::Bundle => SaleLineItem::for_bundle(
                self.item_id.clone(),
                self.quantity,
                self.revenue(),
                self.shipped_at,
            ),
        }
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Stock movements loaded alongside a catalog snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub stock_in: Vec<StockIn>,
    #[serde(default)]
    pub stock_out: Vec<StockOut>,
}

impl Ledger {
    /// Deliveries received within `period`.
    pub fn stock_in_within(&self, period: ReportPeriod) -> impl Iterator<Item = &StockIn> + '_ {
        self.stock_in
            .iter()
            .filter(move |s| period.contains(s.received_at))
    }

    /// Shipments made within `period`.
    pub fn stock_out_within(&self, period: ReportPeriod) -> impl Iterator<Item = &StockOut> + '_ {
        self.stock_out
            .iter()
            .filter(move |s| period.contains(s.shipped_at))
    }

    /// Every shipment as a sale line, in ledger order.
    pub fn sale_lines(&self) -> Vec<SaleLineItem> {
        self.stock_out.iter().map(StockOut::to_sale_line).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn shipment(kind: ItemKind, day: u32) -> StockOut {
        StockOut {
            id: format!("out-{day}"),
            kind,
            item_id: "item-1".to_string(),
            quantity: 4,
            sale_price: Money::from_amount(25_000),
            additional_cost: Money::from_amount(10_000),
            shipped_at: Utc.with_ymd_and_hms(2024, 12, day, 9, 0, 0).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_stock_in_total_cost() {
        let delivery = StockIn {
            id: "in-1".to_string(),
            product_id: "prod-1".to_string(),
            supplier_id: Some("sup-1".to_string()),
            quantity: 120,
            purchase_price: Money::from_amount(2_500),
            received_at: Utc::now(),
            notes: "Restock".to_string(),
        };
        assert_eq!(delivery.total_cost().amount(), 300_000);
    }

    #[test]
    fn test_stock_out_revenue_subtracts_additional_cost() {
        let out = shipment(ItemKind::Bundle, 3);
        assert_eq!(out.subtotal().amount(), 100_000);
        assert_eq!(out.revenue().amount(), 90_000);

        let line = out.to_sale_line();
        assert_eq!(line.bundle_id.as_deref(), Some("item-1"));
        assert!(line.product_id.is_none());
        assert_eq!(line.revenue.amount(), 90_000);
        assert_eq!(line.quantity, 4);
    }

    #[test]
    fn test_ledger_period_filter() {
        let ledger = Ledger {
            stock_in: vec![],
            stock_out: vec![shipment(ItemKind::Product, 1), shipment(ItemKind::Product, 31)],
        };
        let period = ReportPeriod::new(
            Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
        )
        .unwrap();

        let ids: Vec<&str> = ledger.stock_out_within(period).map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["out-1"]);
        assert_eq!(ledger.sale_lines().len(), 2);
    }

    #[test]
    fn test_stock_out_deserializes_with_defaults() {
        let json = r#"{
            "kind": "product",
            "item_id": "prod-1",
            "quantity": 3,
            "sale_price": 5000,
            "shipped_at": "2024-12-05T08:00:00Z"
        }"#;
        let out: StockOut = serde_json::from_str(json).unwrap();
        assert_eq!(out.additional_cost, Money::zero());
        assert_eq!(out.revenue().amount(), 15_000);
    }
}
