//! # Commands
//!
//! One function per subcommand. Each returns a serializable output that
//! [`crate::render`] turns into text or JSON.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use stokpro_core::bundle::{self, BundleAvailability, ComponentShortage};
use stokpro_core::dashboard::{self, DashboardMetrics, MonthlyFlow, TopProduct};
use stokpro_core::margin::{self, MarginReport, ReportPeriod};
use stokpro_core::stock::{self, StockAlert};
use stokpro_core::units::{self, PackagingRatios, StockBreakdown, Unit};
use stokpro_core::validation::validate_quantity;
use stokpro_core::{BundleCategory, CatalogLookup, CoreResult, ItemKind, Money};
use tracing::{info, warn};

use crate::error::CliError;
use crate::snapshot::Snapshot;

// =============================================================================
// Unit Conversion
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutput {
    pub quantity: u64,
    pub unit: Unit,
    pub pieces: u64,
    pub breakdown: StockBreakdown,
}

/// `convert`: a quantity in some unit, expressed in pieces.
pub fn convert(quantity: u64, unit: Unit, ratios: PackagingRatios) -> CoreResult<ConversionOutput> {
    validate_quantity(quantity)?;
    let pieces = units::to_pieces(quantity, unit, ratios)?;
    Ok(ConversionOutput {
        quantity,
        unit,
        pieces,
        breakdown: units::from_pieces(pieces, ratios),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownOutput {
    pub pieces: u64,
    pub breakdown: StockBreakdown,
}

/// `breakdown`: a piece count decomposed into cartons, packs and pieces.
pub fn breakdown(pieces: u64, ratios: PackagingRatios) -> BreakdownOutput {
    BreakdownOutput {
        pieces,
        breakdown: units::from_pieces(pieces, ratios),
    }
}

// =============================================================================
// Bundles
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleRow {
    pub bundle_id: String,
    pub name: String,
    pub category: BundleCategory,
    pub sale_price: Money,
    pub cost: Money,
    pub availability: BundleAvailability,
    pub shortages: Vec<ComponentShortage>,
}

/// `bundles`: availability of every bundle against current stock.
pub fn bundles(snapshot: &Snapshot) -> Vec<BundleRow> {
    let stock = snapshot.catalog.stock_levels();

    snapshot
        .catalog
        .bundles()
        .iter()
        .map(|b| BundleRow {
            bundle_id: b.id.clone(),
            name: b.name.clone(),
            category: b.category,
            sale_price: b.sale_price,
            cost: margin::bundle_cost(b, &snapshot.catalog),
            availability: bundle::evaluate(&b.components, &stock),
            shortages: bundle::shortages(&b.components, &stock),
        })
        .collect()
}

// =============================================================================
// Margin
// =============================================================================

/// Builds a period from inclusive calendar dates.
///
/// Both bounds or neither must be given.
pub fn period_from_dates(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Option<ReportPeriod>, CliError> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => {
            let end = to
                .checked_add_days(Days::new(1))
                .ok_or_else(|| CliError::invalid_argument("--to is out of range"))?;
            let start = from.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
            let end = end.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
            match (start, end) {
                (Some(start), Some(end)) => Ok(Some(ReportPeriod::new(start, end)?)),
                _ => Err(CliError::invalid_argument("invalid --from/--to dates")),
            }
        }
        _ => Err(CliError::invalid_argument(
            "--from and --to must be given together",
        )),
    }
}

/// `margin`: per-item margin and realized profit.
pub fn margin(snapshot: &Snapshot, period: Option<ReportPeriod>) -> MarginReport {
    let lines = snapshot.sale_lines();
    let report = match period {
        Some(period) => margin::aggregate_period(&lines, &snapshot.catalog, period),
        None => margin::aggregate(&lines, &snapshot.catalog),
    };

    for rejected in &report.rejected {
        warn!(index = rejected.index, reason = %rejected.reason, "Sale line excluded from report");
    }
    info!(
        items = report.lines.len(),
        rejected = report.rejected.len(),
        "Margin report built"
    );
    report
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOutput {
    pub metrics: DashboardMetrics,
    pub top_products: Vec<TopProduct>,
    pub stock_flow: Vec<MonthlyFlow>,
}

/// `dashboard`: overview for one month plus that year's stock flow.
///
/// Revenue and profit use the same sale lines as `margin`.
pub fn dashboard(
    snapshot: &Snapshot,
    year: i32,
    month: u32,
    top_limit: usize,
) -> Result<DashboardOutput, CliError> {
    let period = ReportPeriod::month(year, month)?;
    let sales = snapshot.sale_lines();
    Ok(DashboardOutput {
        metrics: DashboardMetrics::compute(&snapshot.catalog, &snapshot.ledger, &sales, period),
        top_products: dashboard::top_products(&snapshot.catalog, &snapshot.ledger, top_limit),
        stock_flow: dashboard::stock_flow(&snapshot.ledger, year),
    })
}

// =============================================================================
// Low Stock
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockRow {
    #[serde(flatten)]
    pub alert: StockAlert,
    pub breakdown: StockBreakdown,
    /// Name of the product's default supplier, for reordering.
    pub supplier: Option<String>,
}

/// `low-stock`: products at or below their restock threshold.
pub fn low_stock(snapshot: &Snapshot) -> Vec<LowStockRow> {
    let catalog = &snapshot.catalog;

    stock::low_stock(catalog)
        .into_iter()
        .map(|alert| {
            let product = catalog.product(&alert.product_id);
            let breakdown = product.map(|p| p.stock_breakdown()).unwrap_or_default();
            let supplier = product
                .and_then(|p| p.supplier_id.as_deref())
                .and_then(|id| catalog.supplier(id))
                .map(|s| s.name.clone());
            LowStockRow {
                alert,
                breakdown,
                supplier,
            }
        })
        .collect()
}

// =============================================================================
// Shipment Check
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentCheck {
    pub item_kind: ItemKind,
    pub item_id: String,
    pub name: String,
    pub quantity: u64,
}

/// `can-ship`: whether current stock covers a shipment.
///
/// A shortfall is an `INSUFFICIENT_STOCK` error naming the short product.
pub fn can_ship(
    snapshot: &Snapshot,
    kind: ItemKind,
    item_id: &str,
    quantity: u64,
) -> Result<ShipmentCheck, CliError> {
    validate_quantity(quantity).map_err(stokpro_core::CoreError::from)?;
    let catalog = &snapshot.catalog;

    let name = match kind {
        ItemKind::Product => {
            stock::check_product_shipment(catalog, item_id, quantity)?;
            catalog.product_name(item_id).to_string()
        }
        ItemKind::Bundle => {
            stock::check_bundle_shipment(catalog, item_id, quantity)?;
            catalog
                .bundle(item_id)
                .map_or_else(|| item_id.to_string(), |b| b.name.clone())
        }
    };

    info!(kind = ?kind, item_id, quantity, "Shipment covered by stock");
    Ok(ShipmentCheck {
        item_kind: kind,
        item_id: item_id.to_string(),
        name,
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use stokpro_core::CoreError;

    const SNAPSHOT: &str = r#"{
        "products": [
            { "id": "a", "name": "Astor", "stock": 10, "min_stock": 20, "supplier_id": "sup-1",
              "purchase_price": 2000, "sale_price": 3000, "pieces_per_pack": 4 },
            { "id": "b", "name": "Beng-Beng", "stock": 3, "min_stock": 1,
              "purchase_price": 1000, "sale_price": 2000 }
        ],
        "bundles": [
            { "id": "gb", "name": "Goodiebag", "sale_price": 10000,
              "components": [ { "product_id": "a", "required_quantity": 2 },
                              { "product_id": "b", "required_quantity": 1 } ] }
        ],
        "suppliers": [ { "id": "sup-1", "name": "CV Sumber Rejeki" } ],
        "stock_out": [
            { "kind": "product", "item_id": "a", "quantity": 5, "sale_price": 3000,
              "shipped_at": "2024-12-02T10:00:00Z" },
            { "kind": "bundle", "item_id": "gb", "quantity": 1, "sale_price": 10000,
              "additional_cost": 1000, "shipped_at": "2024-11-20T10:00:00Z" }
        ]
    }"#;

    fn snapshot() -> Snapshot {
        Snapshot::parse(SNAPSHOT).unwrap()
    }

    #[test]
    fn test_convert() {
        let ratios = PackagingRatios::new(Some(12), Some(10));
        let out = convert(2, Unit::Carton, ratios).unwrap();
        assert_eq!(out.pieces, 240);
        assert_eq!(out.breakdown.cartons, 2);

        assert_eq!(
            convert(1, Unit::Pack, PackagingRatios::pieces_only()),
            Err(CoreError::UnsupportedUnit { unit: Unit::Pack })
        );
        assert!(matches!(
            convert(0, Unit::Piece, ratios),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_bundles() {
        let rows = bundles(&snapshot());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cost.amount(), 5_000);
        assert_eq!(rows[0].availability.max_assemblable, 3);
        assert_eq!(rows[0].availability.limiting_product_id.as_deref(), Some("b"));
        assert!(rows[0].shortages.is_empty());
    }

    #[test]
    fn test_margin_all_time_and_period() {
        let report = margin(&snapshot(), None);
        assert_eq!(report.lines.len(), 2);
        // a: 15_000 - 5 × 2_000; gb: 9_000 - 5_000
        assert_eq!(report.totals.total_realized_profit.amount(), 9_000);

        let december = period_from_dates(
            NaiveDate::from_ymd_opt(2024, 12, 1),
            NaiveDate::from_ymd_opt(2024, 12, 31),
        )
        .unwrap();
        let report = margin(&snapshot(), december);
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.totals.total_realized_profit.amount(), 5_000);
    }

    #[test]
    fn test_period_from_dates_requires_both() {
        assert_eq!(period_from_dates(None, None).unwrap(), None);
        let err = period_from_dates(NaiveDate::from_ymd_opt(2024, 1, 1), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);

        // Single day: to is inclusive
        let day = NaiveDate::from_ymd_opt(2024, 5, 5);
        let period = period_from_dates(day, day).unwrap().unwrap();
        assert_eq!(period.end - period.start, chrono::Duration::days(1));

        let err = period_from_dates(
            NaiveDate::from_ymd_opt(2024, 5, 6),
            NaiveDate::from_ymd_opt(2024, 5, 4),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_dashboard() {
        let out = dashboard(&snapshot(), 2024, 12, 5).unwrap();
        assert_eq!(out.metrics.stock_out_quantity, 5);
        assert_eq!(out.metrics.revenue.amount(), 15_000);
        assert_eq!(out.top_products[0].name, "Astor");
        assert_eq!(out.top_products[0].sold, 7);
        assert_eq!(out.stock_flow[10].stock_out, 1);

        let err = dashboard(&snapshot(), 2024, 13, 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_dashboard_agrees_with_margin_on_exported_sales() {
        let snapshot = Snapshot::parse(
            r#"{
            "products": [
                { "id": "taro", "name": "Taro", "stock": 150, "min_stock": 10,
                  "purchase_price": 3000, "sale_price": 5000 }
            ],
            "sales": [
                { "product_id": "taro", "quantity": 20, "revenue": 100000, "sold_at": "2024-12-03T10:00:00Z" },
                { "product_id": "taro", "quantity": 30, "revenue": 140000, "sold_at": "2024-12-09T10:00:00Z" }
            ]
        }"#,
        )
        .unwrap();

        let december = period_from_dates(
            NaiveDate::from_ymd_opt(2024, 12, 1),
            NaiveDate::from_ymd_opt(2024, 12, 31),
        )
        .unwrap();
        let report = margin(&snapshot, december);
        let out = dashboard(&snapshot, 2024, 12, 5).unwrap();

        assert_eq!(report.totals.total_realized_profit.amount(), 90_000);
        assert_eq!(out.metrics.profit, report.totals.total_realized_profit);
        assert_eq!(out.metrics.revenue.amount(), 240_000);

        let november = dashboard(&snapshot, 2024, 11, 5).unwrap();
        assert!(november.metrics.revenue.is_zero());
    }

    #[test]
    fn test_low_stock() {
        let rows = low_stock(&snapshot());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].alert.product_id, "a");
        assert_eq!(rows[0].alert.fill_percent, 50.0);
        assert_eq!(rows[0].breakdown.packs, 2);
        assert_eq!(rows[0].breakdown.pieces, 2);
        assert_eq!(rows[0].supplier.as_deref(), Some("CV Sumber Rejeki"));
    }

    #[test]
    fn test_can_ship() {
        let ok = can_ship(&snapshot(), ItemKind::Product, "a", 10).unwrap();
        assert_eq!(ok.name, "Astor");

        let ok = can_ship(&snapshot(), ItemKind::Bundle, "gb", 3).unwrap();
        assert_eq!(ok.name, "Goodiebag");

        let err = can_ship(&snapshot(), ItemKind::Bundle, "gb", 4).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err = can_ship(&snapshot(), ItemKind::Product, "zz", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: zz");

        let err = can_ship(&snapshot(), ItemKind::Product, "a", 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
