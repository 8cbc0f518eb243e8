//! # Margin & Profit Aggregation
//!
//! Per-item and overall profitability for a reporting period.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SaleLineItem[] ──► item_ref() ──┬── Err ──► rejected (excluded)        │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                    group by item (first-seen order)                     │
//! │                    Σ quantity, Σ revenue                                │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │            cost = purchase price            (product)                   │
//! │            cost = Σ required × component cost (bundle, never cached)    │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │   margin = sale − cost     margin % = margin / cost × 100 (0 if cost=0) │
//! │   realized profit = Σ revenue − quantity × cost                         │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │   totals: Σ realized profit, unweighted mean of margin %                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Realized profit uses recorded revenue rather than list price so that
//! discounts and extra costs on individual sales show up in the report.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::CatalogLookup;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Bundle, ItemKind, ItemRef, SaleLineItem};

// =============================================================================
// Report Period
// =============================================================================

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportPeriod {
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

impl ReportPeriod {
    /// Creates a period.
    ///
    /// ## Errors
    /// `Validation` when `end` is not after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<Self> {
        if end <= start {
            return Err(ValidationError::InvalidFormat {
                field: "period".to_string(),
                reason: "end must be after start".to_string(),
            }
            .into());
        }
        Ok(ReportPeriod { start, end })
    }

    /// The calendar month `year-month`, in UTC.
    ///
    /// ## Example
    /// ```rust
    /// use stokpro_core::margin::ReportPeriod;
    ///
    /// let december = ReportPeriod::month(2024, 12).unwrap();
    /// assert_eq!(december.start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
    /// assert_eq!(december.end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    /// ```
    pub fn month(year: i32, month: u32) -> CoreResult<Self> {
        let start = first_of_month(year, month)?;
        let end = if month == 12 {
            first_of_month(year + 1, 1)?
        } else {
            first_of_month(year, month + 1)?
        };
        ReportPeriod::new(start, end)
    }

    /// Whether `at` falls inside the period.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// `(year, month)` of the period start.
    pub fn start_month(&self) -> (i32, u32) {
        (self.start.year(), self.start.month())
    }
}

fn first_of_month(year: i32, month: u32) -> CoreResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "month".to_string(),
                min: 1,
                max: 12,
            }
            .into()
        })
}

// =============================================================================
// Report Types
// =============================================================================

/// Profitability of one distinct sold item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarginLine {
    pub item_kind: ItemKind,
    pub item_id: String,
    pub item_name: String,
    pub cost_price: Money,
    pub sale_price: Money,
    pub margin: Money,
    pub margin_percent: f64,
    pub quantity_sold: u64,
    pub revenue: Money,
    pub realized_profit: Money,
}

/// Report-wide totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarginTotals {
    pub total_realized_profit: Money,
    /// Unweighted mean of `margin_percent` across distinct items.
    pub average_margin_percent: f64,
    pub total_revenue: Money,
    pub total_quantity: u64,
}

/// A sale line excluded from the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RejectedLine {
    /// Position of the line in the input.
    pub index: usize,
    pub reason: String,
}

impl RejectedLine {
    /// The error this rejection stands for.
    pub fn to_error(&self) -> CoreError {
        CoreError::MalformedLineItem {
            index: self.index,
            reason: self.reason.clone(),
        }
    }
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarginReport {
    pub lines: Vec<MarginLine>,
    pub totals: MarginTotals,
    pub rejected: Vec<RejectedLine>,
}

impl MarginReport {
    /// Fails with the first rejected line, if any.
    ///
    /// For callers that must not publish a report built on partial data.
    pub fn into_strict(self) -> CoreResult<Self> {
        match self.rejected.first() {
            Some(rejected) => Err(rejected.to_error()),
            None => Ok(self),
        }
    }

    /// Looks up the line for an item id.
    pub fn line(&self, item_id: &str) -> Option<&MarginLine> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }
}

// =============================================================================
// Calculations
// =============================================================================

/// Cost of one bundle from current component purchase prices.
///
/// Components whose product is missing contribute zero.
pub fn bundle_cost<C>(bundle: &Bundle, catalog: &C) -> Money
where
    C: CatalogLookup + ?Sized,
{
    bundle
        .components
        .iter()
        .filter_map(|component| {
            catalog
                .product(&component.product_id)
                .map(|p| p.purchase_price.multiply_quantity(component.required_quantity))
        })
        .sum()
}

/// Aggregates sale lines into a margin report.
///
/// Malformed lines (neither or both references set) are excluded from every
/// total and listed in [`MarginReport::rejected`].
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use stokpro_core::catalog::{Catalog, CatalogSnapshot};
/// use stokpro_core::margin::aggregate;
/// use stokpro_core::money::Money;
/// use stokpro_core::types::{Product, SaleLineItem};
///
/// let catalog = Catalog::new(CatalogSnapshot {
///     products: vec![Product {
///         id: "taro".into(),
///         name: "Taro".into(),
///         category: "Snack".into(),
///         supplier_id: None,
///         stock: 150,
///         min_stock: 50,
///         purchase_price: Money::from_amount(3_000),
///         sale_price: Money::from_amount(5_000),
///         pieces_per_pack: None,
///         packs_per_carton: None,
///     }],
///     ..Default::default()
/// })
/// .unwrap();
///
/// let lines = vec![SaleLineItem::for_product("taro", 50, Money::from_amount(240_000), Utc::now())];
/// let report = aggregate(&lines, &catalog);
/// assert_eq!(report.totals.total_realized_profit.amount(), 90_000);
/// ```
pub fn aggregate<C>(lines: &[SaleLineItem], catalog: &C) -> MarginReport
where
    C: CatalogLookup + ?Sized,
{
    aggregate_indexed(lines.iter().enumerate(), catalog)
}

/// Aggregates only the lines sold within `period`.
///
/// Rejected-line indexes still refer to positions in `lines`.
pub fn aggregate_period<C>(lines: &[SaleLineItem], catalog: &C, period: ReportPeriod) -> MarginReport
where
    C: CatalogLookup + ?Sized,
{
    aggregate_indexed(
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| period.contains(line.sold_at)),
        catalog,
    )
}

struct Group {
    item: ItemRef,
    quantity: u64,
    revenue: Money,
}

fn aggregate_indexed<'a, I, C>(lines: I, catalog: &C) -> MarginReport
where
    I: Iterator<Item = (usize, &'a SaleLineItem)>,
    C: CatalogLookup + ?Sized,
{
    let mut groups: Vec<Group> = Vec::new();
    let mut slots: HashMap<ItemRef, usize> = HashMap::new();
    let mut rejected = Vec::new();

    for (index, line) in lines {
        let item = match line.item_ref(index) {
            Ok(item) => item,
            Err(CoreError::MalformedLineItem { index, reason }) => {
                rejected.push(RejectedLine { index, reason });
                continue;
            }
            Err(other) => {
                rejected.push(RejectedLine {
                    index,
                    reason: other.to_string(),
                });
                continue;
            }
        };

        let slot = *slots.entry(item.clone()).or_insert_with(|| {
            groups.push(Group {
                item,
                quantity: 0,
                revenue: Money::zero(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.quantity = group.quantity.saturating_add(line.quantity);
        group.revenue += line.revenue;
    }

    let lines: Vec<MarginLine> = groups
        .into_iter()
        .map(|group| price_group(group, catalog))
        .collect();

    let totals = MarginTotals {
        total_realized_profit: lines.iter().map(|l| l.realized_profit).sum(),
        average_margin_percent: if lines.is_empty() {
            0.0
        } else {
            lines.iter().map(|l| l.margin_percent).sum::<f64>() / lines.len() as f64
        },
        total_revenue: lines.iter().map(|l| l.revenue).sum(),
        total_quantity: lines
            .iter()
            .fold(0, |acc, l| acc.saturating_add(l.quantity_sold)),
    };

    MarginReport {
        lines,
        totals,
        rejected,
    }
}

fn price_group<C>(group: Group, catalog: &C) -> MarginLine
where
    C: CatalogLookup + ?Sized,
{
    let Group {
        item,
        quantity,
        revenue,
    } = group;

    let (item_name, cost_price, sale_price) = match item.kind {
        ItemKind::Product => match catalog.product(&item.id) {
            Some(p) => (p.name.clone(), p.purchase_price, p.sale_price),
            None => (item.id.clone(), Money::zero(), Money::zero()),
        },
        ItemKind::Bundle => match catalog.bundle(&item.id) {
            Some(b) => (b.name.clone(), bundle_cost(b, catalog), b.sale_price),
            None => (item.id.clone(), Money::zero(), Money::zero()),
        },
    };

    let margin = sale_price - cost_price;

    MarginLine {
        item_kind: item.kind,
        item_id: item.id,
        item_name,
        cost_price,
        sale_price,
        margin,
        margin_percent: margin.percent_of(cost_price),
        quantity_sold: quantity,
        revenue,
        realized_profit: revenue - cost_price.multiply_quantity(quantity),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogSnapshot};
    use crate::types::{BundleCategory, BundleComponent, Product};
    use chrono::TimeZone;

    fn product(id: &str, cost: i64, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: "Snack".to_string(),
            supplier_id: None,
            stock: 100,
            min_stock: 10,
            purchase_price: Money::from_amount(cost),
            sale_price: Money::from_amount(price),
            pieces_per_pack: None,
            packs_per_carton: None,
        }
    }

    fn goodiebag(components: Vec<BundleComponent>) -> Bundle {
        Bundle {
            id: "bun-1".to_string(),
            name: "Goodiebag Isi 3".to_string(),
            category: BundleCategory::Goodiebag,
            sale_price: Money::from_amount(25_000),
            components,
        }
    }

    fn catalog(products: Vec<Product>, bundles: Vec<Bundle>) -> Catalog {
        Catalog::new(CatalogSnapshot {
            products,
            bundles,
            suppliers: vec![],
        })
        .unwrap()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, day, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_product_margin_worked_example() {
        let catalog = catalog(vec![product("taro", 3_000, 5_000)], vec![]);
        let lines = vec![
            SaleLineItem::for_product("taro", 20, Money::from_amount(100_000), at(3)),
            SaleLineItem::for_product("taro", 30, Money::from_amount(140_000), at(9)),
        ];

        let report = aggregate(&lines, &catalog);
        let taro = report.line("taro").unwrap();

        assert_eq!(taro.item_name, "TARO");
        assert_eq!(taro.margin.amount(), 2_000);
        assert!((taro.margin_percent - 66.666_666).abs() < 0.001);
        assert_eq!(taro.quantity_sold, 50);
        assert_eq!(taro.revenue.amount(), 240_000);
        assert_eq!(taro.realized_profit.amount(), 90_000);
        assert_eq!(report.totals.total_realized_profit.amount(), 90_000);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn test_bundle_cost_tracks_component_costs() {
        let recipe = vec![
            BundleComponent::new("nabati", 2),
            BundleComponent::new("taro", 1),
        ];
        let before = catalog(
            vec![product("nabati", 2_000, 3_500), product("taro", 3_000, 5_000)],
            vec![goodiebag(recipe.clone())],
        );
        let after = catalog(
            vec![product("nabati", 2_500, 3_500), product("taro", 3_000, 5_000)],
            vec![goodiebag(recipe)],
        );

        let lines = vec![SaleLineItem::for_bundle(
            "bun-1",
            10,
            Money::from_amount(250_000),
            at(15),
        )];

        let line = aggregate(&lines, &before).lines.remove(0);
        assert_eq!(line.cost_price.amount(), 7_000);
        assert_eq!(line.margin.amount(), 18_000);
        assert_eq!(line.realized_profit.amount(), 180_000);

        let line = aggregate(&lines, &after).lines.remove(0);
        assert_eq!(line.cost_price.amount(), 8_000);
        assert_eq!(line.realized_profit.amount(), 170_000);
    }

    #[test]
    fn test_missing_component_costs_nothing() {
        let bundle = goodiebag(vec![
            BundleComponent::new("taro", 1),
            BundleComponent::new("discontinued", 3),
        ]);
        let catalog = catalog(vec![product("taro", 3_000, 5_000)], vec![bundle.clone()]);
        assert_eq!(bundle_cost(&bundle, &catalog).amount(), 3_000);
    }

    #[test]
    fn test_zero_cost_guard() {
        let catalog = catalog(vec![product("sample", 0, 1_000)], vec![]);
        let lines = vec![SaleLineItem::for_product("sample", 5, Money::from_amount(5_000), at(1))];

        let report = aggregate(&lines, &catalog);
        let line = report.line("sample").unwrap();
        assert_eq!(line.margin.amount(), 1_000);
        assert_eq!(line.margin_percent, 0.0);
        assert_eq!(line.realized_profit.amount(), 5_000);
    }

    #[test]
    fn test_huge_quantities_do_not_turn_loss_into_profit() {
        let catalog = catalog(vec![product("taro", 3_000, 5_000)], vec![]);

        let lines = vec![SaleLineItem::for_product("taro", u64::MAX, Money::from_amount(1_000), at(1))];
        let report = aggregate(&lines, &catalog);
        let line = report.line("taro").unwrap();
        assert!(line.realized_profit.is_negative());
        assert_eq!(line.realized_profit.amount(), 1_000 - i64::MAX);

        // 10^16 × 3_000 exceeds i64 and must not panic
        let lines = vec![
            SaleLineItem::for_product("taro", 10_u64.pow(16), Money::from_amount(1_000), at(1)),
            SaleLineItem::for_product("taro", u64::MAX, Money::zero(), at(2)),
        ];
        let report = aggregate(&lines, &catalog);
        assert_eq!(report.totals.total_quantity, u64::MAX);
        assert!(report.totals.total_realized_profit.is_negative());
    }

    #[test]
    fn test_malformed_line_is_rejected_and_excluded() {
        let catalog = catalog(vec![product("taro", 3_000, 5_000)], vec![]);
        let mut both = SaleLineItem::for_product("taro", 99, Money::from_amount(999_000), at(2));
        both.bundle_id = Some("bun-1".to_string());

        let lines = vec![
            SaleLineItem::for_product("taro", 10, Money::from_amount(50_000), at(1)),
            both,
        ];
        let report = aggregate(&lines, &catalog);

        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 1);
        assert_eq!(report.totals.total_quantity, 10);
        assert_eq!(report.totals.total_realized_profit.amount(), 20_000);

        assert!(matches!(
            report.into_strict(),
            Err(CoreError::MalformedLineItem { index: 1, .. })
        ));
    }

    #[test]
    fn test_average_margin_is_unweighted() {
        // 50% on a single sale, 100% on a thousand: mean is still 75%
        let catalog = catalog(
            vec![product("a", 2_000, 3_000), product("b", 1_000, 2_000)],
            vec![],
        );
        let lines = vec![
            SaleLineItem::for_product("a", 1, Money::from_amount(3_000), at(1)),
            SaleLineItem::for_product("b", 1_000, Money::from_amount(2_000_000), at(1)),
        ];

        let report = aggregate(&lines, &catalog);
        assert!((report.totals.average_margin_percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_item_has_zero_cost() {
        let catalog = catalog(vec![], vec![]);
        let lines = vec![SaleLineItem::for_product("ghost", 2, Money::from_amount(8_000), at(1))];

        let report = aggregate(&lines, &catalog);
        let line = report.line("ghost").unwrap();
        assert_eq!(line.item_name, "ghost");
        assert_eq!(line.cost_price, Money::zero());
        assert_eq!(line.realized_profit.amount(), 8_000);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let catalog = catalog(
            vec![product("a", 1_000, 2_000), product("b", 1_000, 2_000)],
            vec![],
        );
        let lines = vec![
            SaleLineItem::for_product("b", 1, Money::from_amount(2_000), at(1)),
            SaleLineItem::for_product("a", 1, Money::from_amount(2_000), at(2)),
            SaleLineItem::for_product("b", 1, Money::from_amount(2_000), at(3)),
        ];

        let report = aggregate(&lines, &catalog);
        let ids: Vec<&str> = report.lines.iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(report.lines[0].quantity_sold, 2);
    }

    #[test]
    fn test_empty_report() {
        let report = aggregate(&[], &catalog(vec![], vec![]));
        assert!(report.lines.is_empty());
        assert_eq!(report.totals, MarginTotals::default());
    }

    #[test]
    fn test_aggregate_period_filters_and_keeps_indexes() {
        let catalog = catalog(vec![product("taro", 3_000, 5_000)], vec![]);
        let november = Utc.with_ymd_and_hms(2024, 11, 30, 23, 59, 59).unwrap();

        let mut malformed = SaleLineItem::for_product("taro", 1, Money::zero(), at(5));
        malformed.product_id = None;

        let lines = vec![
            SaleLineItem::for_product("taro", 7, Money::from_amount(35_000), november),
            SaleLineItem::for_product("taro", 2, Money::from_amount(10_000), at(1)),
            malformed,
        ];

        let report = aggregate_period(&lines, &catalog, ReportPeriod::month(2024, 12).unwrap());
        assert_eq!(report.totals.total_quantity, 2);
        assert_eq!(report.rejected[0].index, 2);
    }

    #[test]
    fn test_report_period_month_bounds() {
        let period = ReportPeriod::month(2024, 2).unwrap();
        assert!(period.contains(Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()));
        assert!(!period.contains(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(period.start_month(), (2024, 2));

        assert!(ReportPeriod::month(2024, 13).is_err());
        assert!(ReportPeriod::new(at(5), at(5)).is_err());
    }
}
