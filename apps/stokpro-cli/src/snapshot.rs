//! # Snapshot Loading
//!
//! Reads the JSON export of the backend tables into a validated catalog and
//! a movement ledger.
//!
//! ## File Shape
//! ```text
//! {
//!   "products":  [ Product, ... ],
//!   "bundles":   [ Bundle, ... ],
//!   "suppliers": [ Supplier, ... ],
//!   "stock_in":  [ StockIn, ... ],
//!   "stock_out": [ StockOut, ... ],
//!   "sales":     [ SaleLineItem, ... ]     (optional)
//! }
//! ```
//!
//! Every list may be omitted. When `sales` is empty the sale lines are
//! derived from `stock_out`. Catalog rows, ledger rows and sale lines are all
//! validated on load, so quantities reaching the calculators are bounded.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stokpro_core::validation::{
    validate_sale_line, validate_stock_in, validate_stock_out, ValidationResult,
};
use stokpro_core::{Catalog, CatalogSnapshot, Ledger, SaleLineItem};
use tracing::{debug, info};

use crate::error::{CliError, ErrorCode};

/// Raw file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(flatten)]
    pub catalog: CatalogSnapshot,

    #[serde(flatten)]
    pub ledger: Ledger,

    /// Sale lines exported directly from the sales table.
    #[serde(default)]
    pub sales: Vec<SaleLineItem>,
}

/// A loaded, validated snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub catalog: Catalog,
    pub ledger: Ledger,
    sales: Vec<SaleLineItem>,
}

impl Snapshot {
    /// Validates the raw file contents.
    ///
    /// ## Errors
    /// `ValidationError` naming the list and index of the first bad row.
    pub fn from_file(file: SnapshotFile) -> Result<Self, CliError> {
        let SnapshotFile {
            catalog,
            ledger,
            sales,
        } = file;

        let catalog = Catalog::new(catalog)?;
        validate_rows("stock_in", &ledger.stock_in, validate_stock_in)?;
        validate_rows("stock_out", &ledger.stock_out, validate_stock_out)?;
        validate_rows("sales", &sales, validate_sale_line)?;

        Ok(Snapshot {
            catalog,
            ledger,
            sales,
        })
    }

    /// Parses and validates snapshot JSON.
    pub fn parse(json: &str) -> Result<Self, CliError> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        Snapshot::from_file(file)
    }

    /// Reads a snapshot file.
    pub async fn load(path: &Path) -> Result<Self, CliError> {
        debug!(path = %path.display(), "Reading snapshot");

        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            CliError::snapshot(format!("Failed to read {}: {e}", path.display()))
        })?;
        let snapshot = Snapshot::parse(&json)?;

        info!(
            products = snapshot.catalog.products().len(),
            bundles = snapshot.catalog.bundles().len(),
            stock_in = snapshot.ledger.stock_in.len(),
            stock_out = snapshot.ledger.stock_out.len(),
            sales = snapshot.sales.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Sale lines for margin reports.
    pub fn sale_lines(&self) -> Vec<SaleLineItem> {
        if self.sales.is_empty() {
            self.ledger.sale_lines()
        } else {
            self.sales.clone()
        }
    }
}

fn validate_rows<T>(
    list: &str,
    rows: &[T],
    validate: impl Fn(&T) -> ValidationResult<()>,
) -> Result<(), CliError> {
    for (index, row) in rows.iter().enumerate() {
        validate(row).map_err(|e| {
            CliError::new(ErrorCode::ValidationError, format!("{list} #{index}: {e}"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "products": [
            { "id": "a", "name": "Astor", "stock": 10, "purchase_price": 2000, "sale_price": 3000 }
        ],
        "stock_out": [
            { "kind": "product", "item_id": "a", "quantity": 2, "sale_price": 3000,
              "shipped_at": "2024-12-02T10:00:00Z" }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_snapshot() {
        let snapshot = Snapshot::parse(SNAPSHOT).unwrap();
        assert_eq!(snapshot.catalog.products().len(), 1);
        assert!(snapshot.catalog.bundles().is_empty());
        assert_eq!(snapshot.ledger.stock_out.len(), 1);

        let lines = snapshot.sale_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].revenue.amount(), 6_000);
    }

    #[test]
    fn test_explicit_sales_take_precedence() {
        let json = r#"{
            "stock_out": [
                { "kind": "product", "item_id": "a", "quantity": 2, "sale_price": 3000,
                  "shipped_at": "2024-12-02T10:00:00Z" }
            ],
            "sales": [
                { "bundle_id": "gb", "quantity": 1, "revenue": 10000, "sold_at": "2024-12-03T10:00:00Z" },
                { "quantity": 1, "revenue": 5000, "sold_at": "2024-12-03T11:00:00Z" }
            ]
        }"#;
        let snapshot = Snapshot::parse(json).unwrap();
        let lines = snapshot.sale_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].bundle_id.as_deref(), Some("gb"));
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let json = r#"{ "products": [
            { "id": "a", "name": "", "stock": 1, "purchase_price": 1, "sale_price": 1 }
        ] }"#;
        let err = Snapshot::parse(json).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_oversized_quantities_are_rejected() {
        let json = r#"{
            "products": [
                { "id": "taro", "name": "Taro", "stock": 10, "purchase_price": 3000, "sale_price": 5000 }
            ],
            "sales": [
                { "product_id": "taro", "quantity": 20, "revenue": 100000, "sold_at": "2024-12-03T10:00:00Z" },
                { "product_id": "taro", "quantity": 18446744073709551615, "revenue": 1000, "sold_at": "2024-12-04T10:00:00Z" }
            ]
        }"#;
        let err = Snapshot::parse(json).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("sales #1:"));

        let json = r#"{ "stock_out": [
            { "kind": "product", "item_id": "a", "quantity": 10000000000000000, "sale_price": 3000,
              "shipped_at": "2024-12-02T10:00:00Z" }
        ] }"#;
        let err = Snapshot::parse(json).unwrap_err();
        assert!(err.message.starts_with("stock_out #0:"));

        let json = r#"{ "stock_in": [
            { "product_id": "a", "quantity": 0, "purchase_price": 2000,
              "received_at": "2024-12-01T10:00:00Z" }
        ] }"#;
        let err = Snapshot::parse(json).unwrap_err();
        assert!(err.message.starts_with("stock_in #0:"));

        let json = r#"{ "products": [
            { "id": "a", "name": "Astor", "stock": 18446744073709551615, "purchase_price": 1, "sale_price": 1 }
        ] }"#;
        let err = Snapshot::parse(json).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_malformed_json() {
        let err = Snapshot::parse("[]").unwrap_err();
        assert_eq!(err.code, ErrorCode::SnapshotError);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(&dir.path().join("nope.json")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SnapshotError);
    }
}
