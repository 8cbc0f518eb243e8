//! # Output Rendering
//!
//! Plain-text tables for operators and pretty JSON for scripts. JSON output
//! is the serde form of the command outputs, untouched.

use std::fmt::Write as _;

use serde::Serialize;
use stokpro_core::margin::MarginReport;
use stokpro_core::stock::StockStatus;
use stokpro_core::{Money, UnitLabels};

use crate::commands::{
    BreakdownOutput, BundleRow, ConversionOutput, DashboardOutput, LowStockRow, ShipmentCheck,
};
use crate::config::{CliConfig, OutputFormat};
use crate::error::CliError;

/// Serializes any command output as pretty JSON.
pub fn json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Text renderer carrying display settings.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    currency_symbol: String,
    labels: UnitLabels,
}

impl TextRenderer {
    pub fn new(config: &CliConfig) -> Self {
        TextRenderer {
            currency_symbol: config.currency_symbol.clone(),
            labels: config.labels.clone(),
        }
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }

    pub fn conversion(&self, out: &ConversionOutput) -> String {
        format!(
            "{} {} = {} {} ({})",
            out.quantity,
            self.labels.label(out.unit),
            out.pieces,
            self.labels.piece,
            out.breakdown.render(&self.labels)
        )
    }

    pub fn breakdown(&self, out: &BreakdownOutput) -> String {
        format!(
            "{} {} = {}",
            out.pieces,
            self.labels.piece,
            out.breakdown.render(&self.labels)
        )
    }

    pub fn bundles(&self, rows: &[BundleRow]) -> String {
        if rows.is_empty() {
            return "No bundles in snapshot.".to_string();
        }

        let mut out = String::new();
        for row in rows {
            let status = if row.availability.available {
                "available"
            } else {
                "unavailable"
            };
            let _ = writeln!(
                out,
                "{} [{}] {} | price {} | cost {} | can assemble {}",
                row.name,
                row.bundle_id,
                status,
                self.money(row.sale_price),
                self.money(row.cost),
                row.availability.max_assemblable,
            );
            if let Some(limit) = &row.availability.limiting_product_id {
                let _ = writeln!(out, "  limited by {limit}");
            }
            for shortage in &row.shortages {
                let _ = writeln!(
                    out,
                    "  insufficient stock of {}: need {}, have {}",
                    shortage.product_id, shortage.required, shortage.in_stock
                );
            }
        }
        out.trim_end().to_string()
    }

    pub fn margin(&self, report: &MarginReport) -> String {
        let mut out = String::new();
        for line in &report.lines {
            let _ = writeln!(
                out,
                "{} | cost {} | price {} | margin {} ({:.2}%) | sold {} | revenue {} | profit {}",
                line.item_name,
                self.money(line.cost_price),
                self.money(line.sale_price),
                self.money(line.margin),
                line.margin_percent,
                line.quantity_sold,
                self.money(line.revenue),
                self.money(line.realized_profit),
            );
        }
        let totals = &report.totals;
        let _ = writeln!(
            out,
            "Total: sold {} | revenue {} | profit {} | average margin {:.2}%",
            totals.total_quantity,
            self.money(totals.total_revenue),
            self.money(totals.total_realized_profit),
            totals.average_margin_percent,
        );
        if !report.rejected.is_empty() {
            let _ = writeln!(out, "Excluded {} malformed sale line(s):", report.rejected.len());
            for rejected in &report.rejected {
                let _ = writeln!(out, "  #{}: {}", rejected.index, rejected.reason);
            }
        }
        out.trim_end().to_string()
    }

    pub fn dashboard(&self, dash: &DashboardOutput) -> String {
        let m = &dash.metrics;
        let mut out = String::new();
        let (year, month) = m.period.start_month();
        let _ = writeln!(out, "Dashboard {year}-{month:02}");
        let _ = writeln!(out, "  Products:     {}", m.total_products);
        let _ = writeln!(out, "  Total stock:  {} {}", m.total_stock, self.labels.piece);
        let _ = writeln!(out, "  Asset value:  {}", self.money(m.total_asset_value));
        let _ = writeln!(out, "  Low stock:    {}", m.low_stock_count);
        let _ = writeln!(out, "  Stock in:     {}", m.stock_in_quantity);
        let _ = writeln!(out, "  Stock out:    {}", m.stock_out_quantity);
        let _ = writeln!(out, "  Revenue:      {}", self.money(m.revenue));
        let _ = writeln!(out, "  Profit:       {}", self.money(m.profit));

        if !dash.top_products.is_empty() {
            let _ = writeln!(out, "Top products");
            for (rank, top) in dash.top_products.iter().enumerate() {
                let _ = writeln!(out, "  {}. {} ({} sold)", rank + 1, top.name, top.sold);
            }
        }

        let _ = writeln!(out, "Stock flow {year} (in / out)");
        for flow in &dash.stock_flow {
            let _ = writeln!(out, "  {:02}: {} / {}", flow.month, flow.stock_in, flow.stock_out);
        }
        out.trim_end().to_string()
    }

    pub fn low_stock(&self, rows: &[LowStockRow]) -> String {
        if rows.is_empty() {
            return "All products are above their minimum stock.".to_string();
        }

        let mut out = String::new();
        for row in rows {
            let status = match row.alert.status {
                StockStatus::Critical => "CRITICAL",
                StockStatus::Low => "LOW",
                StockStatus::Healthy => "OK",
            };
            let _ = write!(
                out,
                "{:<8} {} | {} (min {}) | {:.0}%",
                status,
                row.alert.name,
                row.breakdown.render(&self.labels),
                row.alert.min_stock,
                row.alert.fill_percent,
            );
            if let Some(supplier) = &row.supplier {
                let _ = write!(out, " | reorder from {supplier}");
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }

    pub fn shipment(&self, check: &ShipmentCheck) -> String {
        format!("OK: {} x {} can ship from current stock", check.quantity, check.name)
    }
}

/// Renders with the configured format.
pub fn render<T, F>(format: OutputFormat, value: &T, text: F) -> Result<String, CliError>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => json(value),
        OutputFormat::Text => Ok(text(value)),
    }
}
