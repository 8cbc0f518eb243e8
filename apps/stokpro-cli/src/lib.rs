//! # StokPro CLI
//!
//! Reports over a catalog snapshot exported from the StokPro backend.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stokpro <command> [--snapshot PATH] [--format text|json]              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliConfig::load() (env) ──► with_overrides(flags)                     │
//! │       │                                                                 │
//! │       ├── convert / breakdown ──► stokpro_core::units (no snapshot)    │
//! │       │                                                                 │
//! │       └── bundles / margin / dashboard / low-stock / can-ship          │
//! │                │                                                        │
//! │                ▼                                                        │
//! │         Snapshot::load() ──► commands::* ──► render                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod snapshot;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use stokpro_core::units::{PackagingRatios, Unit};
use stokpro_core::ItemKind;

use crate::config::{CliConfig, OutputFormat};
use crate::error::CliError;
use crate::render::{render, TextRenderer};
use crate::snapshot::Snapshot;

#[derive(Debug, Parser)]
#[command(name = "stokpro")]
#[command(about = "Inventory reports over StokPro catalog snapshots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Snapshot JSON file (overrides STOKPRO_SNAPSHOT)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,

    /// Output format (overrides STOKPRO_FORMAT)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Packaging ratios given on the command line.
#[derive(Debug, Clone, Copy, Args)]
pub struct RatioArgs {
    /// Pieces per pack
    #[arg(long)]
    pub ppp: Option<u32>,

    /// Packs per carton
    #[arg(long)]
    pub ppc: Option<u32>,
}

impl RatioArgs {
    fn ratios(&self) -> PackagingRatios {
        PackagingRatios::new(self.ppp, self.ppc)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a quantity in pieces, packs or cartons into pieces
    Convert {
        quantity: u64,

        /// piece, pack or carton (also pcs, box, dus)
        unit: Unit,

        #[command(flatten)]
        ratios: RatioArgs,
    },

    /// Break a piece count into cartons, packs and pieces
    Breakdown {
        pieces: u64,

        #[command(flatten)]
        ratios: RatioArgs,
    },

    /// Show availability of every bundle
    Bundles,

    /// Margin and realized profit per item
    Margin {
        /// First day of the period (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the period, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Overview metrics for one month
    Dashboard {
        #[arg(long)]
        year: i32,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Products at or below their minimum stock
    LowStock,

    /// Check that current stock covers a shipment
    CanShip {
        /// Product id (pieces)
        #[arg(long, conflicts_with = "bundle", required_unless_present = "bundle")]
        product: Option<String>,

        /// Bundle id (bundle count)
        #[arg(long)]
        bundle: Option<String>,

        quantity: u64,
    },
}

/// Runs a parsed command and returns what should go to stdout.
pub async fn run(cli: Cli, config: &CliConfig) -> Result<String, CliError> {
    let format = config.format;
    let text = TextRenderer::new(config);

    match cli.command {
        Commands::Convert {
            quantity,
            unit,
            ratios,
        } => {
            let out = commands::convert(quantity, unit, ratios.ratios())?;
            render(format, &out, |o| text.conversion(o))
        }

        Commands::Breakdown { pieces, ratios } => {
            let out = commands::breakdown(pieces, ratios.ratios());
            render(format, &out, |o| text.breakdown(o))
        }

        Commands::Bundles => {
            let snapshot = Snapshot::load(&config.snapshot_path).await?;
            let rows = commands::bundles(&snapshot);
            render(format, &rows, |r| text.bundles(r))
        }

        Commands::Margin { from, to } => {
            let period = commands::period_from_dates(from, to)?;
            let snapshot = Snapshot::load(&config.snapshot_path).await?;
            let report = commands::margin(&snapshot, period);
            render(format, &report, |r| text.margin(r))
        }

        Commands::Dashboard { year, month } => {
            let snapshot = Snapshot::load(&config.snapshot_path).await?;
            let out = commands::dashboard(&snapshot, year, month, config.top_products)?;
            render(format, &out, |o| text.dashboard(o))
        }

        Commands::LowStock => {
            let snapshot = Snapshot::load(&config.snapshot_path).await?;
            let rows = commands::low_stock(&snapshot);
            render(format, &rows, |r| text.low_stock(r))
        }

        Commands::CanShip {
            product,
            bundle,
            quantity,
        } => {
            let (kind, item_id) = match (product, bundle) {
                (Some(id), None) => (ItemKind::Product, id),
                (None, Some(id)) => (ItemKind::Bundle, id),
                _ => {
                    return Err(CliError::invalid_argument(
                        "exactly one of --product or --bundle is required",
                    ))
                }
            };
            let snapshot = Snapshot::load(&config.snapshot_path).await?;
            let check = commands::can_ship(&snapshot, kind, &item_id, quantity)?;
            render(format, &check, |c| text.shipment(c))
        }
    }
}
