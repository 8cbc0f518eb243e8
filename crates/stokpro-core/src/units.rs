//! # Unit Conversion
//!
//! Converts operator-entered quantities between display units and pieces.
//!
//! ## Unit Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Packaging Ladder                                 │
//! │                                                                         │
//! │   Carton ──(packs_per_carton)──► Pack ──(pieces_per_pack)──► Piece     │
//! │                                                                         │
//! │   Example: pieces_per_pack = 12, packs_per_carton = 10                 │
//! │     1 Carton = 10 Pack = 120 Pcs                                       │
//! │                                                                         │
//! │   Stock is ALWAYS stored in pieces. Pack and carton exist only on      │
//! │   input forms and in the stock column of the product table.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stokpro_core::units::{from_pieces, to_pieces, PackagingRatios, Unit};
//!
//! let ratios = PackagingRatios::new(Some(12), Some(10));
//!
//! assert_eq!(to_pieces(3, Unit::Carton, ratios).unwrap(), 360);
//!
//! let breakdown = from_pieces(145, ratios);
//! assert_eq!((breakdown.cartons, breakdown.packs, breakdown.pieces), (1, 2, 1));
//! assert_eq!(breakdown.to_string(), "1 Dus, 2 Pack, 1 Pcs");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Unit
// =============================================================================

/// The three logical stock units.
///
/// Display labels ("Pcs", "Dus", ...) are a presentation concern and live in
/// [`UnitLabels`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// The canonical stock-keeping unit.
    Piece,
    /// `pieces_per_pack` pieces.
    Pack,
    /// `packs_per_carton` packs.
    Carton,
}

impl Unit {
    /// Canonical lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Piece => "piece",
            Unit::Pack => "pack",
            Unit::Carton => "carton",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses canonical names plus the labels operators are used to typing
/// (`pcs`, `box`, `dus`).
impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "piece" | "pieces" | "pcs" => Ok(Unit::Piece),
            "pack" | "packs" | "box" => Ok(Unit::Pack),
            "carton" | "cartons" | "dus" => Ok(Unit::Carton),
            other => Err(ValidationError::InvalidFormat {
                field: "unit".to_string(),
                reason: format!("unknown unit '{other}', expected piece, pack or carton"),
            }),
        }
    }
}

// =============================================================================
// Unit Labels
// =============================================================================

/// Presentation labels for each unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitLabels {
    pub piece: String,
    pub pack: String,
    pub carton: String,
}

impl UnitLabels {
    /// Returns the label for a unit.
    pub fn label(&self, unit: Unit) -> &str {
        match unit {
            Unit::Piece => &self.piece,
            Unit::Pack => &self.pack,
            Unit::Carton => &self.carton,
        }
    }
}

impl Default for UnitLabels {
    fn default() -> Self {
        UnitLabels {
            piece: "Pcs".to_string(),
            pack: "Pack".to_string(),
            carton: "Dus".to_string(),
        }
    }
}

// =============================================================================
// Packaging Ratios
// =============================================================================

/// A product's optional packaging ratios.
///
/// `None` and `Some(0)` both mean "this unit is not offered". Zero is never
/// treated as a multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PackagingRatios {
    pub pieces_per_pack: Option<u32>,
    pub packs_per_carton: Option<u32>,
}

impl PackagingRatios {
    /// Creates ratios from raw (possibly zero) values.
    pub const fn new(pieces_per_pack: Option<u32>, packs_per_carton: Option<u32>) -> Self {
        PackagingRatios {
            pieces_per_pack,
            packs_per_carton,
        }
    }

    /// Ratios for a product sold only by the piece.
    pub const fn pieces_only() -> Self {
        PackagingRatios::new(None, None)
    }

    /// Pieces in one pack, if packs are offered.
    pub fn pieces_per_pack(&self) -> Option<u64> {
        positive(self.pieces_per_pack)
    }

    /// Pieces in one carton, if cartons are offered (needs both ratios).
    pub fn pieces_per_carton(&self) -> Option<u64> {
        // u32 * u32 always fits in u64
        Some(positive(self.packs_per_carton)? * self.pieces_per_pack()?)
    }

    /// Pieces in one `unit`.
    ///
    /// ## Errors
    /// `UnsupportedUnit` when the ratio the unit needs is absent or zero.
    pub fn pieces_per(&self, unit: Unit) -> CoreResult<u64> {
        let per = match unit {
            Unit::Piece => Some(1),
            Unit::Pack => self.pieces_per_pack(),
            Unit::Carton => self.pieces_per_carton(),
        };
        per.ok_or(CoreError::UnsupportedUnit { unit })
    }

    /// Units available for this product, smallest first.
    pub fn available_units(&self) -> Vec<Unit> {
        [Unit::Piece, Unit::Pack, Unit::Carton]
            .into_iter()
            .filter(|unit| self.pieces_per(*unit).is_ok())
            .collect()
    }
}

fn positive(ratio: Option<u32>) -> Option<u64> {
    ratio.filter(|r| *r > 0).map(u64::from)
}

// =============================================================================
// Conversions
// =============================================================================

/// Converts `quantity` of `unit` into pieces.
///
/// ## User Workflow
/// ```text
/// Stock In form: 3 × [Dus ▾]
///      │
///      ▼
/// to_pieces(3, Carton, { ppp: 12, ppc: 10 }) ← THIS FUNCTION
///      │
///      ▼
/// 360 pieces written to the stock ledger
/// ```
///
/// ## Errors
/// - `UnsupportedUnit` if the product does not offer `unit`
/// - `QuantityOverflow` if the result does not fit in a `u64`
pub fn to_pieces(quantity: u64, unit: Unit, ratios: PackagingRatios) -> CoreResult<u64> {
    let per = ratios.pieces_per(unit)?;
    quantity
        .checked_mul(per)
        .ok_or(CoreError::QuantityOverflow {
            context: "unit conversion",
        })
}

/// Decomposes a piece count into cartons, packs and leftover pieces.
///
/// Largest unit first, floor division at each level. Units the product does
/// not offer stay at zero and their share folds into the next smaller unit.
pub fn from_pieces(pieces: u64, ratios: PackagingRatios) -> StockBreakdown {
    let mut remaining = pieces;

    let cartons = match ratios.pieces_per_carton() {
        Some(per_carton) => {
            let cartons = remaining / per_carton;
            remaining %= per_carton;
            cartons
        }
        None => 0,
    };

    let packs = match ratios.pieces_per_pack() {
        Some(per_pack) => {
            let packs = remaining / per_pack;
            remaining %= per_pack;
            packs
        }
        None => 0,
    };

    StockBreakdown {
        cartons,
        packs,
        pieces: remaining,
    }
}

// =============================================================================
// Stock Breakdown
// =============================================================================

/// Human-readable decomposition of a piece count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockBreakdown {
    pub cartons: u64,
    pub packs: u64,
    pub pieces: u64,
}

impl StockBreakdown {
    /// Non-zero terms, largest unit first.
    ///
    /// A zero stock yields `[(Piece, 0)]` rather than an empty list.
    pub fn parts(&self) -> Vec<(Unit, u64)> {
        let mut parts: Vec<(Unit, u64)> = [
            (Unit::Carton, self.cartons),
            (Unit::Pack, self.packs),
            (Unit::Piece, self.pieces),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect();

        if parts.is_empty() {
            parts.push((Unit::Piece, 0));
        }
        parts
    }

    /// Joins the parts with the given labels: `"1 Dus, 2 Pack, 1 Pcs"`.
    pub fn render(&self, labels: &UnitLabels) -> String {
        self.parts()
            .into_iter()
            .map(|(unit, count)| format!("{count} {}", labels.label(unit)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for StockBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&UnitLabels::default()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
