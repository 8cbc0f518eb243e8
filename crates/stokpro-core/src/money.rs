//! # Money Module
//!
//! Provides the `Money` type for prices, revenue and profit.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Profit over a month of sales is a long chain of additions, and        │
//! │  float drift shows up in the report totals.                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Rupiah has no minor unit in practice, so 1 = Rp1.                    │
//! │    Percentages are the only floats, and only for display.              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stokpro_core::money::Money;
//!
//! let cost = Money::from_amount(3_000);
//! let price = Money::from_amount(5_000);
//!
//! let margin = price - cost;               // Rp2.000
//! let line = price.multiply_quantity(12);  // Rp60.000
//! assert_eq!(margin.amount(), 2_000);
//! assert_eq!(line.amount(), 60_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Profit and margin go negative when an item is sold
///   below cost
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Newtype serde**: Serialized as a bare integer, matching the
///   backend's integer price columns
/// - **Saturating arithmetic**: Sums and products clamp at `i64::MIN` and
///   `i64::MAX` instead of wrapping, so an absurd total never changes sign
///
/// ## Where Money is Used
/// ```text
/// Product.purchase_price ──┬──► bundle cost ──► margin ──► margin %
///                          │
/// Product.sale_price ──────┘
///
/// StockOut.subtotal - additional_cost ──► SaleLineItem.revenue
///                                               │
///                                               ▼
///                                        realized profit
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use stokpro_core::money::Money;
    ///
    /// let price = Money::from_amount(12_500); // Rp12.500
    /// assert_eq!(price.amount(), 12_500);
    /// ```
    #[inline]
    pub const fn from_amount(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the raw amount in the smallest currency unit.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies money by a piece or bundle count.
    ///
    /// ## Example
    /// ```rust
    /// use stokpro_core::money::Money;
    ///
    /// let unit_cost = Money::from_amount(3_000);
    /// assert_eq!(unit_cost.multiply_quantity(50).amount(), 150_000);
    ///
    /// // Clamps instead of overflowing, keeping the sign
    /// assert_eq!(unit_cost.multiply_quantity(u64::MAX).amount(), i64::MAX);
    /// ```
    pub fn multiply_quantity(&self, qty: u64) -> Self {
        let product = i64::try_from(qty)
            .ok()
            .and_then(|qty| self.0.checked_mul(qty));

        match product {
            Some(amount) => Money(amount),
            None if self.0 == 0 => Money(0),
            None if self.0 < 0 => Money(i64::MIN),
            None => Money(i64::MAX),
        }
    }

    /// Expresses `self` as a percentage of `base`.
    ///
    /// Returns `0.0` when `base` is zero or negative: a free item has a
    /// well-defined absolute margin but no meaningful percentage.
    ///
    /// ## Example
    /// ```rust
    /// use stokpro_core::money::Money;
    ///
    /// let margin = Money::from_amount(2_000);
    /// let cost = Money::from_amount(3_000);
    /// assert!((margin.percent_of(cost) - 66.666).abs() < 0.01);
    /// assert_eq!(margin.percent_of(Money::zero()), 0.0);
    /// ```
    pub fn percent_of(&self, base: Money) -> f64 {
        if base.0 <= 0 {
            return 0.0;
        }
        self.0 as f64 / base.0 as f64 * 100.0
    }

    /// Formats the amount with a currency symbol and `.` thousands separators.
    ///
    /// ## Example
    /// ```rust
    /// use stokpro_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(1_250_000).format_with("Rp"), "Rp1.250.000");
    /// assert_eq!(Money::from_amount(-5_000).format_with("Rp"), "-Rp5.000");
    /// ```
    pub fn format_with(&self, symbol: &str) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{symbol}{grouped}")
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the rupiah symbol.
///
/// ## Note
/// This is for debugging and logs. Reports use `format_with` so the symbol
/// follows configuration.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("Rp"))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a quantity.
impl Mul<u64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
