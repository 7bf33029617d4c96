//! # Money Module
//!
//! Provides the `Money` type for prices and invoice totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing 23 product rows in f64 drifts the grand total, and the        │
//! │  "before" and "after" columns drift differently.                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer centimes                                         │
//! │    4.00 MAD = 400 centimes, 30 units × 400 = 12000 centimes            │
//! │    Addition is exact, associative and commutative                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use alban_core::money::Money;
//!
//! let price = Money::from_major_minor(4, 0); // 4.00
//! let row = price.multiply_quantity(30);
//! assert_eq!(row.cents(), 12000);
//! assert_eq!(row.to_string(), "120.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centimes for MAD).
///
/// ## Design Decisions
/// - **i64 (signed)**: keeps subtraction total; validation rejects negative prices
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Catalog price ──► ProductEntry.unit_price ──┬──► row_total_before      │
/// │                                              └──► row_total_after       │
/// │                                                                         │
/// │  Σ rows ──► InvoiceTotals ──► PDF grand total ──► HistoryRecord         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centimes.
    ///
    /// ```rust
    /// use alban_core::money::Money;
    ///
    /// let price = Money::from_cents(350); // 3.50
    /// assert_eq!(price.cents(), 350);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centimes.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a unit count, clamping at the `i64` range.
    ///
    /// Validated entries never reach the clamp; see
    /// [`Money::checked_multiply_quantity`].
    ///
    /// ```rust
    /// use alban_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(250);
    /// assert_eq!(unit_price.multiply_quantity(24).cents(), 6000);
    /// assert_eq!(unit_price.multiply_quantity(u64::MAX).cents(), i64::MAX);
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u64) -> Self {
        Money::saturating_from_wide(self.0 as i128 * qty as i128)
    }

    /// Multiplies a unit price by a unit count; `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: u64) -> Option<Self> {
        i64::try_from(self.0 as i128 * qty as i128).ok().map(Money)
    }

    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Clamps a wide intermediate amount into range.
    #[inline]
    pub(crate) fn saturating_from_wide(cents: i128) -> Self {
        Money(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Formats the amount followed by a currency label, e.g. `"112.00 MAD"`.
    pub fn with_currency(&self, label: &str) -> String {
        if label.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, label)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rendering without a currency label, as printed in the invoice
/// price column.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

/// Parses a decimal price typed by the user: `"4"`, `"4.5"`, `"4.05"`.
///
/// More than two decimals, signs and exponents are rejected rather than
/// rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (major_str, minor_str) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, ""),
        };

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }
        if minor_str.len() > 2 || !minor_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two decimal digits are allowed"));
        }

        let major: i64 = major_str.parse().map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("bad decimals"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("bad decimals"))?,
        };

        major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(4, 0).cents(), 400);
        assert_eq!(Money::from_major_minor(2, 50).cents(), 250);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(11200).to_string(), "112.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_with_currency() {
        assert_eq!(Money::from_cents(12000).with_currency("MAD"), "120.00 MAD");
        assert_eq!(Money::from_cents(12000).with_currency(""), "120.00");
    }

    #[test]
    fn test_multiply_and_sum() {
        let price = Money::from_cents(400);
        let rows = vec![price.multiply_quantity(30), price.multiply_quantity(28)];
        let total: Money = rows.into_iter().sum();
        assert_eq!(total.cents(), 23200);
    }

    #[test]
    fn test_multiply_beyond_range() {
        let price = Money::from_cents(400);
        let units = 40_000_000_000_000_000u64;
        assert_eq!(price.multiply_quantity(units), Money::from_cents(i64::MAX));
        assert_eq!(price.checked_multiply_quantity(units), None);
        assert_eq!(Money::zero().checked_multiply_quantity(u64::MAX), Some(Money::zero()));
        assert_eq!(price.checked_multiply_quantity(30), Some(Money::from_cents(12000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_parse_prices() {
        assert_eq!("4".parse::<Money>().unwrap().cents(), 400);
        assert_eq!("4.5".parse::<Money>().unwrap().cents(), 450);
        assert_eq!(" 4.05 ".parse::<Money>().unwrap().cents(), 405);
        assert_eq!("0.00".parse::<Money>().unwrap().cents(), 0);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "".parse::<Money>(),
            Err(ValidationError::Required { .. })
        ));
        assert!("-4".parse::<Money>().is_err());
        assert!("4.005".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
    }
}
