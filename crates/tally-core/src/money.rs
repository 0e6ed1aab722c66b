//! # Money Module
//!
//! Provides the two monetary types used by the ledger engine.
//!
//! ## Two Precisions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Money         whole cents (i64)                                        │
//! │                prices, costs, discounts, refunds, settled totals        │
//! │                                                                         │
//! │  PreciseMoney  1/10 000 of a cent (i64)                                 │
//! │                line tax and every aggregate that contains tax           │
//! │                                                                         │
//! │  cents × tax_bps is always a whole number of PreciseMoney units, so     │
//! │  tax is exact until it is rounded ONCE, at display or at checkout.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Not Round Per Line?
//! ```text
//! Three lines of $0.05 at 10% tax:
//!
//!   per-line rounding:  0.005 → 0.01  × 3  = $0.03 tax
//!   exact aggregation:  0.005 × 3 = 0.015  → $0.02 tax
//!
//! Rounding each line first drifts the cart by a cent. Rounding the exact
//! sum keeps the receipt total honest.
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::types::TaxRate;
//!
//! let subtotal = Money::from_cents(2000); // $20.00
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(1800)).unwrap(); // 18%
//! assert_eq!(tax.round_to_cents().cents(), 360); // $3.60
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Number of [`PreciseMoney`] units in one cent.
///
/// Tax rates are basis points (1/10 000), so `cents × bps` lands exactly
/// on this grid.
pub const UNITS_PER_CENT: i64 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows differences such as `total - refunded`
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support; serializes as a bare integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Returns the larger of `self` and zero.
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Widens to [`PreciseMoney`], saturating at the `i64` bounds.
    ///
    /// Catalog prices are capped at [`crate::MAX_PRICE_CENTS`], so priced
    /// amounts never reach the bound. Only an absurd discount can, and it
    /// then still clamps the payable total to zero.
    #[inline]
    pub const fn to_precise(&self) -> PreciseMoney {
        PreciseMoney(self.0.saturating_mul(UNITS_PER_CENT))
    }

    /// Widens to [`PreciseMoney`], or `None` if the result does not fit.
    #[inline]
    pub const fn checked_to_precise(&self) -> Option<PreciseMoney> {
        match self.0.checked_mul(UNITS_PER_CENT) {
            Some(units) => Some(PreciseMoney(units)),
            None => None,
        }
    }

    /// Calculates the exact tax on this amount.
    ///
    /// ## Implementation
    /// `cents × bps` is already expressed in 1/10 000 of a cent, so the
    /// result carries no rounding at all. The product is taken in i128 and
    /// narrowed with a range check; `None` means it does not fit in i64.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::types::TaxRate;
    ///
    /// let line = Money::from_cents(1000); // $10.00
    /// let tax = line.calculate_tax(TaxRate::from_bps(825)).unwrap(); // 8.25%
    /// assert_eq!(tax.units(), 8_250_000); // $0.825, unrounded
    /// assert_eq!(tax.round_to_cents().cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<PreciseMoney> {
        let units = self.0 as i128 * rate.bps() as i128;
        i64::try_from(units).ok().map(PreciseMoney)
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000);
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 2000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Display shows money in a human-readable format.
///
/// ## Note
/// This is for logs. Receipts format through the register configuration,
/// which knows the store's currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// PreciseMoney Type
// =============================================================================

/// A monetary value in 1/10 000 of a cent.
///
/// Internal precision for tax and tax-inclusive aggregates. Never shown to a
/// customer directly: call [`PreciseMoney::round_to_cents`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreciseMoney(i64);

impl PreciseMoney {
    /// Creates a value from raw 1/10 000-cent units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        PreciseMoney(units)
    }

    /// Raw 1/10 000-cent units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Adds, or `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(PreciseMoney(units)),
            None => None,
        }
    }

    #[inline]
    pub const fn zero() -> Self {
        PreciseMoney(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the larger of `self` and zero.
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            PreciseMoney(0)
        } else {
            *self
        }
    }

    /// Rounds to whole cents, half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::PreciseMoney;
    ///
    /// assert_eq!(PreciseMoney::from_units(5_000).round_to_cents().cents(), 1);
    /// assert_eq!(PreciseMoney::from_units(4_999).round_to_cents().cents(), 0);
    /// assert_eq!(PreciseMoney::from_units(-5_000).round_to_cents().cents(), -1);
    /// ```
    pub const fn round_to_cents(&self) -> Money {
        let half = UNITS_PER_CENT / 2;
        let cents = if self.0 >= 0 {
            (self.0 + half) / UNITS_PER_CENT
        } else {
            (self.0 - half) / UNITS_PER_CENT
        };
        Money::from_cents(cents)
    }
}

impl fmt::Display for PreciseMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.round_to_cents())
    }
}

impl Default for PreciseMoney {
    fn default() -> Self {
        PreciseMoney::zero()
    }
}

impl From<Money> for PreciseMoney {
    fn from(money: Money) -> Self {
        money.to_precise()
    }
}

impl Add for PreciseMoney {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        PreciseMoney(self.0 + other.0)
    }
}

impl AddAssign for PreciseMoney {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for PreciseMoney {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        PreciseMoney(self.0 - other.0)
    }
}

impl Sum for PreciseMoney {
    fn sum<I: Iterator<Item = PreciseMoney>>(iter: I) -> Self {
        iter.fold(PreciseMoney::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
