//! # Pricing Calculator
//!
//! Prices one line: a unit price and tax rate applied to a quantity.
//!
//! ```text
//! subtotal       = unit_price × quantity            (whole cents, exact)
//! tax            = subtotal × tax_rate / 100        (PreciseMoney, exact)
//! total_with_tax = subtotal + tax                   (PreciseMoney, exact)
//! ```
//!
//! Nothing here rounds. The cart sums these exact values and rounds once;
//! see the `money` module for the drift this avoids.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, PreciseMoney};
use crate::types::TaxRate;

/// The priced amounts of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LinePricing {
    pub subtotal: Money,
    pub tax: PreciseMoney,
    pub total_with_tax: PreciseMoney,
}

impl LinePricing {
    /// Prices `quantity` units.
    ///
    /// Callers validate `unit_price >= 0` and `quantity > 0`; the result is
    /// then non-negative in every field. Amounts that overflow come back as
    /// `AmountTooLarge` for `product_id`.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::pricing::LinePricing;
    /// use tally_core::types::TaxRate;
    ///
    /// let line = LinePricing::compute("p-1", Money::from_cents(1000), TaxRate::from_bps(1800), 2).unwrap();
    /// assert_eq!(line.subtotal.cents(), 2000);
    /// assert_eq!(line.tax.round_to_cents().cents(), 360);
    /// assert_eq!(line.total_with_tax.round_to_cents().cents(), 2360);
    /// ```
    pub fn compute(
        product_id: &str,
        unit_price: Money,
        tax_rate: TaxRate,
        quantity: i64,
    ) -> CoreResult<Self> {
        let priced = unit_price.checked_multiply_quantity(quantity).and_then(|subtotal| {
            let tax = subtotal.calculate_tax(tax_rate)?;
            let total_with_tax = subtotal.checked_to_precise()?.checked_add(tax)?;
            Some(LinePricing {
                subtotal,
                tax,
                total_with_tax,
            })
        });

        priced.ok_or_else(|| CoreError::AmountTooLarge {
            product_id: product_id.to_string(),
        })
    }

    /// Line tax rounded for display.
    pub fn display_tax(&self) -> Money {
        self.tax.round_to_cents()
    }

    /// Line total rounded for display.
    pub fn display_total(&self) -> Money {
        self.total_with_tax.round_to_cents()
    }
}
