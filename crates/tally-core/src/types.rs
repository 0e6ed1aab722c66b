//! # Domain Types
//!
//! Reference types the ledger engine reads but does not own.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  price_cents    │   │  name           │   │  role           │       │
//! │  │  cost_cents     │   │  loyalty_points │   │                 │       │
//! │  │  stock          │   └─────────────────┘   └─────────────────┘       │
//! │  │  tax_rate_bps   │                                                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │    TaxRate      │   │ TransactionStatus   │   │ PaymentMethod   │   │
//! │  │  bps (u32)      │   │  Completed          │   │  Cash           │   │
//! │  │  1800 = 18%     │   │  PartiallyRefunded  │   │  Card           │   │
//! │  └─────────────────┘   │  Refunded           │   │  Upi            │   │
//! │                        └─────────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are owned by the catalog, customers by the customer directory and
//! users by the session. The engine copies what it needs into its own records.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (GST slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Carts and transactions hold clones of this struct, never references, so
/// later catalog edits cannot reach back into a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Unit cost in cents (for profit calculations).
    pub cost_cents: i64,

    /// On-hand stock count.
    pub stock: i64,

    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: u32,

    /// Category used by the reports screen.
    pub category: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// HSN classification code for GST.
    pub hsn_code: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the unit cost as a Money type.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Profit on a single unit. Negative when sold below cost.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.price() - self.cost()
    }

    /// Checks if `quantity` units can be taken from stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.is_active && self.stock >= quantity
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer from the customer directory. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub loyalty_points: i64,
}

impl Customer {
    /// The reference a cart carries for this customer.
    pub fn to_ref(&self) -> CustomerRef {
        CustomerRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// The part of a customer a cart needs: who to attribute the sale to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Cashier,
}

/// A signed-in actor: the cashier on checkouts, the approver on refunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: UserRole,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// UPI transfer confirmed by the cashier.
    Upi,
}

impl PaymentMethod {
    /// Stable lowercase name, as used on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// Refund state of a recorded transaction.
///
/// ```text
///   Completed ──partial──► PartiallyRefunded ──partial──► PartiallyRefunded
///       │                         │
///       └────────full─────────────┴──────full──────────► Refunded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// No refund has been applied.
    Completed,
    /// Some, but not all, of the total has been refunded.
    PartiallyRefunded,
    /// Cumulative refunds reached the total.
    Refunded,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Completed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price_cents: i64, cost_cents: i64, stock: i64) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Notebook Set".to_string(),
            price_cents,
            cost_cents,
            stock,
            tax_rate_bps: 1200,
            category: "Stationery".to_string(),
            barcode: None,
            hsn_code: None,
            is_active: true,
        }
    }

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(1800).to_string(), "18%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
    }

    #[test]
    fn test_unit_margin() {
        let p = product(899, 450, 2);
        assert_eq!(p.unit_margin(), Money::from_cents(449));
    }

    #[test]
    fn test_can_sell() {
        let mut p = product(899, 450, 2);
        assert!(p.can_sell(2));
        assert!(!p.can_sell(3));

        p.is_active = false;
        assert!(!p.can_sell(1));
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&TransactionStatus::PartiallyRefunded).unwrap();
        assert_eq!(json, "\"partially_refunded\"");
        assert_eq!(TransactionStatus::default(), TransactionStatus::Completed);
    }

    #[test]
    fn test_payment_method_names() {
        assert_eq!(PaymentMethod::Upi.to_string(), "upi");
        let json = serde_json::to_string(&PaymentMethod::Card).unwrap();
        assert_eq!(json, "\"card\"");
    }
}
