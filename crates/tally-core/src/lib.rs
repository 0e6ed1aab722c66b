//! # tally-core: Transaction Ledger Engine for Tally POS
//!
//! This crate turns a mutable cart into an immutable, tax-computed,
//! partially refundable record and keeps catalog stock consistent with it.
//! It performs no I/O: time, ids and the product catalog come in through
//! traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI collaborators                             │   │
//! │  │    Sales screen ──► Cart panel ──► Payment ──► Refund review    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-register (commands + state)               │   │
//! │  │    add_to_cart, checkout, refund_transaction, sales_report      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │ pricing  │─►│   cart   │─►│  ledger  │─►│  refund  │       │   │
//! │  │   │ one line │  │ aggregate│  │ checkout │  │ processor│       │   │
//! │  │   └──────────┘  └──────────┘  └────┬─────┘  └────┬─────┘       │   │
//! │  │                                    │ stock       │ stock        │   │
//! │  │                               ┌────▼─────────────▼────┐         │   │
//! │  │                               │  catalog (trait)      │         │   │
//! │  │                               └───────────────────────┘         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO GLOBAL STATE          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer cents, plus exact sub-cent amounts for tax
//! - [`types`] - Domain types (Product, Customer, User, PaymentMethod)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`pricing`] - Per-line subtotal, tax and total
//! - [`cart`] - The active cart and its totals
//! - [`catalog`] - The catalog seam and an in-memory catalog
//! - [`clock`] - Time and id sources
//! - [`ledger`] - Checkout and the transaction record
//! - [`refund`] - Partial and full refunds
//! - [`report`] - Sales reports over the ledger
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{Cart, Catalog, InMemoryCatalog, Ledger, Money, PaymentMethod, Product};
//!
//! let mut catalog = InMemoryCatalog::new();
//! catalog.insert(Product {
//!     id: "p-1".into(),
//!     name: "Wireless Mouse".into(),
//!     price_cents: 1000,
//!     cost_cents: 700,
//!     stock: 10,
//!     tax_rate_bps: 1800,
//!     category: "Electronics".into(),
//!     barcode: None,
//!     hsn_code: None,
//!     is_active: true,
//! }).unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(catalog.get("p-1").unwrap(), 2).unwrap();
//! cart.set_discount(Money::from_cents(200)).unwrap();
//!
//! let mut ledger = Ledger::new();
//! let tx = ledger.checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut catalog).unwrap();
//! cart.clear();
//!
//! assert_eq!(tx.total, Money::from_cents(2160)); // 20.00 + 3.60 − 2.00
//! assert_eq!(catalog.get("p-1").unwrap().stock, 8);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod refund;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::{
    Catalog, InMemoryCatalog, InventorySummary, StockChange, StockLog, StockReason,
};
pub use clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Ledger, Transaction};
pub use money::{Money, PreciseMoney};
pub use refund::RefundRecord;
pub use report::{ReportPeriod, SalesReport};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps receipts printable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Catches typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest price or cost a catalog product may carry ($10,000,000.00)
///
/// ## Why This Bound
/// A full cart is `MAX_CART_ITEMS` lines of `MAX_ITEM_QUANTITY` units, each
/// priced with up to 100% tax in 1/10 000 of a cent. At this cap that sum
/// stays near 2×10¹⁸, inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// A product at or below this stock (and above zero) counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
