//! # Transaction Ledger
//!
//! Turns a finished cart into a recorded transaction and keeps every
//! transaction and refund the register has produced.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout()                                      │
//! │                                                                         │
//! │  1. Preconditions (nothing mutated yet)                                │
//! │     ├── cart has lines ─────────────────────────► else EmptyCart       │
//! │     ├── cashier signed in ──────────────────────► else NoActiveCashier │
//! │     └── every line: product in catalog, ────────► else NotFound /      │
//! │         live stock >= line quantity                   OutOfStock        │
//! │                                                                         │
//! │  2. Apply                                                               │
//! │     ├── catalog.set_stocks(stock − qty for every line), all or none   │
//! │     ├── settle totals (rounded once, to cents)                         │
//! │     └── append Transaction { status: Completed, refund_amount: 0 }     │
//! │                                                                         │
//! │  3. Caller clears the cart                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A transaction's line snapshots and settled totals never change once it is
//! recorded. The ledger hands out shared references only; the refund
//! processor (see `refund`) is the one writer of the refund fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;
use ts_rs::TS;

use crate::cart::{Cart, CartLine};
use crate::catalog::{Catalog, StockChange, StockReason};
use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::refund::RefundRecord;
use crate::types::{CustomerRef, PaymentMethod, TransactionStatus};
use crate::validation::require_actor;

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale.
///
/// ## Settled Totals
/// ```text
/// subtotal  = Σ line subtotal                      (exact cents)
/// total_tax = round(Σ line tax)                    (rounded once)
/// discount  = cart discount
/// total     = max(0, subtotal + total_tax − discount)
/// profit    = Σ (price − cost) × quantity          (before tax and discount)
/// ```
///
/// ## Invariants
/// - `0 <= refund_amount <= total`
/// - `status == Completed` until the first refund
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    /// Human-readable number printed on the receipt (`YYMMDD-HHMMSS-NNNN`).
    pub receipt_number: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Copies of the cart lines at checkout.
    pub items: Vec<CartLine>,

    pub subtotal: Money,
    pub total_tax: Money,
    pub discount: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub customer: Option<CustomerRef>,
    pub cashier_id: String,
    pub profit: Money,

    // Refund tracking. The latest refund overwrites date, reason and actor;
    // the amount accumulates.
    pub status: TransactionStatus,
    pub refund_amount: Money,
    #[ts(as = "Option<String>")]
    pub refund_date: Option<DateTime<Utc>>,
    pub refund_reason: Option<String>,
    pub refunded_by: Option<String>,
}

impl Transaction {
    pub fn customer_id(&self) -> Option<&str> {
        self.customer.as_ref().map(|c| c.id.as_str())
    }

    /// `total − refund_amount`.
    pub fn remaining_refundable(&self) -> Money {
        self.total - self.refund_amount
    }

    pub fn is_fully_refunded(&self) -> bool {
        self.status == TransactionStatus::Refunded
    }

    /// Total units sold across lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Σ cost × quantity.
    pub fn cost_of_goods(&self) -> Money {
        self.items.iter().map(CartLine::cost).sum()
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Every transaction and refund, in the order they happened.
pub struct Ledger {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) refunds: Vec<RefundRecord>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) ids: Arc<dyn IdGenerator>,
    sequence: u32,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("transactions", &self.transactions.len())
            .field("refunds", &self.refunds.len())
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Empty ledger using wall-clock time and UUIDs.
    pub fn new() -> Self {
        Self::with_sources(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn with_sources(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Ledger {
            transactions: Vec::new(),
            refunds: Vec::new(),
            clock,
            ids,
            sequence: 0,
        }
    }

    /// Records the sale of everything in `cart` and takes the stock.
    ///
    /// Either the stock decrements and the new transaction both happen, or
    /// neither does. The cart itself is left untouched; clearing it is the
    /// caller's job.
    ///
    /// ## Errors
    /// - `EmptyCart`: the cart has no lines
    /// - `NoActiveCashier`: `cashier_id` is absent or blank
    /// - `NotFound`: a line's product is no longer in the catalog
    /// - `OutOfStock`: live stock is below a line quantity
    /// - any error from [`Catalog::set_stocks`], after it has undone its writes
    pub fn checkout<C: Catalog>(
        &mut self,
        cart: &Cart,
        payment_method: PaymentMethod,
        cashier_id: Option<&str>,
        catalog: &mut C,
    ) -> CoreResult<Transaction> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let cashier_id = require_actor(cashier_id)?;

        let mut decrements = Vec::with_capacity(cart.item_count());
        for line in cart.lines() {
            let product = catalog
                .get(line.product_id())
                .ok_or_else(|| CoreError::not_found("Product", line.product_id()))?;

            if product.stock < line.quantity {
                return Err(CoreError::OutOfStock {
                    product_id: product.id.clone(),
                    available: product.stock,
                    requested: line.quantity,
                });
            }
            decrements.push(StockChange {
                product_id: product.id.clone(),
                from: product.stock,
                to: product.stock - line.quantity,
            });
        }

        let id = self.ids.next_id();
        let created_at = self.clock.now();

        let reason = StockReason::Sale {
            transaction_id: id.clone(),
        };
        catalog.set_stocks(&decrements, &reason)?;
        self.sequence += 1;

        let subtotal = cart.subtotal();
        let total_tax = cart.tax().round_to_cents();
        let discount = cart.discount();

        let transaction = Transaction {
            receipt_number: receipt_number(created_at, self.sequence),
            id,
            created_at,
            items: cart.lines().to_vec(),
            subtotal,
            total_tax,
            discount,
            total: (subtotal + total_tax - discount).floor_zero(),
            payment_method,
            customer: cart.customer().cloned(),
            cashier_id: cashier_id.to_string(),
            profit: cart.profit(),
            status: TransactionStatus::Completed,
            refund_amount: Money::zero(),
            refund_date: None,
            refund_reason: None,
            refunded_by: None,
        };

        info!(
            transaction_id = %transaction.id,
            receipt = %transaction.receipt_number,
            total = %transaction.total,
            items = transaction.items.len(),
            payment_method = %payment_method,
            cashier_id = %transaction.cashier_id,
            "Checkout completed"
        );

        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn get(&self, transaction_id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == transaction_id)
    }

    /// All transactions, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The refund audit log, oldest first.
    pub fn refunds(&self) -> &[RefundRecord] {
        &self.refunds
    }

    pub fn refunds_for<'a>(
        &'a self,
        transaction_id: &'a str,
    ) -> impl Iterator<Item = &'a RefundRecord> {
        self.refunds
            .iter()
            .filter(move |r| r.transaction_id == transaction_id)
    }

    /// What can still be refunded on a transaction.
    pub fn remaining_refundable(&self, transaction_id: &str) -> CoreResult<Money> {
        self.get(transaction_id)
            .map(Transaction::remaining_refundable)
            .ok_or_else(|| CoreError::not_found("Transaction", transaction_id))
    }

    pub(crate) fn position(&self, transaction_id: &str) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == transaction_id)
    }
}

/// `YYMMDD-HHMMSS-NNNN`, NNNN wrapping every 10 000 sales.
fn receipt_number(at: DateTime<Utc>, sequence: u32) -> String {
    format!("{}-{:04}", at.format("%y%m%d-%H%M%S"), sequence % 10_000)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::clock::{FixedClock, SequentialIds};
    use crate::types::Product;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap()
    }

    fn ledger() -> Ledger {
        Ledger::with_sources(Arc::new(FixedClock(at())), Arc::new(SequentialIds::new("tx")))
    }

    fn product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            cost_cents: price_cents * 6 / 10,
            stock,
            tax_rate_bps: 1800,
            category: "Electronics".to_string(),
            barcode: None,
            hsn_code: None,
            is_active: true,
        }
    }

    fn setup() -> (Ledger, InMemoryCatalog, Cart) {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(product("1", 1000, 10)).unwrap();
        catalog.insert(product("2", 250, 4)).unwrap();

        let mut cart = Cart::new();
        cart.add_item(catalog.get("1").unwrap(), 2).unwrap();

        (ledger(), catalog, cart)
    }

    #[test]
    fn test_checkout_records_transaction_and_takes_stock() {
        let (mut ledger, mut catalog, mut cart) = setup();
        cart.set_discount(Money::from_cents(200)).unwrap();

        let tx = ledger
            .checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut catalog)
            .unwrap();

        assert_eq!(tx.id, "tx-1");
        assert_eq!(tx.receipt_number, "240309-143005-0001");
        assert_eq!(tx.subtotal, Money::from_cents(2000));
        assert_eq!(tx.total_tax, Money::from_cents(360));
        assert_eq!(tx.total, Money::from_cents(2160));
        assert_eq!(tx.profit, Money::from_cents(800));
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.refund_amount, Money::zero());
        assert_eq!(tx.cashier_id, "u-1");

        assert_eq!(catalog.get("1").unwrap().stock, 8);
        assert_eq!(ledger.transactions().len(), 1);
        assert_eq!(ledger.get("tx-1"), Some(&tx));
    }

    #[test]
    fn test_checkout_empty_cart() {
        let (mut ledger, mut catalog, _) = setup();

        let err = ledger
            .checkout(&Cart::new(), PaymentMethod::Card, Some("u-1"), &mut catalog)
            .unwrap_err();
        assert_eq!(err, CoreError::EmptyCart);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_checkout_without_cashier() {
        let (mut ledger, mut catalog, cart) = setup();

        for cashier in [None, Some(""), Some("  ")] {
            let err = ledger
                .checkout(&cart, PaymentMethod::Cash, cashier, &mut catalog)
                .unwrap_err();
            assert_eq!(err, CoreError::NoActiveCashier);
        }
        assert_eq!(catalog.get("1").unwrap().stock, 10);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_checkout_rechecks_live_stock_without_partial_apply() {
        let (mut ledger, mut catalog, mut cart) = setup();
        cart.add_item(catalog.get("2").unwrap(), 3).unwrap();

        // Stock for the second line drops after it went into the cart.
        catalog.adjust_stock("2", 1).unwrap();

        let err = ledger
            .checkout(&cart, PaymentMethod::Upi, Some("u-1"), &mut catalog)
            .unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { available: 1, requested: 3, .. }));

        // First line's stock was not touched.
        assert_eq!(catalog.get("1").unwrap().stock, 10);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_checkout_product_removed_from_catalog() {
        let (mut ledger, _, cart) = setup();
        let mut other_catalog = InMemoryCatalog::new();

        let err = ledger
            .checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut other_catalog)
            .unwrap_err();
        assert_eq!(err, CoreError::not_found("Product", "1"));
    }

    #[test]
    fn test_snapshot_survives_catalog_edit() {
        let (mut ledger, mut catalog, cart) = setup();
        let tx = ledger
            .checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut catalog)
            .unwrap();

        let mut edited = catalog.get("1").unwrap().clone();
        edited.price_cents = 9999;
        edited.name = "Renamed".to_string();
        catalog.update(edited).unwrap();

        let recorded = ledger.get(&tx.id).unwrap();
        assert_eq!(recorded.items[0].product.price_cents, 1000);
        assert_eq!(recorded.items[0].product.name, "Product 1");
    }

    #[test]
    fn test_discount_never_makes_total_negative() {
        let (mut ledger, mut catalog, mut cart) = setup();
        cart.set_discount(Money::from_cents(100_000)).unwrap();

        let tx = ledger
            .checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut catalog)
            .unwrap();
        assert_eq!(tx.total, Money::zero());
    }

    #[test]
    fn test_settled_total_matches_cart_grand_total() {
        let (mut ledger, mut catalog, mut cart) = setup();
        cart.add_item(catalog.get("2").unwrap(), 3).unwrap();
        cart.set_discount(Money::from_cents(37)).unwrap();

        let expected = cart.totals().grand_total;
        let tx = ledger
            .checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut catalog)
            .unwrap();
        assert_eq!(tx.total, expected);
        assert_eq!(tx.total, tx.subtotal + tx.total_tax - tx.discount);
    }

    #[test]
    fn test_sequence_advances_per_checkout() {
        let (mut ledger, mut catalog, cart) = setup();

        ledger
            .checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut catalog)
            .unwrap();
        let second = ledger
            .checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut catalog)
            .unwrap();

        assert!(second.receipt_number.ends_with("-0002"));
        assert_eq!(catalog.get("1").unwrap().stock, 6);
    }

    #[test]
    fn test_remaining_refundable_unknown_transaction() {
        let ledger = ledger();
        assert_eq!(
            ledger.remaining_refundable("nope"),
            Err(CoreError::not_found("Transaction", "nope"))
        );
    }
}
