//! # Refund Processor
//!
//! Applies partial and full refunds to recorded transactions.
//!
//! ## Refund Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          refund()                                       │
//! │                                                                         │
//! │  Checks, in order (a failure changes nothing):                          │
//! │    actor signed in ─────────────────────────────► NoActiveCashier       │
//! │    transaction exists ──────────────────────────► NotFound              │
//! │    amount > 0 ──────────────────────────────────► InvalidAmount         │
//! │    refund_amount + amount <= total ─────────────► OverRefund            │
//! │    reason not blank ────────────────────────────► Validation            │
//! │                                                                         │
//! │  Apply:                                                                 │
//! │    status = Refunded if refund_amount + amount >= total                 │
//! │             else PartiallyRefunded                                      │
//! │    on the transition to Refunded: put every line's quantity back        │
//! │      (catalog.set_stocks, all or none; a failure stops here)            │
//! │    refund_amount += amount                                              │
//! │    refund_date / refund_reason / refunded_by = this call                │
//! │    append RefundRecord                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Policy
//! Stock comes back only when a refund makes the transaction fully refunded,
//! and then for every line in full. Partial refunds return no stock, however
//! large. A product deleted from the catalog since the sale is skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use crate::catalog::{Catalog, StockChange, StockReason};
use crate::error::{CoreError, CoreResult};
use crate::ledger::{Ledger, Transaction};
use crate::money::Money;
use crate::types::{PaymentMethod, TransactionStatus};
use crate::validation::{require_actor, validate_refund_amount, validate_refund_reason};

/// One applied refund. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RefundRecord {
    pub id: String,
    pub transaction_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub reason: String,
    pub refunded_by: String,
    /// Copied from the transaction; the money goes back the way it came.
    pub payment_method: PaymentMethod,
}

impl Ledger {
    /// Refunds `amount` against a recorded transaction.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::cart::Cart;
    /// use tally_core::catalog::{Catalog, InMemoryCatalog};
    /// use tally_core::ledger::Ledger;
    /// use tally_core::money::Money;
    /// use tally_core::types::{PaymentMethod, Product, TransactionStatus};
    ///
    /// let mut catalog = InMemoryCatalog::new();
    /// catalog.insert(Product {
    ///     id: "p-1".into(),
    ///     name: "Desk Lamp".into(),
    ///     price_cents: 1000,
    ///     cost_cents: 600,
    ///     stock: 5,
    ///     tax_rate_bps: 0,
    ///     category: "Home".into(),
    ///     barcode: None,
    ///     hsn_code: None,
    ///     is_active: true,
    /// }).unwrap();
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item(catalog.get("p-1").unwrap(), 1).unwrap();
    ///
    /// let mut ledger = Ledger::new();
    /// let tx = ledger.checkout(&cart, PaymentMethod::Cash, Some("u-1"), &mut catalog).unwrap();
    ///
    /// ledger.refund(&tx.id, Money::from_cents(400), "Scratched", Some("u-1"), &mut catalog).unwrap();
    /// assert_eq!(ledger.get(&tx.id).unwrap().status, TransactionStatus::PartiallyRefunded);
    /// assert_eq!(catalog.get("p-1").unwrap().stock, 4);
    /// ```
    pub fn refund<C: Catalog>(
        &mut self,
        transaction_id: &str,
        amount: Money,
        reason: &str,
        actor_id: Option<&str>,
        catalog: &mut C,
    ) -> CoreResult<RefundRecord> {
        let actor_id = require_actor(actor_id)?;

        let index = self
            .position(transaction_id)
            .ok_or_else(|| CoreError::not_found("Transaction", transaction_id))?;

        validate_refund_amount(amount)?;

        let remaining = self.transactions[index].remaining_refundable();
        if amount > remaining {
            warn!(
                transaction_id = %transaction_id,
                requested = %amount,
                remaining = %remaining,
                "Refund exceeds refundable balance"
            );
            return Err(CoreError::OverRefund {
                requested: amount,
                remaining,
            });
        }

        let reason = validate_refund_reason(reason)?;

        let transaction = &self.transactions[index];
        let refunded = transaction.refund_amount + amount;
        let status = if refunded >= transaction.total {
            TransactionStatus::Refunded
        } else {
            TransactionStatus::PartiallyRefunded
        };

        // Stock goes back first; if the catalog declines, nothing is recorded.
        if status == TransactionStatus::Refunded {
            let restores = restock_changes(transaction, catalog);
            let restore = StockReason::FullRefund {
                transaction_id: transaction.id.clone(),
            };
            catalog.set_stocks(&restores, &restore)?;
        }

        let record = RefundRecord {
            id: self.ids.next_id(),
            transaction_id: transaction_id.to_string(),
            date: self.clock.now(),
            amount,
            reason,
            refunded_by: actor_id.to_string(),
            payment_method: transaction.payment_method,
        };

        let transaction = &mut self.transactions[index];
        transaction.refund_amount = refunded;
        transaction.status = status;
        transaction.refund_date = Some(record.date);
        transaction.refund_reason = Some(record.reason.clone());
        transaction.refunded_by = Some(record.refunded_by.clone());

        info!(
            transaction_id = %transaction.id,
            amount = %amount,
            refunded = %transaction.refund_amount,
            status = ?transaction.status,
            refunded_by = %record.refunded_by,
            "Refund applied"
        );

        self.refunds.push(record.clone());
        Ok(record)
    }
}

/// Puts every line's quantity back on the shelf. Products no longer in the
/// catalog are skipped.
fn restock_changes<C: Catalog>(transaction: &Transaction, catalog: &C) -> Vec<StockChange> {
    transaction
        .items
        .iter()
        .filter_map(|line| {
            let Some(product) = catalog.get(line.product_id()) else {
                warn!(
                    product_id = %line.product_id(),
                    transaction_id = %transaction.id,
                    "Product no longer in catalog; stock not restored"
                );
                return None;
            };
            Some(StockChange {
                product_id: product.id.clone(),
                from: product.stock,
                to: product.stock + line.quantity,
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
