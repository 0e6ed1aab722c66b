//! # Refund Commands
//!
//! Commands behind the refund-review screen.

use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::{SessionState, Store, StoreState};
use tally_core::{Money, RefundRecord, Transaction, TransactionStatus};

/// Result of an accepted refund, enough to close the modal and repaint the row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResponse {
    pub record: RefundRecord,
    pub status: TransactionStatus,
    pub refunded: Money,
    pub remaining: Money,
}

/// Refunds `amount_cents` of a transaction, approved by the signed-in user.
///
/// ## Errors
/// - `NO_ACTIVE_CASHIER`: nobody signed in
/// - `NOT_FOUND`: unknown transaction
/// - `INVALID_AMOUNT`: zero or negative amount
/// - `OVER_REFUND`: more than is left to refund
/// - `VALIDATION_ERROR`: blank reason
pub fn refund_transaction(
    store: &StoreState,
    session: &SessionState,
    transaction_id: &str,
    amount_cents: i64,
    reason: &str,
) -> ApiResult<RefundResponse> {
    debug!(transaction_id = %transaction_id, amount_cents, "refund_transaction command");

    let actor_id = session.actor_id();

    store.with_store_mut(|s| -> ApiResult<RefundResponse> {
        let Store { catalog, ledger, .. } = s;
        let record = ledger.refund(
            transaction_id,
            Money::from_cents(amount_cents),
            reason,
            actor_id.as_deref(),
            catalog,
        )?;

        let transaction = ledger
            .get(transaction_id)
            .ok_or_else(|| ApiError::internal("Refunded transaction vanished"))?;

        Ok(RefundResponse {
            status: transaction.status,
            refunded: transaction.refund_amount,
            remaining: transaction.remaining_refundable(),
            record,
        })
    })
}

/// Transactions that can still take a refund, newest first.
pub fn refundable_transactions(store: &StoreState) -> Vec<Transaction> {
    store.with_store(|s| {
        s.ledger
            .transactions()
            .iter()
            .rev()
            .filter(|t| t.status != TransactionStatus::Refunded && t.total.is_positive())
            .cloned()
            .collect()
    })
}

/// The refund audit log, newest first.
pub fn list_refunds(store: &StoreState) -> Vec<RefundRecord> {
    store.with_store(|s| s.ledger.refunds().iter().rev().cloned().collect())
}

/// Refunds recorded against one transaction, oldest first.
pub fn refunds_for(store: &StoreState, transaction_id: &str) -> Vec<RefundRecord> {
    store.with_store(|s| s.ledger.refunds_for(transaction_id).cloned().collect())
}
