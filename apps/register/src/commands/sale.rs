//! # Sale Commands
//!
//! Checkout and receipts.
//!
//! ## Checkout Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(PaymentMethod)                                                │
//! │     │                                                                   │
//! │     ├── session ──► cashier id (None ⇒ NO_ACTIVE_CASHIER)              │
//! │     ├── lock cart                                                       │
//! │     │     └── lock store                                                │
//! │     │           └── ledger.checkout(cart, method, cashier, catalog)    │
//! │     ├── cart.clear()   (only after the ledger accepted the sale)       │
//! │     └── ReceiptResponse                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::{CartState, ConfigState, SessionState, Store, StoreState};
use tally_core::{Money, PaymentMethod, Transaction};

/// A printable receipt. Amounts are pre-formatted with the store currency.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub transaction_id: String,
    pub receipt_number: String,
    pub store_name: String,
    pub store_address: Vec<String>,
    pub device_id: String,
    pub timestamp: String,
    pub cashier: String,
    pub customer: Option<String>,
    pub payment_method: PaymentMethod,
    pub items: Vec<ReceiptItem>,
    pub subtotal: String,
    pub tax: String,
    /// `None` when no discount was given.
    pub discount: Option<String>,
    pub total: String,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub hsn_code: Option<String>,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

impl ReceiptResponse {
    pub fn new(transaction: &Transaction, config: &ConfigState, cashier: &str) -> Self {
        let money = |m: Money| config.format_currency(m);

        ReceiptResponse {
            transaction_id: transaction.id.clone(),
            receipt_number: transaction.receipt_number.clone(),
            store_name: config.store_name.clone(),
            store_address: config.store_address.clone(),
            device_id: config.device_id.clone(),
            timestamp: transaction.created_at.to_rfc3339(),
            cashier: cashier.to_string(),
            customer: transaction.customer.as_ref().map(|c| c.name.clone()),
            payment_method: transaction.payment_method,
            items: transaction
                .items
                .iter()
                .map(|line| ReceiptItem {
                    name: line.product.name.clone(),
                    hsn_code: line.product.hsn_code.clone(),
                    quantity: line.quantity,
                    unit_price: money(line.product.price()),
                    line_total: money(line.subtotal),
                })
                .collect(),
            subtotal: money(transaction.subtotal),
            tax: money(transaction.total_tax),
            discount: transaction
                .discount
                .is_positive()
                .then(|| money(transaction.discount)),
            total: money(transaction.total),
            total_cents: transaction.total.cents(),
        }
    }

    /// Plain-text rendering for a receipt printer or a terminal.
    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        out.push(self.store_name.clone());
        out.extend(self.store_address.iter().cloned());
        out.push(String::new());
        out.push(format!("Receipt  #{}", self.receipt_number));
        out.push(format!("Date     {}", self.timestamp));
        out.push(format!("Cashier  {}", self.cashier));
        if let Some(customer) = &self.customer {
            out.push(format!("Customer {}", customer));
        }
        out.push(format!("Payment  {}", self.payment_method));
        out.push(String::new());
        for item in &self.items {
            out.push(format!("{:<28}{:>12}", item.name, item.line_total));
            out.push(format!("  {} x {}", item.quantity, item.unit_price));
        }
        out.push(String::new());
        out.push(format!("{:<28}{:>12}", "Subtotal", self.subtotal));
        out.push(format!("{:<28}{:>12}", "Tax", self.tax));
        if let Some(discount) = &self.discount {
            out.push(format!("{:<28}{:>12}", "Discount", format!("-{}", discount)));
        }
        out.push(format!("{:<28}{:>12}", "TOTAL", self.total));
        out.join("\n")
    }
}

/// Records the sale in the cart and returns its receipt.
///
/// The cart is cleared only when the ledger accepts the sale. A declined
/// checkout leaves cart, catalog and ledger exactly as they were.
pub fn checkout(
    store: &StoreState,
    cart: &CartState,
    session: &SessionState,
    config: &ConfigState,
    payment_method: PaymentMethod,
) -> ApiResult<ReceiptResponse> {
    debug!(payment_method = %payment_method, "checkout command");

    let cashier = session.current_user();
    let cashier_id = cashier.as_ref().map(|u| u.id.as_str());

    let transaction = cart.with_cart_mut(|c| -> ApiResult<Transaction> {
        let transaction = store.with_store_mut(|s| {
            let Store { catalog, ledger, .. } = s;
            ledger.checkout(c, payment_method, cashier_id, catalog)
        })?;
        c.clear();
        Ok(transaction)
    })?;

    info!(
        transaction_id = %transaction.id,
        device_id = %config.device_id,
        "Sale recorded, cart cleared"
    );

    let cashier_name = cashier.map(|u| u.name).unwrap_or_default();
    Ok(ReceiptResponse::new(&transaction, config, &cashier_name))
}

/// Rebuilds the receipt of a recorded transaction.
pub fn get_receipt(
    store: &StoreState,
    config: &ConfigState,
    transaction_id: &str,
) -> ApiResult<ReceiptResponse> {
    store.with_store(|s| -> ApiResult<ReceiptResponse> {
        let transaction = s
            .ledger
            .get(transaction_id)
            .ok_or_else(|| ApiError::not_found("Transaction", transaction_id))?;

        let cashier = s
            .users
            .iter()
            .find(|u| u.id == transaction.cashier_id)
            .map_or(transaction.cashier_id.as_str(), |u| u.name.as_str());

        Ok(ReceiptResponse::new(transaction, config, cashier))
    })
}

/// All recorded transactions, newest first.
pub fn list_transactions(store: &StoreState) -> Vec<Transaction> {
    store.with_store(|s| s.ledger.transactions().iter().rev().cloned().collect())
}
