//! # Product Catalog
//!
//! The engine's view of the product catalog, and an in-memory catalog that
//! satisfies it.
//!
//! ## Seam
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Ledger::checkout ──► catalog.get(id)         read price / stock       │
//! │                   └──► catalog.set_stocks(..)  decrement every line     │
//! │                                                                         │
//! │   Ledger::refund   ──► catalog.set_stocks(..)  restore on full refund   │
//! │                                                                         │
//! │   Inventory screen ──► InMemoryCatalog::adjust_stock / insert / update │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is the one field two engine flows write (checkout decrements, full
//! refund restores). Every write goes through [`Catalog::set_stock`] with a
//! [`StockReason`], and the in-memory catalog keeps a [`StockLog`] of each
//! change. The ledger writes a whole sale or refund at once through
//! [`Catalog::set_stocks`], which either applies every change or none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};
use ts_rs::TS;

use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{
    validate_barcode, validate_price_cents, validate_product_name, validate_stock,
    validate_tax_rate_bps,
};
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Catalog Trait
// =============================================================================

/// Why a stock level changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockReason {
    /// Units left with a checked-out transaction.
    Sale { transaction_id: String },
    /// Units returned because the transaction was fully refunded.
    FullRefund { transaction_id: String },
    /// A person set the count by hand.
    Adjustment,
    /// Undoes a write made for the inner reason after a later write failed.
    Reversal(Box<StockReason>),
}

impl fmt::Display for StockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockReason::Sale { transaction_id } => write!(f, "Sale {}", transaction_id),
            StockReason::FullRefund { transaction_id } => {
                write!(f, "Full refund of {}", transaction_id)
            }
            StockReason::Adjustment => f.write_str("Manual stock adjustment"),
            StockReason::Reversal(inner) => write!(f, "Reversal of {}", inner),
        }
    }
}

/// Read products by id, write stock by id.
pub trait Catalog {
    /// Looks up a product.
    fn get(&self, product_id: &str) -> Option<&Product>;

    /// Sets a product's on-hand count.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown product
    /// - `Validation` for a negative count
    fn set_stock(&mut self, product_id: &str, stock: i64, reason: &StockReason) -> CoreResult<()>;

    /// Applies every change, or none of them.
    ///
    /// The default writes each change through [`Catalog::set_stock`] in
    /// order. When a write fails, the ones already made are set back to
    /// their `from` counts, newest first, and the failing error is returned.
    /// Catalogs backed by a transactional store can override this.
    fn set_stocks(&mut self, changes: &[StockChange], reason: &StockReason) -> CoreResult<()> {
        for (applied, change) in changes.iter().enumerate() {
            if let Err(err) = self.set_stock(&change.product_id, change.to, reason) {
                let reversal = StockReason::Reversal(Box::new(reason.clone()));
                for done in changes[..applied].iter().rev() {
                    if let Err(undo) = self.set_stock(&done.product_id, done.from, &reversal) {
                        error!(
                            product_id = %done.product_id,
                            error = %undo,
                            "Stock could not be restored after a failed write"
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

/// A planned stock write for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    pub product_id: String,
    /// Count before the write, used to undo it.
    pub from: i64,
    pub to: i64,
}

// =============================================================================
// Stock Log
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockDirection {
    In,
    Out,
}

/// One recorded stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLog {
    pub id: String,
    pub product_id: String,
    pub direction: StockDirection,
    /// Units moved (always positive).
    pub quantity: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub notes: String,
}

// =============================================================================
// Inventory Summary
// =============================================================================

/// Headline figures for the inventory screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub product_count: usize,
    /// Products with `0 < stock <= LOW_STOCK_THRESHOLD`.
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    /// Σ price × stock.
    pub inventory_value: Money,
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// A catalog held in memory, in insertion order.
#[derive(Clone)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    stock_logs: Vec<StockLog>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("products", &self.products.len())
            .field("stock_logs", &self.stock_logs.len())
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    /// Empty catalog stamping logs with wall-clock time and UUIDs.
    pub fn new() -> Self {
        Self::with_sources(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn with_sources(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        InMemoryCatalog {
            products: Vec::new(),
            stock_logs: Vec::new(),
            clock,
            ids,
        }
    }

    /// Adds a product.
    ///
    /// ## Rules
    /// - Name required, at most 200 characters
    /// - Price and cost >= 0, stock >= 0, tax rate <= 100%
    /// - Barcode, if present, is 8-13 digits
    /// - Id must be unique
    pub fn insert(&mut self, product: Product) -> CoreResult<()> {
        validate_product(&product)?;

        if self.get(&product.id).is_some() {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: product.id,
            }
            .into());
        }

        debug!(product_id = %product.id, name = %product.name, "Product added to catalog");
        self.products.push(product);
        Ok(())
    }

    /// Replaces a product's details.
    ///
    /// A changed stock count is logged as a manual adjustment.
    pub fn update(&mut self, product: Product) -> CoreResult<()> {
        validate_product(&product)?;

        let index = self
            .position(&product.id)
            .ok_or_else(|| CoreError::not_found("Product", product.id.clone()))?;

        let previous = self.products[index].stock;
        if previous != product.stock {
            self.record(&product.id, previous, product.stock, &StockReason::Adjustment);
        }

        debug!(product_id = %product.id, "Product updated");
        self.products[index] = product;
        Ok(())
    }

    /// Sets a product's stock by hand.
    pub fn adjust_stock(&mut self, product_id: &str, stock: i64) -> CoreResult<()> {
        self.set_stock(product_id, stock, &StockReason::Adjustment)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.barcode.as_deref() == Some(barcode))
    }

    /// All stock movements, oldest first.
    pub fn stock_logs(&self) -> &[StockLog] {
        &self.stock_logs
    }

    pub fn stock_logs_for<'a>(&'a self, product_id: &'a str) -> impl Iterator<Item = &'a StockLog> {
        self.stock_logs
            .iter()
            .filter(move |log| log.product_id == product_id)
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary {
            product_count: self.products.len(),
            low_stock_count: self
                .products
                .iter()
                .filter(|p| p.stock > 0 && p.stock <= LOW_STOCK_THRESHOLD)
                .count(),
            out_of_stock_count: self.products.iter().filter(|p| p.stock == 0).count(),
            inventory_value: self
                .products
                .iter()
                .map(|p| p.price().multiply_quantity(p.stock))
                .fold(Money::zero(), Money::saturating_add),
        }
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == product_id)
    }

    fn record(&mut self, product_id: &str, from: i64, to: i64, reason: &StockReason) {
        let direction = if to > from {
            StockDirection::In
        } else {
            StockDirection::Out
        };

        self.stock_logs.push(StockLog {
            id: self.ids.next_id(),
            product_id: product_id.to_string(),
            direction,
            quantity: (to - from).abs(),
            date: self.clock.now(),
            notes: reason.to_string(),
        });
    }
}

impl Catalog for InMemoryCatalog {
    fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    fn set_stock(&mut self, product_id: &str, stock: i64, reason: &StockReason) -> CoreResult<()> {
        validate_stock(stock)?;

        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::not_found("Product", product_id))?;

        let previous = self.products[index].stock;
        if previous == stock {
            return Ok(());
        }

        self.products[index].stock = stock;
        self.record(product_id, previous, stock, reason);

        debug!(product_id = %product_id, from = previous, to = stock, reason = %reason, "Stock updated");
        Ok(())
    }
}

fn validate_product(product: &Product) -> CoreResult<()> {
    if product.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        }
        .into());
    }
    validate_product_name(&product.name)?;
    validate_price_cents("price", product.price_cents)?;
    validate_price_cents("cost", product.cost_cents)?;
    validate_stock(product.stock)?;
    validate_tax_rate_bps(product.tax_rate_bps)?;
    validate_barcode(product.barcode.as_deref())?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
