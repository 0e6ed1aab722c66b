//! # Product Commands
//!
//! Product search for the sales screen, plus the inventory screen's
//! maintenance commands.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  search_products("1234567890")                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Is query a barcode? (8-13 digits)        │                         │
//! │  │  YES: Try exact barcode lookup first      │──► Found? Return [1]    │
//! │  │  NO:  Case-insensitive match on name or   │                         │
//! │  │       category                            │                         │
//! │  └───────────────────────────────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::StoreState;
use tally_core::{Catalog, InventorySummary, Product, StockLog, LOW_STOCK_THRESHOLD};

/// Default number of search results.
const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Active products matching `query`, at most `limit` of them.
pub fn search_products(store: &StoreState, query: &str, limit: Option<usize>) -> Vec<Product> {
    let start = Instant::now();
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let query = query.trim();

    let results: Vec<Product> = store.with_store(|s| {
        if is_barcode_pattern(query) {
            if let Some(product) = s.catalog.find_by_barcode(query) {
                return vec![product.clone()];
            }
        }

        let needle = query.to_lowercase();
        s.catalog
            .products()
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect()
    });

    info!(
        query = %query,
        results = results.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Product search completed"
    );
    results
}

pub fn get_product(store: &StoreState, product_id: &str) -> ApiResult<Product> {
    store
        .with_store(|s| s.catalog.get(product_id).cloned())
        .ok_or_else(|| ApiError::not_found("Product", product_id))
}

pub fn create_product(store: &StoreState, product: Product) -> ApiResult<Product> {
    debug!(product_id = %product.id, "create_product command");
    store.with_store_mut(|s| s.catalog.insert(product.clone()))?;
    Ok(product)
}

pub fn update_product(store: &StoreState, product: Product) -> ApiResult<Product> {
    debug!(product_id = %product.id, "update_product command");
    store.with_store_mut(|s| s.catalog.update(product.clone()))?;
    Ok(product)
}

/// Sets a product's on-hand count from a physical count.
pub fn adjust_stock(store: &StoreState, product_id: &str, stock: i64) -> ApiResult<Product> {
    debug!(product_id = %product_id, stock, "adjust_stock command");
    store.with_store_mut(|s| -> ApiResult<Product> {
        s.catalog.adjust_stock(product_id, stock)?;
        s.catalog
            .get(product_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Product", product_id))
    })
}

/// Stock movements, newest first; all products when `product_id` is `None`.
pub fn stock_logs(store: &StoreState, product_id: Option<&str>) -> Vec<StockLog> {
    store.with_store(|s| {
        s.catalog
            .stock_logs()
            .iter()
            .rev()
            .filter(|log| product_id.map_or(true, |id| log.product_id == id))
            .cloned()
            .collect()
    })
}

pub fn inventory_summary(store: &StoreState) -> InventorySummary {
    store.with_store(|s| s.catalog.summary())
}

/// Products with `0 < stock <= LOW_STOCK_THRESHOLD`.
pub fn low_stock_products(store: &StoreState) -> Vec<Product> {
    store.with_store(|s| {
        s.catalog
            .products()
            .iter()
            .filter(|p| p.stock > 0 && p.stock <= LOW_STOCK_THRESHOLD)
            .cloned()
            .collect()
    })
}

/// 8-13 digits.
fn is_barcode_pattern(query: &str) -> bool {
    (8..=13).contains(&query.len()) && query.chars().all(|c| c.is_ascii_digit())
}
