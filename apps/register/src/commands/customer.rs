//! # Customer Commands
//!
//! The customer directory screen: list, look up, add and edit. Checkout only
//! reads the directory (through `cart::set_customer`).
//!
//! Editing changes contact details only. Loyalty points stay with the record.

use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::StoreState;
use tally_core::Customer;

pub fn list_customers(store: &StoreState) -> Vec<Customer> {
    store.with_store(|s| s.customers.clone())
}

pub fn get_customer(store: &StoreState, customer_id: &str) -> ApiResult<Customer> {
    store
        .with_store(|s| s.customer(customer_id).cloned())
        .ok_or_else(|| ApiError::not_found("Customer", customer_id))
}

/// Adds a customer. The id must not already be in the directory.
pub fn create_customer(store: &StoreState, customer: Customer) -> ApiResult<Customer> {
    debug!(customer_id = %customer.id, "create_customer command");
    store.with_store_mut(|s| s.add_customer(customer.clone()))?;
    info!(customer_id = %customer.id, "Customer added");
    Ok(customer)
}

/// Updates name, phone and email. Returns the stored record.
pub fn update_customer(store: &StoreState, customer: Customer) -> ApiResult<Customer> {
    debug!(customer_id = %customer.id, "update_customer command");
    let updated = store.with_store_mut(|s| s.update_customer(customer).cloned())?;
    Ok(updated)
}
