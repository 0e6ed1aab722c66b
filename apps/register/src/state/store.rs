//! # Store State
//!
//! The catalog, the ledger and the read-only directories, behind one lock.
//!
//! Checkout and refund both read stock or totals, decide, then write. Keeping
//! the catalog and the ledger under a single `Mutex` makes each of those
//! sequences one critical section, so two checkouts cannot both see the last
//! unit on the shelf.

use std::sync::{Arc, Mutex};

use tally_core::validation::{validate_customer_name, validate_email, validate_phone};
use tally_core::{CoreError, CoreResult, Customer, InMemoryCatalog, Ledger, User, ValidationError};

/// Everything the register records.
#[derive(Debug, Default)]
pub struct Store {
    pub catalog: InMemoryCatalog,
    pub ledger: Ledger,
    pub customers: Vec<Customer>,
    pub users: Vec<User>,
}

impl Store {
    pub fn new(catalog: InMemoryCatalog, ledger: Ledger) -> Self {
        Store {
            catalog,
            ledger,
            customers: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == customer_id)
    }

    /// Adds a customer to the directory. Ids must be unique.
    pub fn add_customer(&mut self, customer: Customer) -> CoreResult<()> {
        validate_customer(&customer)?;
        if self.customer(&customer.id).is_some() {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: customer.id,
            }
            .into());
        }
        self.customers.push(customer);
        Ok(())
    }

    /// Replaces a customer's contact details. Loyalty points are kept.
    pub fn update_customer(&mut self, customer: Customer) -> CoreResult<&Customer> {
        validate_customer(&customer)?;
        let existing = self
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or_else(|| CoreError::not_found("Customer", &customer.id))?;
        existing.name = customer.name;
        existing.phone = customer.phone;
        existing.email = customer.email;
        Ok(existing)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }
}

fn validate_customer(customer: &Customer) -> CoreResult<()> {
    if customer.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        }
        .into());
    }
    validate_customer_name(&customer.name)?;
    validate_email(&customer.email)?;
    validate_phone(&customer.phone)?;
    if customer.loyalty_points < 0 {
        return Err(ValidationError::OutOfRange {
            field: "loyaltyPoints".to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into());
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct StoreState {
    store: Arc<Mutex<Store>>,
}

impl StoreState {
    pub fn new(store: Store) -> Self {
        StoreState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Store) -> R,
    {
        let store = self.store.lock().expect("Store mutex poisoned");
        f(&store)
    }

    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let mut store = self.store.lock().expect("Store mutex poisoned");
        f(&mut store)
    }
}
