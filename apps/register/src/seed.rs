//! # Demo Data
//!
//! Populates a store with a small electronics-and-stationery catalog, a few
//! customers and the two default users, for development and the demo run.
//!
//! ## Seeded Records
//! - 6 products across Electronics, Home & Garden, Stationery
//!   (tax 18% or 12%, each with a 12-digit barcode and HSN code)
//! - 3 customers with loyalty points
//! - 2 users: `admin` (Admin), `cashier` (Cashier)
//!
//! "Notebook Set" starts at 2 units so the low-stock views have something
//! to show.

use tracing::info;

use crate::state::Store;
use tally_core::{CoreResult, Customer, InMemoryCatalog, Ledger, Product, User, UserRole};

/// (id, name, price, cost, stock, category, barcode, tax %, hsn)
const PRODUCTS: &[(&str, &str, i64, i64, i64, &str, &str, u32, &str)] = &[
    ("1", "iPhone 15 Pro", 99_999, 75_000, 15, "Electronics", "123456789012", 18, "8517"),
    ("2", "Samsung Galaxy Buds", 14_999, 10_000, 8, "Electronics", "123456789013", 18, "8518"),
    ("3", "MacBook Air M2", 119_999, 95_000, 8, "Electronics", "123456789014", 18, "8471"),
    ("4", "Coffee Mug", 1_299, 600, 25, "Home & Garden", "123456789015", 12, "6912"),
    ("5", "Notebook Set", 899, 450, 2, "Stationery", "123456789016", 12, "4820"),
    ("6", "Wireless Mouse", 2_999, 1_800, 12, "Electronics", "123456789017", 18, "8471"),
];

/// (id, name, phone, email, loyalty points)
const CUSTOMERS: &[(&str, &str, &str, &str, i64)] = &[
    ("1", "John Doe", "+1-555-0123", "john.doe@email.com", 150),
    ("2", "Jane Smith", "+1-555-0124", "jane.smith@email.com", 89),
    ("3", "Mike Johnson", "+1-555-0125", "mike.j@email.com", 245),
];

pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(
            |&(id, name, price, cost, stock, category, barcode, tax_pct, hsn)| Product {
                id: id.to_string(),
                name: name.to_string(),
                price_cents: price,
                cost_cents: cost,
                stock,
                tax_rate_bps: tax_pct * 100,
                category: category.to_string(),
                barcode: Some(barcode.to_string()),
                hsn_code: Some(hsn.to_string()),
                is_active: true,
            },
        )
        .collect()
}

pub fn customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|&(id, name, phone, email, loyalty_points)| Customer {
            id: id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            loyalty_points,
        })
        .collect()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            username: "admin".to_string(),
            name: "Admin User".to_string(),
            role: UserRole::Admin,
        },
        User {
            id: "2".to_string(),
            username: "cashier".to_string(),
            name: "Cashier User".to_string(),
            role: UserRole::Cashier,
        },
    ]
}

/// Adds the demo records to `store`.
pub fn populate(store: &mut Store) -> CoreResult<()> {
    for product in products() {
        store.catalog.insert(product)?;
    }
    store.customers.extend(customers());
    store.users.extend(users());

    info!(
        products = store.catalog.products().len(),
        customers = store.customers.len(),
        users = store.users.len(),
        "Seeded demo data"
    );
    Ok(())
}

/// A fresh store on the system clock, populated with the demo records.
pub fn demo_store() -> CoreResult<Store> {
    let mut store = Store::new(InMemoryCatalog::new(), Ledger::new());
    populate(&mut store)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Catalog;

    #[test]
    fn test_demo_store() {
        let store = demo_store().unwrap();
        assert_eq!(store.catalog.products().len(), 6);
        assert_eq!(store.catalog.get("5").unwrap().stock, 2);
        assert_eq!(
            store.catalog.find_by_barcode("123456789012").unwrap().name,
            "iPhone 15 Pro"
        );
        assert_eq!(store.customer("3").unwrap().loyalty_points, 245);
        assert!(store.user_by_username("cashier").is_some());
    }

    #[test]
    fn test_seeded_tax_rates() {
        let products = products();
        assert_eq!(products[0].tax_rate_bps, 1800);
        assert_eq!(products[3].tax_rate_bps, 1200);
    }
}
