//! # Cart State
//!
//! Holds the register's active cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the cart
//! 2. Only one command should modify the cart at a time
//! 3. UI callbacks can arrive on different threads
//!
//! ## Lock Order
//! A command that needs both the cart and the store takes the cart first.
//! Checkout holds the cart lock across the whole ledger call so the cart it
//! records is the cart it clears.

use std::sync::{Arc, Mutex};

use tally_core::Cart;

/// Register-held cart state.
///
/// ## Why Not RwLock?
/// Cart operations are quick and most of them write.
#[derive(Debug, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Money, Product};

    #[test]
    fn test_mutations_are_visible_to_readers() {
        let state = CartState::new();
        let product = Product {
            id: "1".to_string(),
            name: "Coffee Mug".to_string(),
            price_cents: 1299,
            cost_cents: 600,
            stock: 25,
            tax_rate_bps: 1200,
            category: "Home & Garden".to_string(),
            barcode: None,
            hsn_code: None,
            is_active: true,
        };

        state
            .with_cart_mut(|cart| cart.add_item(&product, 2).map(|_| ()))
            .unwrap();

        assert_eq!(state.with_cart(|cart| cart.subtotal()), Money::from_cents(2598));
    }
}
