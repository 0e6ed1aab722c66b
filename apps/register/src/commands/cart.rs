//! # Cart Commands
//!
//! Commands for the sales screen and cart panel.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Recorded │       │
//! │  │  Cart    │     │          │     │  method  │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart        checkout                          │
//! │                   update_cart_item   (sale.rs)                         │
//! │                   remove_from_cart                                      │
//! │                   set_discount                                          │
//! │                   set_customer                                          │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::{CartState, StoreState};
use tally_core::{Cart, CartLine, CartTotals, Catalog, CustomerRef, Money};

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub customer: Option<CustomerRef>,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
            customer: cart.customer().cloned(),
        }
    }
}

pub fn get_cart(cart: &CartState) -> CartResponse {
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Already in cart: quantity increases
/// - Not in cart: added as a new line
/// - Price is frozen when the line is first added
///
/// ## Arguments
/// * `product_id` - Catalog id to add
/// * `quantity` - Quantity to add (default: 1)
pub fn add_to_cart(
    store: &StoreState,
    cart: &CartState,
    product_id: &str,
    quantity: Option<i64>,
) -> ApiResult<CartResponse> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, quantity, "add_to_cart command");

    cart.with_cart_mut(|c| -> ApiResult<CartResponse> {
        store.with_store(|s| -> ApiResult<CartResponse> {
            let product = s
                .catalog
                .get(product_id)
                .ok_or_else(|| ApiError::not_found("Product", product_id))?;
            c.add_item(product, quantity)?;
            Ok(CartResponse::from(&*c))
        })
    })
}

/// Adds one unit of the product with `barcode`, as a scanner would.
pub fn scan_barcode(store: &StoreState, cart: &CartState, barcode: &str) -> ApiResult<CartResponse> {
    debug!(barcode = %barcode, "scan_barcode command");

    cart.with_cart_mut(|c| -> ApiResult<CartResponse> {
        store.with_store(|s| -> ApiResult<CartResponse> {
            let product = s
                .catalog
                .find_by_barcode(barcode)
                .ok_or_else(|| ApiError::not_found("Barcode", barcode))?;
            c.add_item(product, 1)?;
            Ok(CartResponse::from(&*c))
        })
    })
}

/// Sets a line's quantity; zero or less removes the line.
pub fn update_cart_item(
    cart: &CartState,
    product_id: &str,
    quantity: i64,
) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, quantity, "update_cart_item command");

    cart.with_cart_mut(|c| -> ApiResult<CartResponse> {
        c.set_quantity(product_id, quantity)?;
        Ok(CartResponse::from(&*c))
    })
}

pub fn remove_from_cart(cart: &CartState, product_id: &str) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, "remove_from_cart command");

    cart.with_cart_mut(|c| -> ApiResult<CartResponse> {
        c.remove_item(product_id)?;
        Ok(CartResponse::from(&*c))
    })
}

/// Sets the flat discount in cents.
pub fn set_discount(cart: &CartState, discount_cents: i64) -> ApiResult<CartResponse> {
    debug!(discount_cents, "set_discount command");

    cart.with_cart_mut(|c| -> ApiResult<CartResponse> {
        c.set_discount(Money::from_cents(discount_cents))?;
        Ok(CartResponse::from(&*c))
    })
}

/// Attaches a customer from the directory, or detaches with `None`.
pub fn set_customer(
    store: &StoreState,
    cart: &CartState,
    customer_id: Option<&str>,
) -> ApiResult<CartResponse> {
    debug!(customer_id = ?customer_id, "set_customer command");

    cart.with_cart_mut(|c| -> ApiResult<CartResponse> {
        let customer = match customer_id {
            Some(id) => Some(
                store
                    .with_store(|s| s.customer(id).map(|cust| cust.to_ref()))
                    .ok_or_else(|| ApiError::not_found("Customer", id))?,
            ),
            None => None,
        };
        c.set_customer(customer);
        Ok(CartResponse::from(&*c))
    })
}

/// Empties the cart.
///
/// ## When Used
/// - Cashier cancels the sale
/// - After checkout (done by `checkout` itself)
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| -> CartResponse {
        c.clear();
        CartResponse::from(&*c)
    })
}
