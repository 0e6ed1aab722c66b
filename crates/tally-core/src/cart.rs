//! # Cart Aggregator
//!
//! The active cart: one line per distinct product, a flat discount and an
//! optional customer.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Method                  Cart Change           │
//! │  ──────────────           ──────                  ───────────           │
//! │                                                                         │
//! │  Click Product ──────────► add_item() ──────────► push or qty += n     │
//! │  Change Quantity ────────► set_quantity() ──────► qty = n (≤0 removes) │
//! │  Click Remove ───────────► remove_item() ───────► line removed         │
//! │  Enter Discount ─────────► set_discount() ──────► discount = d         │
//! │  Pick Customer ──────────► set_customer() ──────► customer = c         │
//! │  Cancel Sale ────────────► clear() ─────────────► empty                │
//! │                                                                         │
//! │  Every mutation re-prices the touched line and recomputes the          │
//! │  exact aggregate once. Getters only read that aggregate.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart never touches the catalog. Stock leaves the shelf at checkout.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, PreciseMoney};
use crate::pricing::LinePricing;
use crate::types::{CustomerRef, Product};
use crate::validation::{validate_cart_size, validate_discount, validate_quantity};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart, and later in a transaction snapshot.
///
/// ## Design Notes
/// - `product` is a frozen copy taken when the product was added. The price
///   is locked in; a later price change in the catalog does not reach here.
/// - `subtotal`, `tax` and `total_with_tax` are always the pricing of
///   `product` × `quantity`; only [`Cart`] changes the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
    pub subtotal: Money,
    pub tax: PreciseMoney,
    pub total_with_tax: PreciseMoney,
}

impl CartLine {
    /// Prices `quantity` units of a product snapshot.
    pub fn new(product: Product, quantity: i64) -> CoreResult<Self> {
        let pricing =
            LinePricing::compute(&product.id, product.price(), product.tax_rate(), quantity)?;
        Ok(CartLine {
            product,
            quantity,
            subtotal: pricing.subtotal,
            tax: pricing.tax,
            total_with_tax: pricing.total_with_tax,
        })
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// The priced amounts of this line.
    pub fn pricing(&self) -> LinePricing {
        LinePricing {
            subtotal: self.subtotal,
            tax: self.tax,
            total_with_tax: self.total_with_tax,
        }
    }

    /// Cost of goods for this line.
    pub fn cost(&self) -> Money {
        self.product.cost().multiply_quantity(self.quantity)
    }

    /// `(price − cost) × quantity`, before tax and discount.
    pub fn profit(&self) -> Money {
        self.product.unit_margin().multiply_quantity(self.quantity)
    }

    fn set_quantity(&mut self, quantity: i64) -> CoreResult<()> {
        let pricing = LinePricing::compute(
            &self.product.id,
            self.product.price(),
            self.product.tax_rate(),
            quantity,
        )?;
        self.quantity = quantity;
        self.subtotal = pricing.subtotal;
        self.tax = pricing.tax;
        self.total_with_tax = pricing.total_with_tax;
        Ok(())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Exact sums over the cart lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Aggregate {
    subtotal: Money,
    tax: PreciseMoney,
    total_with_tax: PreciseMoney,
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product raises quantity)
/// - Every line quantity is in `1..=MAX_ITEM_QUANTITY`
/// - A line quantity never exceeds the stock its snapshot saw
/// - At most `MAX_CART_ITEMS` lines
/// - `discount >= 0`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    discount: Money,
    customer: Option<CustomerRef>,
    #[serde(skip)]
    aggregate: Aggregate,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds `quantity` units of a product, merging with an existing line.
    ///
    /// ## Behavior
    /// - Product stock is 0: `OutOfStock`, cart unchanged
    /// - Product already in cart: quantity increases, line re-priced at the
    ///   price frozen when it was first added; the snapshot's stock is
    ///   refreshed from `product`
    /// - Product not in cart: new line
    ///
    /// ## Errors
    /// `OutOfStock`, `QuantityTooLarge`, `CartTooLarge`,
    /// `Validation` (non-positive quantity, inactive product).
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<&CartLine> {
        validate_quantity(quantity)?;

        if !product.is_active {
            return Err(ValidationError::Inactive {
                field: "product".to_string(),
                value: product.id.clone(),
            }
            .into());
        }

        if product.stock == 0 {
            return Err(CoreError::OutOfStock {
                product_id: product.id.clone(),
                available: 0,
                requested: quantity,
            });
        }

        let index = match self.position(&product.id) {
            Some(index) => {
                let new_qty = self.lines[index].quantity + quantity;
                validate_quantity(new_qty)?;
                ensure_stock(product, new_qty)?;

                let line = &mut self.lines[index];
                line.set_quantity(new_qty)?;
                line.product.stock = product.stock;
                index
            }
            None => {
                validate_cart_size(self.lines.len())?;
                ensure_stock(product, quantity)?;

                self.lines.push(CartLine::new(product.clone(), quantity)?);
                self.lines.len() - 1
            }
        };

        self.recompute();

        let line = &self.lines[index];
        debug!(product_id = %line.product.id, quantity = line.quantity, "Cart line added");
        Ok(line)
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the line
    /// - Product not in cart: `NotFound`, nothing changes
    /// - Above the stock seen on the line snapshot: `OutOfStock`
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_item(product_id).map(|_| ());
        }

        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::not_found("Cart line", product_id))?;

        validate_quantity(quantity)?;
        ensure_stock(&self.lines[index].product, quantity)?;

        self.lines[index].set_quantity(quantity)?;
        self.recompute();

        debug!(product_id = %product_id, quantity, "Cart line quantity set");
        Ok(())
    }

    /// Removes a line by product id and returns it.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<CartLine> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::not_found("Cart line", product_id))?;

        let line = self.lines.remove(index);
        self.recompute();

        debug!(product_id = %product_id, "Cart line removed");
        Ok(line)
    }

    /// Empties the cart: no lines, no discount, no customer.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = Money::zero();
        self.customer = None;
        self.recompute();
    }

    /// Sets the flat discount. Negative amounts are rejected.
    pub fn set_discount(&mut self, amount: Money) -> CoreResult<()> {
        validate_discount(amount)?;
        self.discount = amount;
        debug!(discount = %amount, "Cart discount set");
        Ok(())
    }

    /// Attaches or detaches a customer.
    pub fn set_customer(&mut self, customer: Option<CustomerRef>) {
        self.customer = customer;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ line subtotal.
    pub fn subtotal(&self) -> Money {
        self.aggregate.subtotal
    }

    /// Σ line tax, exact.
    pub fn tax(&self) -> PreciseMoney {
        self.aggregate.tax
    }

    /// Σ line total with tax, exact.
    pub fn total_with_tax(&self) -> PreciseMoney {
        self.aggregate.total_with_tax
    }

    /// `max(0, total_with_tax − discount)`. A discount never makes the
    /// payable amount negative.
    pub fn grand_total(&self) -> PreciseMoney {
        (self.aggregate.total_with_tax - self.discount.to_precise()).floor_zero()
    }

    /// Σ `(price − cost) × quantity`.
    pub fn profit(&self) -> Money {
        self.lines.iter().map(CartLine::profit).sum()
    }

    /// Display-rounded totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }

    fn recompute(&mut self) {
        self.aggregate = Aggregate {
            subtotal: self.lines.iter().map(|l| l.subtotal).sum(),
            tax: self.lines.iter().map(|l| l.tax).sum(),
            total_with_tax: self.lines.iter().map(|l| l.total_with_tax).sum(),
        };
    }
}

fn ensure_stock(product: &Product, requested: i64) -> CoreResult<()> {
    if !product.can_sell(requested) {
        return Err(CoreError::OutOfStock {
            product_id: product.id.clone(),
            available: product.stock,
            requested,
        });
    }
    Ok(())
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals rounded to cents, for the cart panel.
///
/// Each figure is rounded from the exact aggregate, so
/// `subtotal + tax == total_with_tax` holds on the rounded values too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total_with_tax: Money,
    pub discount: Money,
    pub grand_total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            tax: cart.tax().round_to_cents(),
            total_with_tax: cart.total_with_tax().round_to_cents(),
            discount: cart.discount(),
            grand_total: cart.grand_total().round_to_cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
