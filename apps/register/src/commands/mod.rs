//! # Commands Module
//!
//! Everything a UI collaborator calls.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── session.rs  ◄─── Sign in / sign out
//! ├── product.rs  ◄─── Product search, inventory maintenance
//! ├── customer.rs ◄─── Customer directory
//! ├── cart.rs     ◄─── Cart manipulation
//! ├── sale.rs     ◄─── Checkout and receipts
//! ├── refund.rs   ◄─── Refund review
//! ├── report.rs   ◄─── Sales reports
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! Each command takes exactly the state it needs by shared reference and
//! returns a serializable value, or `ApiError` when the operation is
//! declined:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState) -> CartResponse
//!
//! // Needs cart and store (locked in that order)
//! fn add_to_cart(store: &StoreState, cart: &CartState, ...) -> ApiResult<CartResponse>
//! ```

pub mod cart;
pub mod config;
pub mod customer;
pub mod product;
pub mod refund;
pub mod report;
pub mod sale;
pub mod session;
