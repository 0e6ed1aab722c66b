//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Declined cart, checkout and refund operations  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  register errors (apps/register)                                       │
//! │  └── ApiError         - What the UI collaborator sees (serialized)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recoverability
//! Every variant is a declined operation, never a fault. The engine checks
//! all preconditions before it mutates anything, so returning one of these
//! always means nothing changed.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Not enough stock for the requested quantity.
    ///
    /// ## When This Occurs
    /// - Adding a product whose stock is 0
    /// - Raising a cart line above the stock seen when it was added
    /// - Checking out after the catalog stock dropped below a line quantity
    #[error("Out of stock for {product_id}: available {available}, requested {requested}")]
    OutOfStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was attempted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// No signed-in cashier to attribute the operation to.
    #[error("No active cashier")]
    NoActiveCashier,

    /// Unknown transaction, product or cart line.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Refund amount was zero or negative.
    #[error("Invalid refund amount: {amount} (must be positive)")]
    InvalidAmount { amount: Money },

    /// Cumulative refunds would exceed the transaction total.
    #[error("Refund of {requested} exceeds refundable balance {remaining}")]
    OverRefund { requested: Money, remaining: Money },

    /// Cart discount was negative.
    #[error("Invalid discount: {amount} (must not be negative)")]
    InvalidDiscount { amount: Money },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A line's priced amounts do not fit the money representation.
    #[error("Amount too large to price for {product_id}")]
    AmountTooLarge { product_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Entity exists but is switched off (e.g., soft-deleted product).
    #[error("{field} '{value}' is inactive")]
    Inactive { field: String, value: String },

    /// Duplicate value (e.g., duplicate product id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
