//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally POS                              │
//! │                                                                         │
//! │  UI collaborator              Register                                  │
//! │  ───────────────              ────────                                  │
//! │                                                                         │
//! │  checkout(PaymentMethod::Cash)                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Declined? ─── CoreError::EmptyCart ──────────── ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  match err.code {                                                       │
//! │    ErrorCode::OverRefund => keep the refund modal open,                 │
//! │    ErrorCode::EmptyCart  => disable the pay button, ...                 │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error is a declined operation. The UI shows `message` and carries
//! on; nothing here is fatal to the process.

use serde::Serialize;
use tally_core::CoreError;
use tracing::warn;

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "OVER_REFUND",
///   "message": "Refund of $20.00 exceeds refundable balance $16.60"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product, transaction, customer or cart line
    NotFound,

    /// Not enough stock for the requested quantity
    OutOfStock,

    /// Checkout with nothing in the cart
    EmptyCart,

    /// Nobody is signed in
    NoActiveCashier,

    /// Refund amount was zero or negative
    InvalidAmount,

    /// Refund would exceed what is left to refund
    OverRefund,

    /// Negative discount
    InvalidDiscount,

    /// Input validation failed
    ValidationError,

    /// Cart limits exceeded
    CartError,

    /// Something the register itself got wrong
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::NoActiveCashier => ErrorCode::NoActiveCashier,
            CoreError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            CoreError::OverRefund { .. } => ErrorCode::OverRefund,
            CoreError::InvalidDiscount { .. } => ErrorCode::InvalidDiscount,
            CoreError::CartTooLarge { .. } => ErrorCode::CartError,
            CoreError::QuantityTooLarge { .. } => ErrorCode::ValidationError,
            CoreError::AmountTooLarge { .. } => ErrorCode::InvalidAmount,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };

        let message = match err {
            CoreError::Validation(e) => e.to_string(),
            other => other.to_string(),
        };

        warn!(code = ?code, message = %message, "Operation declined");
        ApiError { code, message }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
