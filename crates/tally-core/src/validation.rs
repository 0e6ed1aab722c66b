//! # Validation Module
//!
//! Input validation for catalog entries, cart quantities, discounts and
//! refund requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register command                                             │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE, called by cart / catalog / ledger               │
//! │  └── Checked before any mutation                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_quantity, validate_refund_reason};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_refund_reason("Defective product").is_ok());
//! assert!(validate_refund_reason("   ").is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an optional barcode.
///
/// ## Rules
/// - Absent is fine
/// - Present: 8 to 13 ASCII digits (EAN-8, UPC-A, EAN-13)
pub fn validate_barcode(barcode: Option<&str>) -> ValidationResult<()> {
    let Some(code) = barcode else {
        return Ok(());
    };

    let len = code.len();
    if !(8..=13).contains(&len) || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must be 8 to 13 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a customer name: required, at most 100 characters.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Required, no whitespace
/// - Exactly one `@`, with text on both sides
/// - Domain contains a `.` that is neither first nor last
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("must contain '@'"));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@example.com"));
    }
    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return Err(invalid("domain must look like example.com"));
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Required
/// - Digits plus `+ - ( ) .` and spaces only
/// - 7 to 15 digits (E.164 allows at most 15)
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' ');
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !phone.chars().all(allowed) || !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 7 to 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a refund reason. Returns the trimmed reason.
///
/// ## Rules
/// - Must not be blank
/// - Maximum 500 characters
pub fn validate_refund_reason(reason: &str) -> ValidationResult<String> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.chars().count() > 500 {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: 500,
        });
    }

    Ok(reason.to_string())
}

/// Resolves the acting user id, rejecting an absent or blank one.
pub fn require_actor(actor_id: Option<&str>) -> CoreResult<&str> {
    match actor_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(CoreError::NoActiveCashier),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Cashier enters quantity: 5                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0?  → "quantity must be positive"                     │
/// │       ├── qty > 999? → QuantityTooLarge                                │
/// │       └── OK → stock check, then add_item                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> CoreResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: qty,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price or cost in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - At most `MAX_PRICE_CENTS`, so a full line with tax fits in `PreciseMoney`
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates an on-hand stock count.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a flat cart discount. Zero clears the discount.
pub fn validate_discount(amount: Money) -> CoreResult<()> {
    if amount.is_negative() {
        return Err(CoreError::InvalidDiscount { amount });
    }

    Ok(())
}

/// Validates a single refund amount (before the cumulative bound).
pub fn validate_refund_amount(amount: Money) -> CoreResult<()> {
    if !amount.is_positive() {
        return Err(CoreError::InvalidAmount { amount });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more distinct line fits in the cart.
pub fn validate_cart_size(current_items: usize) -> CoreResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coffee Mug").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode(None).is_ok());
        assert!(validate_barcode(Some("123456789012")).is_ok());
        assert!(validate_barcode(Some("1234")).is_err());
        assert!(validate_barcode(Some("12345678901A")).is_err());
    }

    #[test]
    fn test_validate_customer_fields() {
        assert!(validate_customer_name("Jane Smith").is_ok());
        assert!(matches!(
            validate_customer_name("  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_customer_name(&"J".repeat(101)).is_err());

        assert!(validate_email("jane.smith@email.com").is_ok());
        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Required { .. })
        ));
        for bad in ["jane", "@email.com", "jane@", "jane@email", "a@b@c.com", "jane @email.com", "jane@.com"] {
            assert!(
                matches!(validate_email(bad), Err(ValidationError::InvalidFormat { .. })),
                "{bad} should be rejected"
            );
        }

        assert!(validate_phone("+1-555-0124").is_ok());
        assert!(validate_phone("(020) 7946 0958").is_ok());
        assert!(matches!(
            validate_phone(" "),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_phone("555-01").is_err());
        assert!(validate_phone("call me maybe").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(matches!(
            validate_quantity(0),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(validate_quantity(-1).is_err());
        assert_eq!(
            validate_quantity(1000),
            Err(CoreError::QuantityTooLarge {
                requested: 1000,
                max: 999
            })
        );
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents("price", 0).is_ok());
        assert!(validate_price_cents("price", 1099).is_ok());
        assert!(validate_price_cents("cost", -100).is_err());
        assert!(validate_price_cents("price", MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents("price", MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(2800).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(Money::zero()).is_ok());
        assert!(validate_discount(Money::from_cents(200)).is_ok());
        assert_eq!(
            validate_discount(Money::from_cents(-1)),
            Err(CoreError::InvalidDiscount {
                amount: Money::from_cents(-1)
            })
        );
    }

    #[test]
    fn test_validate_refund_amount() {
        assert!(validate_refund_amount(Money::from_cents(1)).is_ok());
        assert!(matches!(
            validate_refund_amount(Money::zero()),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(validate_refund_amount(Money::from_cents(-500)).is_err());
    }

    #[test]
    fn test_validate_refund_reason_trims() {
        assert_eq!(
            validate_refund_reason("  Wrong item received ").unwrap(),
            "Wrong item received"
        );
        assert!(validate_refund_reason("").is_err());
    }

    #[test]
    fn test_require_actor() {
        assert_eq!(require_actor(Some("u-1")), Ok("u-1"));
        assert_eq!(require_actor(None), Err(CoreError::NoActiveCashier));
        assert_eq!(require_actor(Some("  ")), Err(CoreError::NoActiveCashier));
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(99).is_ok());
        assert_eq!(
            validate_cart_size(100),
            Err(CoreError::CartTooLarge { max: 100 })
        );
    }
}
