//! # Configuration State
//!
//! Stores register configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TALLY_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use tally_core::Money;

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (printed on receipts)
    pub store_name: String,

    /// Store address lines (for receipts)
    pub store_address: Vec<String>,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Identifies this register on receipts and in logs
    pub device_id: String,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Tally POS Store"
    /// - Currency: USD ($)
    /// - Device: "register-01"
    fn default() -> Self {
        ConfigState {
            store_name: "Tally POS Store".to_string(),
            store_address: vec!["123 Main Street".to_string(), "City, ST 12345".to_string()],
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            device_id: "register-01".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TALLY_STORE_NAME`: Override store name
    /// - `TALLY_CURRENCY_SYMBOL`: Override currency symbol (e.g., "₹")
    /// - `TALLY_DEVICE_ID`: Override register id
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(store_name) = get("TALLY_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = get("TALLY_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(device_id) = get("TALLY_DEVICE_ID") {
            config.device_id = device_id;
        }

        config
    }

    /// Formats an amount with this register's currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::Money;
    /// use tally_register::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part().abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(100)), "$1.00");
        assert_eq!(config.format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
        assert_eq!(config.format_currency(Money::from_cents(-5)), "-$0.05");
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(|key| match key {
            "TALLY_STORE_NAME" => Some("Corner Shop".to_string()),
            "TALLY_CURRENCY_SYMBOL" => Some("₹".to_string()),
            "TALLY_DEVICE_ID" => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.format_currency(Money::from_cents(99_999)), "₹999.99");
        assert_eq!(config.device_id, "register-01");
    }
}
