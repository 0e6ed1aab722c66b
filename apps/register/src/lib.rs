//! # Tally Register Library
//!
//! The register layer over `tally-core`: state holders, the commands a UI
//! calls, and the error shape those commands return.
//!
//! ## Module Organization
//! ```text
//! tally_register/
//! ├── lib.rs          ◄─── You are here (logging setup, demo run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── store.rs    ◄─── Catalog + ledger behind one lock
//! │   ├── cart.rs     ◄─── Cart state management
//! │   ├── session.rs  ◄─── Signed-in user
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/       ◄─── One file per screen
//! ├── seed.rs         ◄─── Demo catalog, customers, users
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │  StoreState  │ │  CartState   │ │ SessionState │ │ ConfigState  │   │
//! │  │              │ │              │ │              │ │              │   │
//! │  │ • Catalog    │ │ • Lines      │ │ • User       │ │ • Store name │   │
//! │  │ • Ledger     │ │ • Discount   │ │              │ │ • Currency   │   │
//! │  │ • Customers  │ │ • Customer   │ │              │ │ • Device id  │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  Each command takes only the state it needs.                           │
//! │  Lock order when two are needed: cart, then store.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod seed;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use error::{ApiError, ApiResult};
use state::{CartState, ConfigState, SessionState, StoreState};
use tally_core::{PaymentMethod, ReportPeriod};

/// Runs a scripted session against the demo store and prints the results.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize logging (RUST_LOG overrides the default filter)         │
/// │  2. Load config from TALLY_* environment variables                     │
/// │  3. Seed the store, sign in as `cashier`                               │
/// │  4. Ring up a sale, check out by card, print the receipt               │
/// │  5. Sign in as `admin`, refund part, then the rest                     │
/// │  6. Print the all-time sales report as JSON                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ApiResult<()> {
    init_tracing();

    info!("Starting Tally POS register");

    let config = ConfigState::from_env();
    let store = StoreState::new(seed::demo_store()?);
    let cart = CartState::new();
    let session = SessionState::new();

    info!(device_id = %config.device_id, store_name = %config.store_name, "State initialized");

    commands::session::sign_in(&store, &session, "cashier")?;

    commands::cart::scan_barcode(&store, &cart, "123456789012")?;
    commands::cart::add_to_cart(&store, &cart, "6", Some(2))?;
    commands::cart::set_customer(&store, &cart, Some("1"))?;
    commands::cart::set_discount(&cart, 1_000)?;

    let receipt = commands::sale::checkout(&store, &cart, &session, &config, PaymentMethod::Card)?;
    println!("{}", receipt.to_text());

    commands::session::sign_in(&store, &session, "admin")?;

    let partial = commands::refund::refund_transaction(
        &store,
        &session,
        &receipt.transaction_id,
        5_000,
        "Price match",
    )?;
    println!(
        "Refunded {} ({:?}), {} remaining",
        config.format_currency(partial.refunded),
        partial.status,
        config.format_currency(partial.remaining)
    );

    let full = commands::refund::refund_transaction(
        &store,
        &session,
        &receipt.transaction_id,
        partial.remaining.cents(),
        "Customer returned all items",
    )?;
    println!(
        "Refunded {} ({:?})",
        config.format_currency(full.refunded),
        full.status
    );

    let report = commands::report::sales_report(&store, ReportPeriod::All);
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| ApiError::internal(format!("Failed to serialize report: {}", e)))?;
    println!("{}", json);

    commands::session::sign_out(&session, &cart);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_core=trace` - Show trace for the engine only
/// - Default: INFO, DEBUG for tally crates
///
/// Panics if a global subscriber is already installed.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_filter())
        .init();
}

/// `RUST_LOG` when set and parseable, the default directives otherwise.
fn tracing_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally_core=debug,tally_register=debug"))
}
