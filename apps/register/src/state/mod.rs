//! # State Module
//!
//! Thread-safe state holders the commands run against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │  StoreState  │  │  CartState   │  │ SessionState │  │ConfigState │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  Mutex<      │  │ store name │  │
//! │  │   catalog,   │  │    Cart      │  │   Option<    │  │ currency   │  │
//! │  │   ledger,    │  │  >>          │  │    User>>    │  │ device id  │  │
//! │  │   directory  │  │              │  │              │  │            │  │
//! │  │  >>          │  │              │  │              │  │            │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  LOCK ORDER: cart → store. Session and config are read and released    │
//! │  before either is taken.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod session;
mod store;

pub use cart::CartState;
pub use config::ConfigState;
pub use session::SessionState;
pub use store::{Store, StoreState};
