//! Wallet Ledger - atomic, idempotent wallet-to-wallet transfers
//!
//! # Modules
//!
//! - [`money`] - Currency and fixed-point amount types
//! - [`wallet`] - Wallet and owner types
//! - [`ledger`] - Transaction (ledger entry) types
//! - [`store`] - Storage seam with in-memory and PostgreSQL backends
//! - [`transfer`] - Transfer engine and its error taxonomy
//! - [`history`] - Paginated transaction history
//! - [`db`] - PostgreSQL pool lifecycle
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing setup
//! - [`gateway`] - HTTP surface

// Domain types
pub mod ledger;
pub mod money;
pub mod wallet;

// Storage
pub mod store;

// Core services
pub mod history;
pub mod transfer;

// Infrastructure
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use history::{HistoryEntry, HistoryQuery, HistoryReader};
pub use ledger::{Transaction, TransactionId, TransactionStatus};
pub use money::{Amount, Currency};
pub use store::{LedgerStore, MemoryStore, PgStore, StoreError};
pub use transfer::{TransferEngine, TransferError, TransferOutcome, TransferRequest};
pub use wallet::{OwnerId, Wallet, WalletId};
