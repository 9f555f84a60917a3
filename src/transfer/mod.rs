//! Wallet-to-wallet transfers
//!
//! # Safety Invariants
//!
//! 1. **Conservation**: debit and credit of one transfer commit together or
//!    not at all, so the sum of all balances never changes
//! 2. **Non-negativity**: the balance check is repeated after both wallet
//!    rows are locked
//! 3. **Idempotency**: a transaction id is written at most once; replays and
//!    lost races return the recorded outcome
//! 4. **Lock order**: wallet rows are always locked in ascending id order

pub mod engine;
pub mod error;
pub mod types;


pub use engine::{DEFAULT_UNIT_TIMEOUT, TransferEngine};
pub use error::TransferError;
pub use types::{BalanceView, TransferOutcome, TransferReceipt, TransferRequest};
