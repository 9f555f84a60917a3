//! Wallet / Ledger storage seam
//!
//! The transfer engine never talks to a database directly. It checks out a
//! [`UnitOfWork`] from a [`LedgerStore`], performs every read and write of one
//! transfer through it, and then commits or rolls back.
//!
//! # Contract for backends
//!
//! 1. **All-or-nothing**: writes made through a unit become visible only on
//!    `commit`. Dropping a unit without committing discards them.
//! 2. **Row locks**: `lock_wallets` blocks until the caller holds exclusive
//!    locks on every listed wallet, acquired in ascending id order, held
//!    until the unit ends.
//! 3. **Unique ids**: `append` fails with [`StoreError::DuplicateId`] if the
//!    transaction id is already present, whoever wrote it.
//! 4. **Ordering**: `list_for_owner` returns newest first, ties broken by
//!    insertion order (newer insert first).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::{NewTransaction, Transaction, TransactionId};
use crate::money::Currency;
use crate::wallet::{Owner, OwnerId, Wallet, WalletId};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage errors
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Uniqueness constraint on `transactions.id` rejected the insert
    #[error("Duplicate transaction id: {0}")]
    DuplicateId(TransactionId),

    /// Connection/timeout/I-O problem; the unit was not committed
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A constraint rejected a write (e.g. negative balance)
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// A persisted row could not be mapped back into a domain value
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Wallet not found: {0}")]
    WalletMissing(WalletId),

    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Safe to retry with the same idempotency key
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Wallet balance operations, scoped to a unit of work
#[async_trait]
pub trait WalletStore: Send {
    /// Unlocked read of the owner's wallet
    async fn get_by_owner(&mut self, owner: OwnerId) -> Result<Option<Wallet>, StoreError>;

    /// Lock the given wallets (ascending id order) and return their current state,
    /// sorted by id. Missing ids are simply absent from the result.
    async fn lock_wallets(&mut self, ids: &[WalletId]) -> Result<Vec<Wallet>, StoreError>;

    /// Add `delta` (may be negative) to the wallet balance. Only the transfer
    /// engine calls this, always in the same unit that appends the ledger entry.
    async fn adjust_balance(&mut self, wallet: WalletId, delta: Decimal)
    -> Result<Wallet, StoreError>;
}

/// Append-only ledger operations, scoped to a unit of work
#[async_trait]
pub trait TransactionLedger: Send {
    async fn find_by_id(
        &mut self,
        id: &TransactionId,
        owner: OwnerId,
    ) -> Result<Option<Transaction>, StoreError>;

    async fn append(&mut self, entry: NewTransaction) -> Result<Transaction, StoreError>;
}

/// Recipient resolution against the account directory
#[async_trait]
pub trait OwnerDirectory: Send {
    async fn find_owner_by_email(&mut self, email: &str) -> Result<Option<Owner>, StoreError>;
}

/// One atomic unit: commit publishes every write, rollback (or drop) none.
#[async_trait]
pub trait UnitOfWork: WalletStore + TransactionLedger + OwnerDirectory {
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Process-wide store handle.
///
/// Reads here run outside any unit and may observe a stale-but-valid state.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Check out a unit of work (one pooled connection / one transaction)
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Lock-free balance read for display
    async fn wallet_by_owner(&self, owner: OwnerId) -> Result<Option<Wallet>, StoreError>;

    /// Create the owner's single wallet with a zero balance
    async fn create_for_owner(
        &self,
        owner: OwnerId,
        currency: Currency,
    ) -> Result<Wallet, StoreError>;

    async fn find_transaction(
        &self,
        id: &TransactionId,
        owner: OwnerId,
    ) -> Result<Option<Transaction>, StoreError>;

    async fn list_for_owner(
        &self,
        owner: OwnerId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Liveness check for health reporting
    async fn ping(&self) -> Result<(), StoreError>;
}
