//! In-memory wallet/ledger store.
//!
//! Intended for tests/dev. Units of work are serialized behind one async
//! mutex; each unit edits a private copy of the committed state which is
//! swapped in on commit and thrown away on rollback or drop. Reads outside a
//! unit only take a short read lock on the committed state, so they never
//! wait for an in-flight transfer.
//!
//! `begin` clones the whole state, ledger included, so every unit costs
//! O(ledger size). Fine for tests and local runs, not for production volume.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    LedgerStore, OwnerDirectory, StoreError, TransactionLedger, UnitOfWork, WalletStore,
};
use crate::ledger::{NewTransaction, Transaction, TransactionId};
use crate::money::Currency;
use crate::wallet::{Owner, OwnerId, Wallet, WalletId};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    owners: HashMap<OwnerId, Owner>,
    owners_by_email: HashMap<String, OwnerId>,
    wallets: BTreeMap<WalletId, Wallet>,
    wallet_by_owner: HashMap<OwnerId, WalletId>,
    /// Insertion order; `created_at` is non-decreasing along this vector
    transactions: Vec<Transaction>,
    tx_index: HashMap<TransactionId, usize>,
    next_wallet_id: i64,
    last_created_at: Option<DateTime<Utc>>,
}

impl MemoryState {
    fn wallet_for(&self, owner: OwnerId) -> Option<&Wallet> {
        self.wallet_by_owner
            .get(&owner)
            .and_then(|id| self.wallets.get(id))
    }

    fn transaction_for(&self, id: &TransactionId, owner: OwnerId) -> Option<&Transaction> {
        self.tx_index
            .get(id)
            .map(|&i| &self.transactions[i])
            .filter(|t| t.source_owner_id == owner)
    }

    fn insert_wallet(&mut self, owner: OwnerId, currency: Currency) -> Result<Wallet, StoreError> {
        if self.wallet_by_owner.contains_key(&owner) {
            return Err(StoreError::Constraint(format!(
                "owner {} already has a wallet",
                owner
            )));
        }
        self.next_wallet_id += 1;
        let wallet = Wallet {
            id: WalletId::new(self.next_wallet_id),
            owner_id: owner,
            balance: Decimal::ZERO,
            currency,
            updated_at: Utc::now(),
        };
        self.wallets.insert(wallet.id, wallet.clone());
        self.wallet_by_owner.insert(owner, wallet.id);
        Ok(wallet)
    }

    /// Monotonic clock for `created_at`
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }
}

/// In-memory [`LedgerStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    committed: Arc<RwLock<MemoryState>>,
    writer: Arc<Mutex<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.committed
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.committed
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    /// Add an account holder (the job of the auth collaborator in production)
    pub async fn register_owner(&self, email: &str) -> Result<Owner, StoreError> {
        let _writer = self.writer.lock().await;
        let mut state = self.write()?;

        let key = Owner::normalize_email(email);
        if state.owners_by_email.contains_key(&key) {
            return Err(StoreError::Constraint(format!("email {} already exists", key)));
        }
        let owner = Owner {
            id: OwnerId::new(),
            email: key.clone(),
        };
        state.owners.insert(owner.id, owner.clone());
        state.owners_by_email.insert(key, owner.id);
        Ok(owner)
    }

    /// Fixture helper: owner + wallet + opening balance.
    ///
    /// Deposits are outside this crate; this is the only way to put funds
    /// into the in-memory store.
    pub async fn open_account(
        &self,
        email: &str,
        currency: Currency,
        opening_balance: Decimal,
    ) -> Result<(Owner, Wallet), StoreError> {
        if opening_balance < Decimal::ZERO {
            return Err(StoreError::Constraint("negative opening balance".into()));
        }
        let owner = self.register_owner(email).await?;

        let _writer = self.writer.lock().await;
        let mut state = self.write()?;
        let mut wallet = state.insert_wallet(owner.id, currency)?;
        wallet.balance = opening_balance;
        state.wallets.insert(wallet.id, wallet.clone());
        Ok((owner, wallet))
    }

    /// Fixture helper: add funds to an existing wallet
    pub async fn credit(&self, owner: OwnerId, amount: Decimal) -> Result<Wallet, StoreError> {
        if amount <= Decimal::ZERO {
            return Err(StoreError::Constraint("credit must be positive".into()));
        }
        let _writer = self.writer.lock().await;
        let mut state = self.write()?;
        let id = *state
            .wallet_by_owner
            .get(&owner)
            .ok_or_else(|| StoreError::Constraint(format!("owner {} has no wallet", owner)))?;
        let wallet = state
            .wallets
            .get_mut(&id)
            .ok_or(StoreError::WalletMissing(id))?;
        wallet.balance = wallet
            .balance
            .checked_add(amount)
            .ok_or_else(|| StoreError::Constraint(format!("wallet {} balance overflow", id)))?;
        wallet.updated_at = Utc::now();
        Ok(wallet.clone())
    }

    /// Sum of all wallet balances
    pub fn total_balance(&self) -> Result<Decimal, StoreError> {
        self.read()?
            .wallets
            .values()
            .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(w.balance))
            .ok_or_else(|| StoreError::Constraint("total balance overflow".to_string()))
    }

    pub fn transaction_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.transactions.len())
    }
}

/// Unit of work over a private copy of the committed state
pub struct MemoryUnit {
    committed: Arc<RwLock<MemoryState>>,
    working: MemoryState,
    _writer: OwnedMutexGuard<()>,
}

#[async_trait]
impl WalletStore for MemoryUnit {
    async fn get_by_owner(&mut self, owner: OwnerId) -> Result<Option<Wallet>, StoreError> {
        Ok(self.working.wallet_for(owner).cloned())
    }

    async fn lock_wallets(&mut self, ids: &[WalletId]) -> Result<Vec<Wallet>, StoreError> {
        // the writer guard already excludes every other unit
        let mut sorted = ids.to_vec();
        sorted.sort();
        sorted.dedup();
        Ok(sorted
            .into_iter()
            .filter_map(|id| self.working.wallets.get(&id).cloned())
            .collect())
    }

    async fn adjust_balance(
        &mut self,
        wallet: WalletId,
        delta: Decimal,
    ) -> Result<Wallet, StoreError> {
        let row = self
            .working
            .wallets
            .get_mut(&wallet)
            .ok_or(StoreError::WalletMissing(wallet))?;

        let balance = row.balance.checked_add(delta).ok_or_else(|| {
            StoreError::Constraint(format!("wallet {} balance overflow", wallet))
        })?;
        if balance < Decimal::ZERO {
            return Err(StoreError::Constraint(format!(
                "wallet {} balance would become negative",
                wallet
            )));
        }
        row.balance = balance;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

#[async_trait]
impl TransactionLedger for MemoryUnit {
    async fn find_by_id(
        &mut self,
        id: &TransactionId,
        owner: OwnerId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self.working.transaction_for(id, owner).cloned())
    }

    async fn append(&mut self, entry: NewTransaction) -> Result<Transaction, StoreError> {
        if self.working.tx_index.contains_key(&entry.id) {
            return Err(StoreError::DuplicateId(entry.id));
        }
        let created_at = self.working.next_timestamp();
        let tx = Transaction::from_new(entry, created_at);
        self.working
            .tx_index
            .insert(tx.id.clone(), self.working.transactions.len());
        self.working.transactions.push(tx.clone());
        Ok(tx)
    }
}

#[async_trait]
impl OwnerDirectory for MemoryUnit {
    async fn find_owner_by_email(&mut self, email: &str) -> Result<Option<Owner>, StoreError> {
        let key = Owner::normalize_email(email);
        Ok(self
            .working
            .owners_by_email
            .get(&key)
            .and_then(|id| self.working.owners.get(id))
            .cloned())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnit {
            committed,
            working,
            _writer,
        } = *self;
        let mut state = committed
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        *state = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let writer = self.writer.clone().lock_owned().await;
        let working = self.read()?.clone();
        Ok(Box::new(MemoryUnit {
            committed: self.committed.clone(),
            working,
            _writer: writer,
        }))
    }

    async fn wallet_by_owner(&self, owner: OwnerId) -> Result<Option<Wallet>, StoreError> {
        Ok(self.read()?.wallet_for(owner).cloned())
    }

    async fn create_for_owner(
        &self,
        owner: OwnerId,
        currency: Currency,
    ) -> Result<Wallet, StoreError> {
        let _writer = self.writer.lock().await;
        self.write()?.insert_wallet(owner, currency)
    }

    async fn find_transaction(
        &self,
        id: &TransactionId,
        owner: OwnerId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self.read()?.transaction_for(id, owner).cloned())
    }

    async fn list_for_owner(
        &self,
        owner: OwnerId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .read()?
            .transactions
            .iter()
            .rev()
            .filter(|t| t.source_owner_id == owner)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{TransactionStatus, TransactionType};

    fn new_entry(id: &str, wallet: &Wallet, amount: Decimal) -> NewTransaction {
        NewTransaction {
            id: TransactionId::parse(id).unwrap(),
            source_wallet_id: wallet.id,
            source_owner_id: wallet.owner_id,
            recipient_identifier: "bob@example.com".to_string(),
            amount,
            note: None,
            kind: TransactionType::Transfer,
            status: TransactionStatus::Completed,
        }
    }

    #[tokio::test]
    async fn test_create_for_owner_starts_at_zero() {
        let store = MemoryStore::new();
        let owner = store.register_owner("alice@example.com").await.unwrap();

        let wallet = store
            .create_for_owner(owner.id, Currency::Usd)
            .await
            .unwrap();
        assert_eq!(wallet.balance, Decimal::ZERO);
        assert_eq!(wallet.currency, Currency::Usd);

        // 1:1 with the owner
        assert!(matches!(
            store.create_for_owner(owner.id, Currency::Usd).await,
            Err(StoreError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_dropped_unit_discards_writes() {
        let store = MemoryStore::new();
        let (_, wallet) = store
            .open_account("alice@example.com", Currency::Usd, Decimal::new(100, 0))
            .await
            .unwrap();

        {
            let mut unit = store.begin().await.unwrap();
            unit.adjust_balance(wallet.id, Decimal::new(-40, 0))
                .await
                .unwrap();
            unit.append(new_entry("tx-drop", &wallet, Decimal::new(40, 0)))
                .await
                .unwrap();
        }

        let after = store.wallet_by_owner(wallet.owner_id).await.unwrap().unwrap();
        assert_eq!(after.balance, Decimal::new(100, 0));
        assert_eq!(store.transaction_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryStore::new();
        let (_, wallet) = store
            .open_account("alice@example.com", Currency::Usd, Decimal::new(100, 0))
            .await
            .unwrap();

        let mut unit = store.begin().await.unwrap();
        unit.adjust_balance(wallet.id, Decimal::new(-40, 0))
            .await
            .unwrap();
        unit.commit().await.unwrap();

        let after = store.wallet_by_owner(wallet.owner_id).await.unwrap().unwrap();
        assert_eq!(after.balance, Decimal::new(60, 0));
    }

    #[tokio::test]
    async fn test_adjust_balance_rejects_negative_result() {
        let store = MemoryStore::new();
        let (_, wallet) = store
            .open_account("alice@example.com", Currency::Usd, Decimal::new(10, 0))
            .await
            .unwrap();

        let mut unit = store.begin().await.unwrap();
        let res = unit.adjust_balance(wallet.id, Decimal::new(-11, 0)).await;
        assert!(matches!(res, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_balance_overflow_is_a_constraint_error() {
        let store = MemoryStore::new();
        let (alice, wallet) = store
            .open_account("alice@example.com", Currency::Usd, Decimal::MAX)
            .await
            .unwrap();
        store
            .open_account("bob@example.com", Currency::Usd, Decimal::MAX)
            .await
            .unwrap();

        let mut unit = store.begin().await.unwrap();
        let res = unit.adjust_balance(wallet.id, Decimal::ONE).await;
        assert!(matches!(res, Err(StoreError::Constraint(_))));
        drop(unit);

        assert!(matches!(
            store.credit(alice.id, Decimal::ONE).await,
            Err(StoreError::Constraint(_))
        ));
        assert!(matches!(store.total_balance(), Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_find_by_id_in_unit_is_owner_scoped() {
        let store = MemoryStore::new();
        let (_, alice) = store
            .open_account("alice@example.com", Currency::Usd, Decimal::ZERO)
            .await
            .unwrap();
        let (bob, _) = store
            .open_account("bob@example.com", Currency::Usd, Decimal::ZERO)
            .await
            .unwrap();
        let id = TransactionId::parse("tx1").unwrap();

        let mut unit = store.begin().await.unwrap();
        assert!(unit.find_by_id(&id, alice.owner_id).await.unwrap().is_none());
        unit.append(new_entry("tx1", &alice, Decimal::ONE))
            .await
            .unwrap();
        // own uncommitted write is visible, other owners never see it
        assert!(unit.find_by_id(&id, alice.owner_id).await.unwrap().is_some());
        assert!(unit.find_by_id(&id, bob.id).await.unwrap().is_none());
        unit.commit().await.unwrap();

        let mut unit = store.begin().await.unwrap();
        let found = unit.find_by_id(&id, alice.owner_id).await.unwrap().unwrap();
        assert_eq!(found.amount, Decimal::ONE);
        assert!(unit.find_by_id(&id, bob.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_duplicate_id() {
        let store = MemoryStore::new();
        let (_, wallet) = store
            .open_account("alice@example.com", Currency::Usd, Decimal::ZERO)
            .await
            .unwrap();

        let mut unit = store.begin().await.unwrap();
        unit.append(new_entry("tx1", &wallet, Decimal::ONE))
            .await
            .unwrap();
        unit.commit().await.unwrap();

        let mut unit = store.begin().await.unwrap();
        let res = unit.append(new_entry("tx1", &wallet, Decimal::TWO)).await;
        assert!(matches!(res, Err(StoreError::DuplicateId(id)) if id.as_str() == "tx1"));
    }

    #[tokio::test]
    async fn test_find_transaction_is_owner_scoped() {
        let store = MemoryStore::new();
        let (_, alice) = store
            .open_account("alice@example.com", Currency::Usd, Decimal::ZERO)
            .await
            .unwrap();
        let (bob, _) = store
            .open_account("bob@example.com", Currency::Usd, Decimal::ZERO)
            .await
            .unwrap();

        let mut unit = store.begin().await.unwrap();
        unit.append(new_entry("tx1", &alice, Decimal::ONE))
            .await
            .unwrap();
        unit.commit().await.unwrap();

        let id = TransactionId::parse("tx1").unwrap();
        assert!(store.find_transaction(&id, alice.owner_id).await.unwrap().is_some());
        assert!(store.find_transaction(&id, bob.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_paging() {
        let store = MemoryStore::new();
        let (_, wallet) = store
            .open_account("alice@example.com", Currency::Usd, Decimal::ZERO)
            .await
            .unwrap();

        for i in 0..5 {
            let mut unit = store.begin().await.unwrap();
            unit.append(new_entry(&format!("tx{}", i), &wallet, Decimal::ONE))
                .await
                .unwrap();
            unit.commit().await.unwrap();
        }

        let page = store.list_for_owner(wallet.owner_id, 2, 0).await.unwrap();
        let ids: Vec<_> = page.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tx4", "tx3"]);

        let page = store.list_for_owner(wallet.owner_id, 2, 4).await.unwrap();
        let ids: Vec<_> = page.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tx0"]);
    }

    #[tokio::test]
    async fn test_owner_lookup_ignores_case() {
        let store = MemoryStore::new();
        let owner = store.register_owner("Bob@Example.com").await.unwrap();

        let mut unit = store.begin().await.unwrap();
        let found = unit.find_owner_by_email(" BOB@example.COM").await.unwrap();
        assert_eq!(found.map(|o| o.id), Some(owner.id));
    }

    #[tokio::test]
    async fn test_lock_wallets_sorted_and_deduped() {
        let store = MemoryStore::new();
        let (_, a) = store
            .open_account("a@example.com", Currency::Usd, Decimal::ZERO)
            .await
            .unwrap();
        let (_, b) = store
            .open_account("b@example.com", Currency::Usd, Decimal::ZERO)
            .await
            .unwrap();

        let mut unit = store.begin().await.unwrap();
        let locked = unit.lock_wallets(&[b.id, a.id, b.id]).await.unwrap();
        let ids: Vec<_> = locked.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
