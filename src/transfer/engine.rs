//! Transfer Engine
//!
//! Moves funds between two wallets as one atomic unit.
//!
//! # Flow
//!
//! ```text
//! replay check ─► validate ─► begin unit ─► source wallet ─► balance check
//!     │                                                          │
//!     └─► recorded outcome                 recipient ◄───────────┘
//!                                              │
//!              lock (asc id) ─► re-check ─► debit/credit ─► append ─► commit
//! ```
//!
//! A second delivery of the same transaction id normally stops at the replay
//! check. One that raced past it looks the id up again inside its unit, once
//! on entry and once more after the wallet locks are held, so a winner that
//! committed meanwhile is replayed instead of being re-debited. The ledger's
//! unique id is the final arbiter: a loser that still reaches `append`
//! re-reads the winner.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use super::error::TransferError;
use super::types::{BalanceView, TransferOutcome, TransferPlan, TransferRequest};
use crate::ledger::{NewTransaction, Transaction, TransactionId, TransactionStatus, TransactionType};
use crate::money::Amount;
use crate::store::{LedgerStore, StoreError, UnitOfWork};
use crate::wallet::OwnerId;

/// Upper bound for one unit (begin through commit)
pub const DEFAULT_UNIT_TIMEOUT: Duration = Duration::from_secs(5);

/// How a unit ended without error
#[derive(Debug)]
enum Settled {
    Applied(Transaction),
    /// The id was already recorded for this actor; nothing was written
    Recorded(Transaction),
}

/// Why a unit was abandoned
#[derive(Debug)]
enum Abort {
    Rejected(TransferError),
    Store(StoreError),
}

impl From<TransferError> for Abort {
    fn from(e: TransferError) -> Self {
        Abort::Rejected(e)
    }
}

impl From<StoreError> for Abort {
    fn from(e: StoreError) -> Self {
        Abort::Store(e)
    }
}

pub struct TransferEngine {
    store: Arc<dyn LedgerStore>,
    unit_timeout: Duration,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            unit_timeout: DEFAULT_UNIT_TIMEOUT,
        }
    }

    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        self.unit_timeout = timeout;
        self
    }

    /// Transfer `req.amount` from the actor's wallet to the wallet of
    /// `req.recipient`.
    ///
    /// Repeating a call with the same `transaction_id` returns the first
    /// outcome with `replayed = true` and leaves balances untouched.
    pub async fn transfer(
        &self,
        actor: OwnerId,
        req: TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        if let Some(id) = &req.transaction_id {
            if let Some(prior) = self.store.find_transaction(id, actor).await? {
                tracing::debug!(
                    transaction_id = %id,
                    owner_id = %actor,
                    "Transfer already processed, returning recorded outcome"
                );
                return Ok(TransferOutcome::replayed(&prior));
            }
        }

        if req.amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }
        let recipient = req.recipient.trim();
        if recipient.is_empty() {
            return Err(TransferError::MissingRecipient);
        }

        let plan = TransferPlan {
            actor,
            id: req.transaction_id.unwrap_or_else(TransactionId::generate),
            recipient: recipient.to_string(),
            amount: req.amount,
            note: req
                .note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };
        self.settle(plan).await
    }

    /// Run the atomic unit for an already-validated plan
    pub(crate) async fn settle(&self, plan: TransferPlan) -> Result<TransferOutcome, TransferError> {
        let result = match tokio::time::timeout(self.unit_timeout, self.run_unit(&plan)).await {
            Ok(result) => result,
            Err(_) => {
                // the dropped unit never committed
                tracing::error!(
                    transaction_id = %plan.id,
                    owner_id = %plan.actor,
                    timeout_ms = self.unit_timeout.as_millis() as u64,
                    "Transfer timed out before commit"
                );
                return Err(TransferError::StoreUnavailable(
                    "transfer timed out before commit".to_string(),
                ));
            }
        };

        match result {
            Ok(Settled::Recorded(prior)) => {
                tracing::debug!(
                    transaction_id = %prior.id,
                    owner_id = %plan.actor,
                    "Transfer committed by a concurrent delivery, returning recorded outcome"
                );
                Ok(TransferOutcome::replayed(&prior))
            }
            Ok(Settled::Applied(tx)) => {
                tracing::info!(
                    transaction_id = %tx.id,
                    owner_id = %tx.source_owner_id,
                    recipient = %tx.recipient_identifier,
                    amount = %tx.amount,
                    "Transfer committed"
                );
                Ok(TransferOutcome::applied(&tx))
            }
            Err(Abort::Store(StoreError::DuplicateId(id))) => self.resolve_race(&id, plan.actor).await,
            Err(Abort::Store(e)) => {
                tracing::error!(
                    transaction_id = %plan.id,
                    owner_id = %plan.actor,
                    error = %e,
                    "Transfer aborted by store"
                );
                Err(e.into())
            }
            Err(Abort::Rejected(e)) => {
                tracing::debug!(
                    transaction_id = %plan.id,
                    owner_id = %plan.actor,
                    code = e.code(),
                    "Transfer rejected"
                );
                Err(e)
            }
        }
    }

    async fn run_unit(&self, plan: &TransferPlan) -> Result<Settled, Abort> {
        let mut unit = self.store.begin().await?;
        match apply(unit.as_mut(), plan).await {
            Ok(Settled::Applied(tx)) => {
                unit.commit().await?;
                Ok(Settled::Applied(tx))
            }
            Ok(Settled::Recorded(prior)) => {
                unit.rollback().await?;
                Ok(Settled::Recorded(prior))
            }
            Err(abort) => {
                if let Err(e) = unit.rollback().await {
                    tracing::warn!(transaction_id = %plan.id, error = %e, "Rollback failed");
                }
                Err(abort)
            }
        }
    }

    /// Another unit committed this id first
    async fn resolve_race(
        &self,
        id: &TransactionId,
        actor: OwnerId,
    ) -> Result<TransferOutcome, TransferError> {
        match self.store.find_transaction(id, actor).await? {
            Some(winner) => {
                tracing::warn!(
                    transaction_id = %id,
                    owner_id = %actor,
                    "Lost idempotency race, returning winner's outcome"
                );
                Ok(TransferOutcome::replayed(&winner))
            }
            None => {
                tracing::warn!(
                    transaction_id = %id,
                    owner_id = %actor,
                    "Transaction id belongs to another owner"
                );
                Err(TransferError::IdempotencyKeyConflict(id.clone()))
            }
        }
    }

    /// Lock-free balance read for display
    pub async fn get_balance(&self, actor: OwnerId) -> Result<BalanceView, TransferError> {
        self.store
            .wallet_by_owner(actor)
            .await?
            .map(BalanceView::from)
            .ok_or(TransferError::WalletNotFound)
    }
}

async fn apply(unit: &mut dyn UnitOfWork, plan: &TransferPlan) -> Result<Settled, Abort> {
    if let Some(prior) = unit.find_by_id(&plan.id, plan.actor).await? {
        return Ok(Settled::Recorded(prior));
    }

    let source = unit
        .get_by_owner(plan.actor)
        .await?
        .ok_or(TransferError::WalletNotFound)?;

    let amount = Amount::new(plan.amount, source.currency).map_err(TransferError::from)?;
    if !source.can_cover(amount.value()) {
        return Err(TransferError::InsufficientBalance.into());
    }

    let recipient = unit
        .find_owner_by_email(&plan.recipient)
        .await?
        .ok_or(TransferError::RecipientNotFound)?;
    if recipient.id == plan.actor {
        return Err(TransferError::SelfTransfer.into());
    }

    let target = unit
        .get_by_owner(recipient.id)
        .await?
        .ok_or(TransferError::RecipientWalletNotFound)?;
    if target.currency != source.currency {
        return Err(TransferError::CurrencyMismatch {
            sender: source.currency,
            recipient: target.currency,
        }
        .into());
    }

    // balances may have moved since the unlocked reads above
    let locked = unit.lock_wallets(&[source.id, target.id]).await?;
    let source = locked
        .iter()
        .find(|w| w.id == source.id)
        .ok_or(TransferError::WalletNotFound)?;
    if !locked.iter().any(|w| w.id == target.id) {
        return Err(TransferError::RecipientWalletNotFound.into());
    }
    // a same-id delivery holding these locks has committed by now
    if let Some(prior) = unit.find_by_id(&plan.id, plan.actor).await? {
        return Ok(Settled::Recorded(prior));
    }
    if !source.can_cover(amount.value()) {
        return Err(TransferError::InsufficientBalance.into());
    }

    unit.adjust_balance(source.id, -amount.value()).await?;
    unit.adjust_balance(target.id, amount.value()).await?;

    let entry = NewTransaction {
        id: plan.id.clone(),
        source_wallet_id: source.id,
        source_owner_id: plan.actor,
        recipient_identifier: plan.recipient.clone(),
        amount: amount.value(),
        note: plan.note.clone(),
        kind: TransactionType::Transfer,
        status: TransactionStatus::Completed,
    };
    Ok(Settled::Applied(unit.append(entry).await?))
}
