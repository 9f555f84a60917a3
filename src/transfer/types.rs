//! Transfer request/result types

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Transaction, TransactionId, TransactionStatus};
use crate::money::Currency;
use crate::wallet::{OwnerId, Wallet, WalletId};

/// Validated caller input for one transfer
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Email of the recipient owner
    pub recipient: String,
    pub amount: Decimal,
    /// Client idempotency key; a fresh one is generated when absent
    pub transaction_id: Option<TransactionId>,
    pub note: Option<String>,
}

impl TransferRequest {
    pub fn new(recipient: impl Into<String>, amount: Decimal) -> Self {
        Self {
            recipient: recipient.into(),
            amount,
            transaction_id: None,
            note: None,
        }
    }

    pub fn with_transaction_id(mut self, id: TransactionId) -> Self {
        self.transaction_id = Some(id);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Fully resolved inputs of one atomic unit
#[derive(Debug, Clone)]
pub(crate) struct TransferPlan {
    pub actor: OwnerId,
    pub id: TransactionId,
    pub recipient: String,
    pub amount: Decimal,
    pub note: Option<String>,
}

/// Public projection of a ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub id: TransactionId,
    pub amount: Decimal,
    pub recipient_identifier: String,
    pub status: TransactionStatus,
}

impl From<&Transaction> for TransferReceipt {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            amount: tx.amount,
            recipient_identifier: tx.recipient_identifier.clone(),
            status: tx.status,
        }
    }
}

/// Result of [`TransferEngine::transfer`](super::TransferEngine::transfer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub receipt: TransferReceipt,
    /// The id was already recorded; nothing was applied this time
    pub replayed: bool,
}

impl TransferOutcome {
    pub(crate) fn applied(tx: &Transaction) -> Self {
        Self {
            receipt: tx.into(),
            replayed: false,
        }
    }

    pub(crate) fn replayed(tx: &Transaction) -> Self {
        Self {
            receipt: tx.into(),
            replayed: true,
        }
    }
}

/// Display-only wallet view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub wallet_id: WalletId,
    pub balance: Decimal,
    pub currency: Currency,
}

impl From<Wallet> for BalanceView {
    fn from(w: Wallet) -> Self {
        Self {
            wallet_id: w.id,
            balance: w.balance,
            currency: w.currency,
        }
    }
}
