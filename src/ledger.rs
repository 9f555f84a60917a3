//! Ledger - Transaction record types
//!
//! Every transfer that reaches its commit point is recorded as exactly one
//! immutable [`Transaction`]. The transaction id doubles as the idempotency
//! key: it is unique across the whole ledger and never rewritten.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::wallet::{OwnerId, WalletId};

/// Upper bound on client-supplied idempotency keys
pub const MAX_TRANSACTION_ID_LEN: usize = 64;

/// Idempotency key / ledger primary key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionIdError {
    #[error("Transaction id must not be empty")]
    Empty,
    #[error("Transaction id exceeds {} characters", MAX_TRANSACTION_ID_LEN)]
    TooLong,
}

impl TransactionId {
    /// Fresh server-side id for requests without a client key
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a client-supplied key
    pub fn parse(raw: &str) -> Result<Self, TransactionIdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TransactionIdError::Empty);
        }
        if raw.chars().count() > MAX_TRANSACTION_ID_LEN {
            return Err(TransactionIdError::TooLong);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome recorded for a transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // older rows were written upper-case
        match s.to_lowercase().as_str() {
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(format!("Invalid transaction status: {}", other)),
        }
    }
}

/// Kind of ledger entry. Only wallet-to-wallet transfers exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "transfer",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(format!("Invalid transaction type: {}", other)),
        }
    }
}

/// Entry to be appended; `created_at` is assigned by the store
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub id: TransactionId,
    pub source_wallet_id: WalletId,
    pub source_owner_id: OwnerId,
    pub recipient_identifier: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub kind: TransactionType,
    pub status: TransactionStatus,
}

/// Persisted ledger entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub source_wallet_id: WalletId,
    pub source_owner_id: OwnerId,
    /// Recipient as addressed by the sender; the recipient wallet is not referenced
    pub recipient_identifier: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub kind: TransactionType,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn from_new(entry: NewTransaction, created_at: DateTime<Utc>) -> Self {
        Self {
            id: entry.id,
            source_wallet_id: entry.source_wallet_id,
            source_owner_id: entry.source_owner_id,
            recipient_identifier: entry.recipient_identifier,
            amount: entry.amount,
            note: entry.note,
            kind: entry.kind,
            status: entry.status,
            created_at,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction[{}] wallet={} owner={} -> {} amount={} status={}",
            self.id,
            self.source_wallet_id,
            self.source_owner_id,
            self.recipient_identifier,
            self.amount,
            self.status
        )
    }
}
