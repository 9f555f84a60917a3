//! Transfer Error Types

use thiserror::Error;

use crate::ledger::TransactionId;
use crate::money::{Currency, MoneyError};
use crate::store::StoreError;

/// Transfer error types
///
/// Idempotent replays and lost uniqueness races are not errors: both resolve
/// to the recorded outcome. The only surfaced duplicate is a key that
/// already belongs to another owner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Amount precision exceeds currency limit ({provided} > {max} decimals)")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Recipient is required")]
    MissingRecipient,

    #[error("Cannot transfer to your own wallet")]
    SelfTransfer,

    #[error("Currency mismatch: sender holds {sender}, recipient holds {recipient}")]
    CurrencyMismatch { sender: Currency, recipient: Currency },

    // === Not Found ===
    #[error("Wallet not found")]
    WalletNotFound,

    #[error("Recipient not found")]
    RecipientNotFound,

    #[error("Recipient wallet not found")]
    RecipientWalletNotFound,

    // === Business ===
    #[error("Insufficient balance")]
    InsufficientBalance,

    // === Idempotency ===
    #[error("Transaction id {0} is already in use")]
    IdempotencyKeyConflict(TransactionId),

    // === System Errors ===
    #[error("Service unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal system error: {0}")]
    Internal(String),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::PrecisionOverflow { .. } => "PRECISION_OVERFLOW",
            TransferError::MissingRecipient => "MISSING_RECIPIENT",
            TransferError::SelfTransfer => "SELF_TRANSFER",
            TransferError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            TransferError::WalletNotFound => "WALLET_NOT_FOUND",
            TransferError::RecipientNotFound => "RECIPIENT_NOT_FOUND",
            TransferError::RecipientWalletNotFound => "RECIPIENT_WALLET_NOT_FOUND",
            TransferError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            TransferError::IdempotencyKeyConflict(_) => "IDEMPOTENCY_KEY_CONFLICT",
            TransferError::StoreUnavailable(_) => "SERVICE_UNAVAILABLE",
            TransferError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InvalidAmount
            | TransferError::PrecisionOverflow { .. }
            | TransferError::MissingRecipient
            | TransferError::SelfTransfer
            | TransferError::CurrencyMismatch { .. }
            | TransferError::InsufficientBalance => 400,
            TransferError::WalletNotFound
            | TransferError::RecipientNotFound
            | TransferError::RecipientWalletNotFound => 404,
            TransferError::IdempotencyKeyConflict(_) => 409,
            TransferError::Internal(_) => 500,
            TransferError::StoreUnavailable(_) => 503,
        }
    }

    /// Safe to retry with the same transaction id
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransferError::StoreUnavailable(_))
    }
}

impl From<MoneyError> for TransferError {
    fn from(e: MoneyError) -> Self {
        match e {
            MoneyError::InvalidAmount => TransferError::InvalidAmount,
            MoneyError::PrecisionOverflow { provided, max } => {
                TransferError::PrecisionOverflow { provided, max }
            }
            other => TransferError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => TransferError::StoreUnavailable(msg),
            other => TransferError::Internal(other.to_string()),
        }
    }
}
