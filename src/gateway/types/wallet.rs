//! Wallet endpoint request/response DTOs

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::money::{DisplayAmount, StrictDecimal};
use crate::history::HistoryEntry;
use crate::transfer::{BalanceView, TransferReceipt};

/// `POST /wallet/transfer` body
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody {
    #[serde(default)]
    #[validate(length(max = 254))]
    pub recipient_email: String,
    pub amount: StrictDecimal,
    /// `""` means no key, like an absent field
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 64))]
    pub transaction_id: Option<String>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: String,
    pub amount: DisplayAmount,
    pub recipient_email: String,
    pub status: String,
}

impl From<&TransferReceipt> for TransactionView {
    fn from(r: &TransferReceipt) -> Self {
        Self {
            id: r.id.to_string(),
            amount: DisplayAmount::from_stored(r.amount),
            recipient_email: r.recipient_identifier.clone(),
            status: r.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransferData {
    pub transaction: TransactionView,
}

#[derive(Debug, Serialize)]
pub struct WalletView {
    pub id: i64,
    pub balance: DisplayAmount,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceData {
    pub wallet: WalletView,
}

impl From<BalanceView> for BalanceData {
    fn from(v: BalanceView) -> Self {
        Self {
            wallet: WalletView {
                id: v.wallet_id.get(),
                balance: DisplayAmount::new(v.balance, v.currency),
                currency: v.currency.code().to_string(),
            },
        }
    }
}

/// `GET /wallet/transactions` query
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: String,
    pub amount: DisplayAmount,
    pub recipient_email: String,
    pub note: String,
    pub status: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

impl From<HistoryEntry> for HistoryItem {
    fn from(e: HistoryEntry) -> Self {
        Self {
            id: e.id.to_string(),
            amount: DisplayAmount::from_stored(e.amount),
            recipient_email: e.recipient_identifier,
            note: e.note,
            status: e.status.as_str().to_string(),
            timestamp: e
                .timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}
