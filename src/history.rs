//! History Reader - paginated ledger view for one owner
//!
//! Newest entries first. Each page is an independent query, so an append
//! between two page reads can shift later pages by one entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::config::HistoryConfig;
use crate::ledger::{Transaction, TransactionId, TransactionStatus};
use crate::store::{LedgerStore, StoreError};
use crate::wallet::OwnerId;

/// Caller-supplied paging, before bounds are applied
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// One row of the history listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: TransactionId,
    pub amount: Decimal,
    pub recipient_identifier: String,
    /// Empty when no note was given
    pub note: String,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

impl From<Transaction> for HistoryEntry {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            amount: tx.amount,
            recipient_identifier: tx.recipient_identifier,
            note: tx.note.unwrap_or_default(),
            status: tx.status,
            timestamp: tx.created_at,
        }
    }
}

pub struct HistoryReader {
    store: Arc<dyn LedgerStore>,
    default_limit: u32,
    max_limit: u32,
}

impl HistoryReader {
    pub fn new(store: Arc<dyn LedgerStore>, config: &HistoryConfig) -> Self {
        Self {
            store,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }

    /// Missing or zero limit means the default; anything above the cap is
    /// clamped to it.
    pub fn effective_limit(&self, requested: Option<u32>) -> u32 {
        match requested {
            None | Some(0) => self.default_limit,
            Some(n) => n.min(self.max_limit),
        }
    }

    pub async fn list_for_owner(
        &self,
        owner: OwnerId,
        query: HistoryQuery,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let limit = self.effective_limit(query.limit);
        let offset = query.offset.unwrap_or(0);

        let rows = self.store.list_for_owner(owner, limit, offset).await?;
        tracing::debug!(owner_id = %owner, limit, offset, rows = rows.len(), "History page read");
        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }
}
