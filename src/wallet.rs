//! Wallet and owner types
//!
//! An owner (account holder) is managed by the authentication collaborator;
//! the ledger only needs its id and the email used to address transfers.
//! Each owner has exactly one wallet, created with a zero balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::money::Currency;

/// Account identity, as asserted by the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl OwnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[inline]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OwnerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Wallet primary key.
///
/// Ordered: row locks for a transfer are always taken in ascending
/// `WalletId` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(i64);

impl WalletId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account holder, resolvable by email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: OwnerId,
    pub email: String,
}

impl Owner {
    /// Emails are matched case-insensitively, ignoring surrounding whitespace
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

/// Per-owner balance record in a single currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub id: WalletId,
    pub owner_id: OwnerId,
    /// Never negative at any observable time
    pub balance: Decimal,
    pub currency: Currency,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    #[inline]
    pub fn can_cover(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_id_parse() {
        let id = OwnerId::new();
        let parsed: OwnerId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<OwnerId>().is_err());
    }

    #[test]
    fn test_wallet_id_ordering() {
        let mut ids = vec![WalletId::new(7), WalletId::new(2), WalletId::new(5)];
        ids.sort();
        assert_eq!(ids, vec![WalletId::new(2), WalletId::new(5), WalletId::new(7)]);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(Owner::normalize_email("  Bob@Example.COM "), "bob@example.com");
    }

    #[test]
    fn test_can_cover_full_balance() {
        let wallet = Wallet {
            id: WalletId::new(1),
            owner_id: OwnerId::new(),
            balance: Decimal::new(10000, 2),
            currency: Currency::Usd,
            updated_at: Utc::now(),
        };
        assert!(wallet.can_cover(Decimal::new(10000, 2)));
        assert!(!wallet.can_cover(Decimal::new(10001, 2)));
    }
}
