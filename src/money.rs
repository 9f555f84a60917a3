//! Money Module
//!
//! Fixed-point representation of wallet amounts. Every amount that crosses the
//! engine boundary goes through this module; no floating point arithmetic is
//! ever applied to balances.
//!
//! ## Representation
//! - Amounts and balances are `rust_decimal::Decimal` values
//! - Each wallet has a [`Currency`] fixed at creation, which carries the
//!   number of fractional digits (`scale`) its amounts may use
//! - An [`Amount`] is always strictly positive and rescaled to the currency
//!   scale, so `40` and `40.00` USD are stored and echoed identically
//!
//! ## Usage
//! ```rust
//! use wallet_ledger::money::{Amount, Currency, format_amount, parse_amount};
//!
//! let value = parse_amount("40.5", Currency::Usd).unwrap();
//! let amount = Amount::new(value, Currency::Usd).unwrap();
//! assert_eq!(format_amount(amount.value(), Currency::Usd), "40.50");
//! ```

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Money validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

// ============================================================================
// Currency
// ============================================================================

/// Wallet currency. Fixed when the wallet is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    /// ISO 4217 code, as persisted in `wallets.currency`
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    /// Number of fractional digits of the smallest unit
    pub fn scale(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            Currency::Usd | Currency::Eur | Currency::Gbp => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            _ => Err(MoneyError::UnsupportedCurrency(s.to_string())),
        }
    }
}

// ============================================================================
// Amount
// ============================================================================

/// A strictly positive transfer amount, validated against a currency scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Validate `value` for `currency`.
    ///
    /// Rejects zero/negative values and values with more fractional digits
    /// than the currency allows. Trailing zeros do not count against the
    /// scale (`1.2300` is a valid USD amount). No silent rounding.
    pub fn new(value: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        if value <= Decimal::ZERO {
            return Err(MoneyError::InvalidAmount);
        }

        let provided = value.normalize().scale();
        let max = currency.scale();
        if provided > max {
            return Err(MoneyError::PrecisionOverflow { provided, max });
        }

        let mut scaled = value.normalize();
        scaled.rescale(max);
        Ok(Self(scaled))
    }

    #[inline]
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Parse / Format
// ============================================================================

/// Parse a client-supplied amount string for `currency`.
///
/// Strict format: digits with an optional single `.` that has digits on both
/// sides. Signs, exponents and separators are rejected.
pub fn parse_amount(amount_str: &str, currency: Currency) -> Result<Decimal, MoneyError> {
    let value = parse_decimal(amount_str)?;
    Amount::new(value, currency).map(|a| a.value())
}

/// Format-only half of [`parse_amount`], for callers that do not know the
/// wallet currency yet. Zero passes; a leading `-` is `InvalidAmount`.
pub fn parse_decimal(amount_str: &str) -> Result<Decimal, MoneyError> {
    let s = amount_str.trim();
    if s.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }
    if s.starts_with('-') {
        return Err(MoneyError::InvalidAmount);
    }

    let (whole, frac) = match s.split_once('.') {
        None => (s, ""),
        Some((w, f)) => {
            if w.is_empty() || f.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "use a leading and trailing digit around '.' (e.g. 0.50)".into(),
                ));
            }
            (w, f)
        }
    };

    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(format!("invalid amount: {}", s)));
    }

    Decimal::from_str(s).map_err(|e| MoneyError::InvalidFormat(e.to_string()))
}

/// Render a balance or amount with exactly the currency's fractional digits.
pub fn format_amount(value: Decimal, currency: Currency) -> String {
    format!("{:.prec$}", value, prec = currency.scale() as usize)
}
