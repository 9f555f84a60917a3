//! Money types for API boundary enforcement
//!
//! - `StrictDecimal`: Format-validated input type
//! - `DisplayAmount`: Type-safe output formatting

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{self, Currency};

// ============================================================================
// StrictDecimal: Format-Validated Decimal at Serde Layer
// ============================================================================

/// Strict format Decimal - validates format during deserialization
///
/// Accepts a JSON string or a plain JSON number; both go through
/// [`money::parse_decimal`]. Numbers keep the digits the client sent
/// (serde_json `arbitrary_precision`), they never pass through `f64`:
/// - Rejects `.5` (must be `0.5`)
/// - Rejects `5.` (must be `5.0` or `5`)
/// - Rejects scientific notation, `+` and separators
/// - A leading `-` is kept as a negative value so the engine reports
///   `INVALID_AMOUNT` instead of a parse error
///
/// Currency precision is checked later against the sender's wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let raw = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(D::Error::custom(format!(
                    "amount must be a string or number, got {}",
                    other
                )));
            }
        };

        match money::parse_decimal(&raw) {
            Ok(d) => Ok(StrictDecimal(d)),
            Err(money::MoneyError::InvalidAmount) => {
                // "-x": parse the magnitude for the format check only
                let trimmed = raw.trim();
                let magnitude = money::parse_decimal(trimmed.strip_prefix('-').unwrap_or(trimmed))
                    .map_err(|e| D::Error::custom(e.to_string()))?;
                Ok(StrictDecimal(-magnitude))
            }
            Err(e) => Err(D::Error::custom(e.to_string())),
        }
    }
}

// ============================================================================
// DisplayAmount: Type-Safe Output for API Responses
// ============================================================================

/// Display amount for API responses. Always serialized as a JSON string with
/// the currency's fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayAmount(String);

impl DisplayAmount {
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self(money::format_amount(value, currency))
    }

    /// Ledger amounts already carry the currency scale
    pub fn from_stored(value: Decimal) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn parse(json: &str) -> Result<StrictDecimal, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_accepts_string_and_number() {
        assert_eq!(parse(r#""40.00""#).unwrap().inner(), Decimal::from_str("40.00").unwrap());
        assert_eq!(parse("40").unwrap().inner(), Decimal::from(40));
        assert_eq!(parse("12.5").unwrap().inner(), Decimal::from_str("12.5").unwrap());
    }

    #[test]
    fn test_number_keeps_every_digit() {
        let got = parse("1234567890123456.78").unwrap().inner();
        assert_eq!(got, Decimal::from_str("1234567890123456.78").unwrap());
        assert_eq!(got.to_string(), "1234567890123456.78");

        // more digits than the currency allows must reach the scale check
        assert_eq!(parse("0.001").unwrap().inner().scale(), 3);
        assert_eq!(parse("0.10").unwrap().inner().to_string(), "0.10");
    }

    #[test]
    fn test_rejects_exponent_numbers() {
        for case in ["1e2", "1E2", "1.5e1", "-1e2"] {
            assert!(parse(case).is_err(), "should reject {}", case);
        }
    }

    #[test]
    fn test_negative_is_kept_for_engine() {
        assert_eq!(parse(r#""-5""#).unwrap().inner(), Decimal::from(-5));
        assert_eq!(parse("-5").unwrap().inner(), Decimal::from(-5));
    }

    #[test]
    fn test_rejects_bad_formats() {
        for case in [r#"".5""#, r#""5.""#, r#""1e3""#, r#""""#, r#""abc""#, "true", r#""--5""#, "null", "[1]"] {
            assert!(parse(case).is_err(), "should reject {}", case);
        }
    }

    #[test]
    fn test_display_amount() {
        let d = DisplayAmount::new(Decimal::from(60), Currency::Usd);
        assert_eq!(d.as_str(), "60.00");
        assert_eq!(serde_json::to_string(&d).unwrap(), r#""60.00""#);
    }
}
