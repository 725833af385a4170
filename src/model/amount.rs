//! The `Amount` type for the money value of a ledger entry.
//!
//! Amounts are typed by hand into the form, so parsing tolerates surrounding whitespace and commas
//! used as thousands separators. The value is held as a `Decimal` so that `0.1 + 0.2` style
//! rounding never reaches the ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a money amount entered on the form.
///
/// # Examples
///
/// ```
/// # use ledger_form::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str(" 1,250.50 ").unwrap();
/// assert_eq!(amount.to_string(), "1250.50");
/// assert!(amount.is_positive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    Empty,
    Invalid(rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => f.write_str("Empty"),
            AmountError::Invalid(e) => Debug::fmt(e, f),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => f.write_str("an amount is required"),
            AmountError::Invalid(e) => Display::fmt(e, f),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Empty => None,
            AmountError::Invalid(e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        let without_commas = trimmed.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError::Invalid)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_whitespace_and_commas() {
        let amount = Amount::from_str("  1,234,567.89 ").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1234567.89").unwrap());
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(Amount::from_str(""), Err(AmountError::Empty)));
        assert!(matches!(Amount::from_str("   "), Err(AmountError::Empty)));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(Amount::from_str("abc"), Err(AmountError::Invalid(_))));
        assert!(Amount::from_str("12abc").is_err());
    }

    #[test]
    fn test_is_positive() {
        assert!(Amount::from_str("0.01").unwrap().is_positive());
        assert!(!Amount::from_str("0").unwrap().is_positive());
        assert!(!Amount::from_str("0.00").unwrap().is_positive());
        assert!(!Amount::from_str("-5").unwrap().is_positive());
    }

    #[test]
    fn test_serde() {
        let amount = Amount::from_str("1,000.50").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1000.50\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
