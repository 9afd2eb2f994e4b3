//! Type-safe price representation using decimal arithmetic.
//!
//! Remote records store prices as plain JSON numbers (sometimes as numeric
//! strings). Both are parsed into a [`Decimal`] so that `19.99` stays
//! `19.99` instead of drifting through binary floating point.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The value is not a number or numeric string.
    #[error("price must be a number, got {0}")]
    NotNumeric(String),
    /// The number cannot be represented as a decimal (NaN, infinite, too large).
    #[error("price is out of range: {0}")]
    OutOfRange(String),
}

/// A product price in the store's single currency.
///
/// Serialises as a JSON number: whole amounts as integers (`20`), others as
/// floats (`19.99`). Deserialises from anything [`Price::from_json`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a price from a loosely-typed JSON value.
    ///
    /// Accepts integers, floats and numeric strings.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotNumeric` for any other JSON type or a
    /// non-numeric string, and `PriceError::OutOfRange` for numbers a
    /// decimal cannot hold.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, PriceError> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Self(Decimal::from(i)));
                }
                if let Some(u) = n.as_u64() {
                    return Ok(Self(Decimal::from(u)));
                }
                // Round-trip through the shortest textual form so 19.99 parses
                // as exactly 19.99.
                Decimal::from_str(&n.to_string())
                    .or_else(|_| Decimal::from_scientific(&n.to_string()))
                    .map(Self)
                    .map_err(|_| PriceError::OutOfRange(n.to_string()))
            }
            serde_json::Value::String(s) => s.trim().parse(),
            other => Err(PriceError::NotNumeric(other.to_string())),
        }
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map(Self)
            .map_err(|_| PriceError::NotNumeric(s.to_owned()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0.normalize())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let amount = self.0.normalize();
        if amount.scale() == 0
            && let Some(whole) = amount.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        match amount.to_f64() {
            Some(float) => serializer.serialize_f64(float),
            None => Err(serde::ser::Error::custom(PriceError::OutOfRange(amount.to_string()))),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}
