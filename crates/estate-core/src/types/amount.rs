//! Monetary amounts
//!
//! Prices are whole currency units. Clients of the gateway post form values,
//! so an amount decodes from either a JSON number or a numeric string.

use crate::errors::{EstateError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Non-negative whole amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Amount stored after an offer is rejected
    pub const ZERO: Amount = Amount(0);

    /// Amount of `value` whole units
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Whole units
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Parse a decimal string such as `"95000"`
    pub fn parse(raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| EstateError::invalid(format!("not a whole non-negative amount: {raw:?}")))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Amount {
    type Err = EstateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Number(n) => Ok(Self(n)),
            AmountRepr::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
