//! Integer amounts for custody balances
//!
//! Uses rust_decimal with scale 0 so every fold is checked: an overflow is
//! an `AmountError`, never a wrapped or truncated value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AmountError;

/// Signed integer amount in the smallest unit of an asset.
///
/// Decoding goes through `try_from_decimal`, so a stored fractional value
/// is rejected rather than carried into the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn new(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Wrap a decimal, rejecting anything with a fractional part.
    pub fn try_from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if !value.fract().is_zero() {
            return Err(AmountError::NotInteger(value.to_string()));
        }
        // trunc() drops trailing zero scale so "5.00" and "5" encode alike
        Ok(Self(value.trunc()))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Amount) -> Result<Amount, AmountError> {
        self.0
            .checked_add(rhs.0)
            .map(Amount)
            .ok_or_else(|| AmountError::Overflow {
                lhs: self.to_string(),
                rhs: rhs.to_string(),
            })
    }

    pub fn checked_sub(self, rhs: Amount) -> Result<Amount, AmountError> {
        self.0
            .checked_sub(rhs.0)
            .map(Amount)
            .ok_or_else(|| AmountError::Overflow {
                lhs: self.to_string(),
                rhs: rhs.to_string(),
            })
    }

    /// Fold an iterator of amounts with overflow checking.
    pub fn checked_sum<I>(amounts: I) -> Result<Amount, AmountError>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s).map_err(|e| AmountError::Parse {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::try_from_decimal(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_from_decimal(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}
