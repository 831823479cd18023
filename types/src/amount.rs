//! Value amount type.
//!
//! Amounts are represented as fixed-width integers (u128) to avoid
//! floating-point drift. The smallest unit is 1 raw. Amounts are serialized
//! as decimal strings only at the RPC boundary; internally they stay raw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

/// A non-negative value amount in raw units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u128);

/// Errors from amount arithmetic and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount overflow")]
    Overflow,

    #[error("amount underflow (result would be negative)")]
    Underflow,

    #[error("cannot parse amount from {0:?}")]
    Parse(String),
}

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Decimal-string form used at the RPC boundary.
    pub fn to_decimal_string(&self) -> String {
        self.0.to_string()
    }
}

impl Add for Amount {
    type Output = Result<Amount, AmountError>;

    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).ok_or(AmountError::Overflow)
    }
}

impl Sub for Amount {
    type Output = Result<Amount, AmountError>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).ok_or(AmountError::Underflow)
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
        s.parse::<u128>()
            .map(Amount)
            .map_err(|_| AmountError::Parse(s.to_string()))
    }
}

impl From<u64> for Amount {
    fn from(raw: u64) -> Self {
        Self(u128::from(raw))
    }
}

/// Sum an iterator of amounts, failing on overflow.
pub fn sum_amounts<I>(amounts: I) -> Result<Amount, AmountError>
where
    I: IntoIterator<Item = Amount>,
{
    amounts
        .into_iter()
        .try_fold(Amount::ZERO, |acc, a| acc + a)
}
