//! Destination address types.
//!
//! A transfer can target either an ordinary transfer address (`vst_` prefix)
//! or a staking address (`0x` prefix, 20-byte hex). The two kinds live in
//! different namespaces and are never interchangeable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of an address, as distinguished by its prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// Ordinary transfer address (spendable outputs).
    Transfer,
    /// Staking address (bonded/unbonded state).
    Staking,
}

/// A destination address, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    Transfer(String),
    Staking(String),
}

/// Errors from address parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("unrecognized address {0:?}: expected vst_ or 0x prefix")]
    UnknownPrefix(String),

    #[error("malformed staking address {0:?}: expected 20-byte hex")]
    MalformedStaking(String),
}

impl Address {
    /// The prefix for transfer addresses.
    pub const TRANSFER_PREFIX: &'static str = "vst_";
    /// The prefix for staking addresses.
    pub const STAKING_PREFIX: &'static str = "0x";

    pub fn kind(&self) -> AddressKind {
        match self {
            Address::Transfer(_) => AddressKind::Transfer,
            Address::Staking(_) => AddressKind::Staking,
        }
    }

    /// The raw address string, prefix included.
    pub fn as_str(&self) -> &str {
        match self {
            Address::Transfer(s) | Address::Staking(s) => s,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > Self::TRANSFER_PREFIX.len() && s.starts_with(Self::TRANSFER_PREFIX) {
            return Ok(Address::Transfer(s.to_string()));
        }
        if let Some(body) = s.strip_prefix(Self::STAKING_PREFIX) {
            if body.len() == 40 && body.chars().all(|c| c.is_ascii_hexdigit()) {
                return Ok(Address::Staking(s.to_ascii_lowercase()));
            }
            return Err(AddressError::MalformedStaking(s.to_string()));
        }
        Err(AddressError::UnknownPrefix(s.to_string()))
    }
}
