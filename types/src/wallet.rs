//! Wallet identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque wallet identifier.
///
/// The credential that authorizes operations on the wallet is checked by the
/// key-management layer; the ledger only keys state by this name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletId(String);

impl WalletId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WalletId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
