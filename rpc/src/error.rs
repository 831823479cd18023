//! RPC error types.

use thiserror::Error;
use vesta_wallet::WalletError;

#[derive(Debug, Error)]
pub enum RpcError {
    /// Wire-visible message; clients match on it verbatim.
    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("wallet error: {0}")]
    Wallet(String),

    #[error("store error: {0}")]
    Store(String),
}

impl From<WalletError> for RpcError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::InsufficientBalance => RpcError::InsufficientBalance,
            WalletError::InvalidInput(msg) => RpcError::InvalidRequest(msg),
            WalletError::NotFound(what) => RpcError::NotFound(what),
            WalletError::Store(e) => RpcError::Store(e.to_string()),
            other => RpcError::Wallet(other.to_string()),
        }
    }
}
