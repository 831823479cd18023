use thiserror::Error;
use vesta_store::StoreError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Insufficient balance")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("balance overflow")]
    BalanceOverflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
