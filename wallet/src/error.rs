use thiserror::Error;
use vesta_ledger::LedgerError;
use vesta_staking::StakingError;
use vesta_store::StoreError;

#[derive(Debug, Error)]
pub enum WalletError {
    /// Requested spend exceeds the spendable inputs. The message is part of
    /// the RPC contract and must stay exactly `Insufficient balance`.
    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("staking error: {0}")]
    Staking(StakingError),

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<LedgerError> for WalletError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientBalance { .. } => WalletError::InsufficientBalance,
            other => WalletError::Ledger(other),
        }
    }
}

impl From<StakingError> for WalletError {
    fn from(e: StakingError) -> Self {
        match e {
            StakingError::InvalidInput(msg) => WalletError::InvalidInput(msg),
            other => WalletError::Staking(other),
        }
    }
}
