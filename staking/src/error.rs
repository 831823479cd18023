use thiserror::Error;
use vesta_store::StoreError;

#[derive(Debug, Error)]
pub enum StakingError {
    #[error("insufficient bonded amount: need {needed}, have {bonded}")]
    InsufficientBondedAmount { needed: u128, bonded: u128 },

    #[error("unbonded stake not matured: withdrawable from {unbonded_from}, now {now}")]
    NotMatured { unbonded_from: u64, now: u64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("amount overflow in staking state")]
    Overflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
