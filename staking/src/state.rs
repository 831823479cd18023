//! Per-address staking state.

use serde::{Deserialize, Serialize};
use vesta_types::{Address, Amount, Timestamp};

/// The staking state of one staking address.
///
/// Invariants: `bonded` and `unbonded` never go negative; `nonce` strictly
/// increases across successful mutations; `unbonded` is withdrawable only
/// once `unbonded_from` has been reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingState {
    /// The staking address this state belongs to.
    pub address: Address,
    /// Stake currently locked.
    pub bonded: Amount,
    /// Stake released from bonding but not yet withdrawn.
    pub unbonded: Amount,
    /// Earliest time the unbonded amount may be withdrawn.
    pub unbonded_from: Timestamp,
    /// Counter incremented by every state-mutating operation.
    pub nonce: u64,
}

impl StakingState {
    /// The zero-value state an unseen address reads as.
    pub fn default_for(address: Address) -> Self {
        Self {
            address,
            bonded: Amount::ZERO,
            unbonded: Amount::ZERO,
            unbonded_from: Timestamp::EPOCH,
            nonce: 0,
        }
    }
}
