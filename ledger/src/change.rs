//! Incoming or outgoing balance change.

use serde::{Deserialize, Serialize};
use vesta_types::Amount;

use crate::LedgerError;

/// A signed balance delta, tagged by direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceChange {
    /// Balance addition.
    Incoming(Amount),
    /// Balance reduction.
    Outgoing(Amount),
}

impl BalanceChange {
    /// The unsigned magnitude of the change.
    pub fn amount(&self) -> Amount {
        match self {
            BalanceChange::Incoming(a) | BalanceChange::Outgoing(a) => *a,
        }
    }

    /// Apply this change to a balance.
    ///
    /// Fails with `InsufficientBalance` when an outgoing change exceeds the
    /// balance, so the caller can reject before staging any write.
    pub fn apply_to(&self, balance: Amount) -> Result<Amount, LedgerError> {
        match self {
            BalanceChange::Incoming(a) => balance
                .checked_add(*a)
                .ok_or(LedgerError::BalanceOverflow),
            BalanceChange::Outgoing(a) => {
                balance
                    .checked_sub(*a)
                    .ok_or(LedgerError::InsufficientBalance {
                        needed: a.raw(),
                        available: balance.raw(),
                    })
            }
        }
    }
}
