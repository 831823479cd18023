//! Transaction history record.

use serde::{Deserialize, Serialize};
use vesta_types::{Address, Timestamp, TxId};

use crate::BalanceChange;

/// One entry in a wallet's transaction history. Immutable once appended;
/// insertion order is the canonical history order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Id of the settling transaction. Both legs of one transfer share it.
    pub transaction_id: TxId,
    /// Counterparty address, tagged by kind.
    pub address: Address,
    /// Direction and magnitude of the balance effect.
    pub balance_change: BalanceChange,
    /// Block height at inclusion; `0` until confirmed.
    pub height: u64,
    /// Settlement time.
    pub time: Timestamp,
}
