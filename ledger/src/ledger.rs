//! Store-backed balance and history service.

use vesta_store::{KvStore, WriteBatch};
use vesta_types::{Address, Amount, Timestamp, TxId, WalletId};

use crate::{BalanceChange, LedgerError, TransactionRecord};

const BALANCE_KEYSPACE: &str = "balance";
const HISTORY_KEYSPACE: &str = "history";

/// Per-wallet balances plus append-only transaction history.
///
/// Reads hit the committed store state; mutation stages into a caller-owned
/// write batch so one settlement commits as a single atomic unit.
#[derive(Clone)]
pub struct BalanceLedger<S: KvStore> {
    store: S,
}

impl<S: KvStore> BalanceLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current balance; zero for an unseen wallet.
    pub fn get_balance(&self, wallet: &WalletId) -> Result<Amount, LedgerError> {
        match self.store.get(BALANCE_KEYSPACE, wallet.as_str().as_bytes())? {
            None => Ok(Amount::ZERO),
            Some(bytes) => decode_balance(&bytes),
        }
    }

    /// Full history in append order; empty for an unseen wallet.
    pub fn list_transactions(
        &self,
        wallet: &WalletId,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        match self.store.get(HISTORY_KEYSPACE, wallet.as_str().as_bytes())? {
            None => Ok(Vec::new()),
            Some(bytes) => decode_history(&bytes),
        }
    }

    /// Apply one balance change: mutate the balance and append exactly one
    /// history record, staged into `batch`.
    ///
    /// The new balance is computed and checked before anything is staged,
    /// so a rejected change has no effect at all. Reads go through the
    /// batch, so earlier applies in the same settlement are visible.
    pub fn apply(
        &self,
        batch: &mut S::Batch<'_>,
        wallet: &WalletId,
        change: BalanceChange,
        counterparty: &Address,
        height: u64,
        time: Timestamp,
        transaction_id: TxId,
    ) -> Result<TransactionRecord, LedgerError> {
        let key = wallet.as_str().as_bytes();

        let current = match batch.get(BALANCE_KEYSPACE, key)? {
            None => Amount::ZERO,
            Some(bytes) => decode_balance(&bytes)?,
        };
        let new_balance = change.apply_to(current)?;

        let mut history = match batch.get(HISTORY_KEYSPACE, key)? {
            None => Vec::new(),
            Some(bytes) => decode_history(&bytes)?,
        };
        let record = TransactionRecord {
            transaction_id,
            address: counterparty.clone(),
            balance_change: change,
            height,
            time,
        };
        history.push(record.clone());

        batch.put(BALANCE_KEYSPACE, key, &encode_balance(new_balance))?;
        batch.put(
            HISTORY_KEYSPACE,
            key,
            &bincode::serialize(&history).map_err(|e| LedgerError::Serialization(e.to_string()))?,
        )?;

        tracing::debug!(
            wallet = %wallet,
            change = ?change,
            balance = %new_balance,
            "applied balance change"
        );
        Ok(record)
    }
}

fn encode_balance(balance: Amount) -> [u8; 16] {
    balance.raw().to_le_bytes()
}

fn decode_balance(bytes: &[u8]) -> Result<Amount, LedgerError> {
    let raw: [u8; 16] = bytes
        .try_into()
        .map_err(|_| LedgerError::Serialization("balance is not 16 bytes".into()))?;
    Ok(Amount::new(u128::from_le_bytes(raw)))
}

fn decode_history(bytes: &[u8]) -> Result<Vec<TransactionRecord>, LedgerError> {
    bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
}
