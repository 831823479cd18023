//! Unspent-output index.
//!
//! Tracks the spendable outputs each wallet owns. Settlement credits add
//! outputs, spends consume them, deposits consume explicitly referenced
//! outputs. The sum of a wallet's outputs always equals its ledger balance.

use serde::{Deserialize, Serialize};
use vesta_store::{KvStore, WriteBatch};
use vesta_types::{Amount, TxId, WalletId};

use crate::WalletError;

const UNSPENT_KEYSPACE: &str = "unspent";

/// One spendable output: the transaction that created it, the output slot
/// within that transaction, and its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub id: TxId,
    pub index: u32,
    pub value: Amount,
}

/// Store-backed index of unspent outputs per wallet.
#[derive(Clone)]
pub struct UnspentIndex<S: KvStore> {
    store: S,
}

impl<S: KvStore> UnspentIndex<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Committed outputs of a wallet, in insertion order.
    pub fn outputs(&self, wallet: &WalletId) -> Result<Vec<UnspentOutput>, WalletError> {
        match self.store.get(UNSPENT_KEYSPACE, wallet.as_str().as_bytes())? {
            None => Ok(Vec::new()),
            Some(bytes) => decode(&bytes),
        }
    }

    /// Add one output, staged into `batch`.
    pub fn add(
        &self,
        batch: &mut S::Batch<'_>,
        wallet: &WalletId,
        output: UnspentOutput,
    ) -> Result<(), WalletError> {
        let mut outputs = self.load(batch, wallet)?;
        outputs.push(output);
        self.save(batch, wallet, &outputs)
    }

    /// Consume every output the wallet owns, staged into `batch`.
    pub fn take_all(
        &self,
        batch: &mut S::Batch<'_>,
        wallet: &WalletId,
    ) -> Result<Vec<UnspentOutput>, WalletError> {
        let outputs = self.load(batch, wallet)?;
        if !outputs.is_empty() {
            self.save(batch, wallet, &[])?;
        }
        Ok(outputs)
    }

    /// Consume exactly the referenced outputs, staged into `batch`.
    ///
    /// Fails with `InvalidInput` when a reference does not match an unspent
    /// output (unknown, or already spent); nothing is consumed in that case.
    pub fn take_refs(
        &self,
        batch: &mut S::Batch<'_>,
        wallet: &WalletId,
        refs: &[(TxId, u32)],
    ) -> Result<Vec<UnspentOutput>, WalletError> {
        let mut remaining = self.load(batch, wallet)?;
        let mut taken = Vec::with_capacity(refs.len());
        for (id, index) in refs {
            let pos = remaining
                .iter()
                .position(|o| o.id == *id && o.index == *index)
                .ok_or_else(|| {
                    WalletError::InvalidInput(format!(
                        "output {id}:{index} does not exist or is already spent"
                    ))
                })?;
            taken.push(remaining.remove(pos));
        }
        self.save(batch, wallet, &remaining)?;
        Ok(taken)
    }

    fn load(
        &self,
        batch: &S::Batch<'_>,
        wallet: &WalletId,
    ) -> Result<Vec<UnspentOutput>, WalletError> {
        match batch.get(UNSPENT_KEYSPACE, wallet.as_str().as_bytes())? {
            None => Ok(Vec::new()),
            Some(bytes) => decode(&bytes),
        }
    }

    fn save(
        &self,
        batch: &mut S::Batch<'_>,
        wallet: &WalletId,
        outputs: &[UnspentOutput],
    ) -> Result<(), WalletError> {
        let bytes = bincode::serialize(outputs)
            .map_err(|e| WalletError::Serialization(e.to_string()))?;
        batch.put(UNSPENT_KEYSPACE, wallet.as_str().as_bytes(), &bytes)?;
        Ok(())
    }
}

fn decode(bytes: &[u8]) -> Result<Vec<UnspentOutput>, WalletError> {
    bincode::deserialize(bytes).map_err(|e| WalletError::Serialization(e.to_string()))
}
