//! Key-value storage traits.
//!
//! Values live in named keyspaces (one logical table per concern: balances,
//! history, staking state, unspent outputs, ...). Writes go through a
//! [`WriteBatch`] that commits atomically across keyspaces.

use crate::StoreError;

/// A key-value store with atomic multi-key commit.
pub trait KvStore: Send + Sync {
    type Batch<'a>: WriteBatch
    where
        Self: 'a;

    /// Read a value from the committed state. `None` if absent.
    fn get(&self, keyspace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Begin a write batch. Nothing is visible to readers until
    /// [`WriteBatch::commit`] is called; a dropped batch is discarded.
    fn write_batch(&self) -> Result<Self::Batch<'_>, StoreError>;
}

/// A set of staged writes that commit atomically.
///
/// `get` reads through the staged writes first, so later steps of one
/// settlement observe the effects of earlier steps before commit.
pub trait WriteBatch {
    fn get(&self, keyspace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&mut self, keyspace: &str, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    fn delete(&mut self, keyspace: &str, key: &[u8]) -> Result<(), StoreError>;

    /// Apply every staged write in one atomic step.
    fn commit(self) -> Result<(), StoreError>;
}
