//! In-memory storage backend.
//!
//! Backs tests and light-weight deployments. A single `RwLock` over the
//! whole map makes batch commit atomic with respect to readers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::kv::{KvStore, WriteBatch};
use crate::StoreError;

type Table = HashMap<(String, Vec<u8>), Vec<u8>>;

/// In-memory implementation of [`KvStore`]. Cheap to clone; clones share
/// the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    type Batch<'a> = MemoryWriteBatch<'a>;

    fn get(&self, keyspace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table.get(&(keyspace.to_string(), key.to_vec())).cloned())
    }

    fn write_batch(&self) -> Result<Self::Batch<'_>, StoreError> {
        Ok(MemoryWriteBatch {
            store: self,
            ops: Vec::new(),
        })
    }
}

enum Op {
    Put(String, Vec<u8>, Vec<u8>),
    Delete(String, Vec<u8>),
}

/// Staged writes against a [`MemoryStore`]. Dropping the batch without
/// committing discards every staged operation.
pub struct MemoryWriteBatch<'a> {
    store: &'a MemoryStore,
    ops: Vec<Op>,
}

impl WriteBatch for MemoryWriteBatch<'_> {
    fn get(&self, keyspace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        // Newest staged write wins over older ones and the committed state.
        for op in self.ops.iter().rev() {
            match op {
                Op::Put(ks, k, v) if ks == keyspace && k == key => return Ok(Some(v.clone())),
                Op::Delete(ks, k) if ks == keyspace && k == key => return Ok(None),
                _ => {}
            }
        }
        self.store.get(keyspace, key)
    }

    fn put(&mut self, keyspace: &str, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.ops
            .push(Op::Put(keyspace.to_string(), key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, keyspace: &str, key: &[u8]) -> Result<(), StoreError> {
        self.ops.push(Op::Delete(keyspace.to_string(), key.to_vec()));
        Ok(())
    }

    fn commit(self) -> Result<(), StoreError> {
        let mut table = self
            .store
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for op in self.ops {
            match op {
                Op::Put(ks, k, v) => {
                    table.insert((ks, k), v);
                }
                Op::Delete(ks, k) => {
                    table.remove(&(ks, k));
                }
            }
        }
        Ok(())
    }
}
