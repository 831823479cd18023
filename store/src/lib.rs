//! Abstract storage traits for the Vesta subsystem.
//!
//! The durable backend (LMDB, RocksDB, ...) implements these traits; the
//! rest of the workspace depends only on them. An in-memory backend is
//! provided for tests and light-weight deployments.
//!
//! The unit of atomicity is the [`WriteBatch`]: every multi-step settlement
//! stages its writes into one batch and commits it in a single step, so
//! concurrent readers never observe a half-applied settlement.

pub mod error;
pub mod kv;
pub mod memory;

pub use error::StoreError;
pub use kv::{KvStore, WriteBatch};
pub use memory::MemoryStore;
