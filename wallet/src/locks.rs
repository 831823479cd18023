//! Per-key mutual exclusion.
//!
//! Settlements targeting the same wallet or staking address must not
//! interleave; settlements on disjoint keys may run in parallel. Multi-key
//! acquisition always locks in sorted key order so two settlements sharing
//! keys cannot deadlock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A table of named mutexes, created lazily per key.
#[derive(Default)]
pub struct KeyedMutex {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedMutex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the locks for every key in `keys`.
    ///
    /// Keys are deduplicated and locked in sorted order.
    pub fn with_locked<R>(&self, keys: &[&str], f: impl FnOnce() -> R) -> R {
        let mut sorted: Vec<&str> = keys.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let handles: Vec<Arc<Mutex<()>>> = {
            let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            sorted
                .iter()
                .map(|key| Arc::clone(table.entry(key.to_string()).or_default()))
                .collect()
        };
        let guards: Vec<_> = handles
            .iter()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();
        let result = f();
        drop(guards);
        drop(handles);

        // Evict entries nobody holds anymore. Clones are only taken while
        // the table lock is held, so a strong count of one here means the
        // table holds the last reference and the entry can go.
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        for key in sorted {
            if table.get(key).is_some_and(|m| Arc::strong_count(m) == 1) {
                table.remove(key);
            }
        }
        result
    }
}
