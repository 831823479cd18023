//! Clock / height oracle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use vesta_types::Timestamp;

/// Supplies the current time and chain height to settlement.
///
/// The height feeds the `height` field of new transaction records; a node
/// that has not yet observed inclusion reports `0` (the pending sentinel).
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    fn height(&self) -> u64;
}

/// System wall clock. Height stays at the pending sentinel; the sync layer
/// owns confirmation heights.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn height(&self) -> u64 {
        0
    }
}

/// Manually driven clock for tests: time and height only move when told to.
#[derive(Clone, Default)]
pub struct ManualClock {
    secs: Arc<AtomicU64>,
    height: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(secs: u64, height: u64) -> Self {
        Self {
            secs: Arc::new(AtomicU64::new(secs)),
            height: Arc::new(AtomicU64::new(height)),
        }
    }

    pub fn advance_secs(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set_height(&self, height: u64) {
        self.height.store(height, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.load(Ordering::SeqCst))
    }

    fn height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }
}
