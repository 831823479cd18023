//! Timestamp type.
//!
//! Timestamps are Unix epoch seconds (UTC). The clock/height oracle that
//! feeds settlement supplies these; nothing in the core reads the system
//! clock except the default oracle implementation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Current system time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs`, saturating at the maximum.
    pub fn saturating_add_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Whether this timestamp has been reached at `now`.
    ///
    /// Used for maturity checks: `unbonded_from.is_reached(now)`.
    pub fn is_reached(&self, now: Timestamp) -> bool {
        now.0 >= self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maturity_boundary_is_inclusive() {
        let from = Timestamp::new(100);
        assert!(!from.is_reached(Timestamp::new(99)));
        assert!(from.is_reached(Timestamp::new(100)));
        assert!(from.is_reached(Timestamp::new(101)));
    }

    #[test]
    fn saturating_add_caps_at_max() {
        let t = Timestamp::new(u64::MAX - 1);
        assert_eq!(t.saturating_add_secs(10).as_secs(), u64::MAX);
    }
}
