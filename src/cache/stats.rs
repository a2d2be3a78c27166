//! Pool Statistics Module
//!
//! Tracks lookups, saves and commits performed through a pool.

use serde::Serialize;

// == Pool Stats ==
/// Counters for a single pool instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Lookups answered from the deferred buffer or the repository
    pub hits: u64,
    /// Lookups that produced a miss item
    pub misses: u64,
    /// Items written through to the repository
    pub saves: u64,
    /// Saves refused by TTL arithmetic or failed in the repository
    pub failed_saves: u64,
    /// Completed commits, including the teardown commit
    pub commits: u64,
}

impl PoolStats {
    // == Constructor ==
    /// Creates a new PoolStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_save(&mut self, success: bool) {
        if success {
            self.saves += 1;
        } else {
            self.failed_saves += 1;
        }
    }

    pub(crate) fn record_commit(&mut self) {
        self.commits += 1;
    }
}
