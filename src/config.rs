//! Configuration Module
//!
//! Handles loading pool configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;

/// Order in which [`clear`](crate::cache::CacheItemPool::clear) discards the
/// deferred buffer and flushes the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearStrategy {
    /// Empty the buffer, then flush. A failed flush still loses deferred writes.
    #[default]
    DiscardFirst,
    /// Flush, then empty the buffer only if the flush succeeded.
    FlushFirst,
}

impl FromStr for ClearStrategy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard-first" | "discard_first" => Ok(Self::DiscardFirst),
            "flush-first" | "flush_first" => Ok(Self::FlushFirst),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown clear strategy {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for ClearStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscardFirst => f.write_str("discard-first"),
            Self::FlushFirst => f.write_str("flush-first"),
        }
    }
}

/// Pool configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Ordering used by `clear`
    pub clear_strategy: ClearStrategy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_POOL_CLEAR_STRATEGY` - `discard-first` or `flush-first` (default: discard-first)
    pub fn from_env() -> Self {
        Self {
            clear_strategy: env::var("CACHE_POOL_CLEAR_STRATEGY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Returns a copy with the given clear strategy.
    pub fn with_clear_strategy(mut self, clear_strategy: ClearStrategy) -> Self {
        self.clear_strategy = clear_strategy;
        self
    }
}
