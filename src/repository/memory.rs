//! In-Memory Repository Module
//!
//! HashMap-backed repository with whole-minute TTL expiration.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::repository::Repository;

// == Stored Entry ==
#[derive(Debug, Clone)]
struct StoredEntry<V> {
    value: Option<V>,
    /// None = stored forever
    expires_at: Option<DateTime<Utc>>,
}

impl<V> StoredEntry<V> {
    /// Expired once the current time reaches the expiration time.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Utc::now() >= expires,
            None => false,
        }
    }
}

// == Memory Repository ==
/// In-process repository honoring minute TTLs.
///
/// Expired entries are invisible to reads and removed by `cleanup_expired`.
#[derive(Debug)]
pub struct MemoryRepository<V> {
    entries: HashMap<String, StoredEntry<V>>,
}

impl<V> Default for MemoryRepository<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> MemoryRepository<V> {
    // == Constructor ==
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    // == Time To Live ==
    /// Remaining lifetime of a live entry in whole seconds, `None` if the key is
    /// absent or stored forever.
    pub fn ttl_remaining(&self, key: &str) -> Option<i64> {
        self.live(key)
            .and_then(|entry| entry.expires_at)
            .map(|expires| (expires - Utc::now()).num_seconds().max(0))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "Removed expired repository entries");
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet cleaned up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn live(&self, key: &str) -> Option<&StoredEntry<V>> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }
}

impl<V: Clone> Repository for MemoryRepository<V> {
    type Value = V;

    fn has(&self, key: &str) -> bool {
        self.live(key).is_some()
    }

    fn get(&self, key: &str) -> Option<V> {
        self.live(key).and_then(|entry| entry.value.clone())
    }

    fn put(&mut self, key: &str, value: Option<V>, minutes: u64) -> Result<()> {
        let ttl = i64::try_from(minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| CacheError::Repository(format!("ttl of {} minutes is out of range", minutes)))?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| CacheError::Repository(format!("ttl of {} minutes is out of range", minutes)))?;

        self.entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    fn forever(&mut self, key: &str, value: Option<V>) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at: None,
            },
        );
        Ok(())
    }

    fn forget(&mut self, key: &str) -> Result<bool> {
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|entry| !entry.is_expired()))
    }

    fn flush(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}
