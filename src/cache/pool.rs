//! Cache Item Pool Module
//!
//! Coordinates reads, write-through saves and deferred saves against a
//! repository, translating absolute expiry into whole-minute TTLs.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, warn};

use crate::cache::deferred::DeferredBuffer;
use crate::cache::key::{validate_key, validate_keys};
use crate::cache::{BatchOutcome, CacheItem, PoolItem, PoolStats};
use crate::config::{ClearStrategy, Config};
use crate::error::Result;
use crate::repository::Repository;

// == Cache Item Pool ==
/// Item pool over a [`Repository`].
///
/// Items saved with [`save_deferred`](Self::save_deferred) are buffered locally
/// and shadow the repository until [`commit`](Self::commit). Dropping the pool,
/// or calling [`close`](Self::close), commits whatever is still buffered.
///
/// Repository failures never surface as errors: write operations report them
/// as `false`. Only invalid keys produce `Err`.
pub struct CacheItemPool<R: Repository> {
    repository: R,
    deferred: DeferredBuffer<R::Value>,
    stats: PoolStats,
    config: Config,
    closed: bool,
}

impl<R: Repository> CacheItemPool<R> {
    // == Constructors ==
    /// Creates a pool with the default configuration.
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, Config::default())
    }

    /// Creates a pool with an explicit configuration.
    pub fn with_config(repository: R, config: Config) -> Self {
        Self {
            repository,
            deferred: DeferredBuffer::new(),
            stats: PoolStats::new(),
            config,
            closed: false,
        }
    }

    // == Accessors ==
    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        self.stats.clone()
    }

    /// Buffered items in commit order.
    pub fn deferred_items(&self) -> Vec<&CacheItem<R::Value>> {
        self.deferred.items()
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    // == Get Item ==
    /// Returns the item for `key`. A miss is a valid item with `is_hit() == false`.
    ///
    /// Buffered items are returned as copies, so mutating the result never
    /// changes what `commit` will write.
    ///
    /// # Errors
    /// `CacheError::InvalidKey` if `key` contains a reserved character.
    pub fn get_item(&mut self, key: &str) -> Result<CacheItem<R::Value>> {
        validate_key(key)?;
        Ok(self.fetch(key))
    }

    // == Get Items ==
    /// Returns an item for every key, in input order. Keys are validated before
    /// any lookup and a repeated key yields one item at its first position.
    pub fn get_items<K: AsRef<str>>(&mut self, keys: &[K]) -> Result<Vec<CacheItem<R::Value>>> {
        validate_keys(keys)?;

        let mut seen = HashSet::with_capacity(keys.len());
        let mut items = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            if seen.insert(key) {
                items.push(self.fetch(key));
            }
        }
        Ok(items)
    }

    fn fetch(&mut self, key: &str) -> CacheItem<R::Value> {
        if let Some(item) = self.deferred.get(key) {
            let item = item.clone();
            self.stats.record_hit();
            return item;
        }

        if self.repository.has(key) {
            self.stats.record_hit();
            return CacheItem::with_value(key, self.repository.get(key), true);
        }

        self.stats.record_miss();
        CacheItem::new(key)
    }

    // == Has Item ==
    /// True if `key` is buffered and unexpired, or present in the repository.
    ///
    /// Expired buffered entries are reported absent but stay in the buffer.
    pub fn has_item(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        if let Some(item) = self.deferred.get(key) {
            return Ok(!item.is_expired());
        }
        Ok(self.repository.has(key))
    }

    // == Clear ==
    /// Empties the deferred buffer and flushes the repository.
    ///
    /// With [`ClearStrategy::DiscardFirst`] the buffer is emptied even when the
    /// flush fails; with [`ClearStrategy::FlushFirst`] it survives a failed flush.
    pub fn clear(&mut self) -> bool {
        if self.config.clear_strategy == ClearStrategy::DiscardFirst {
            self.deferred.clear();
        }

        match self.repository.flush() {
            Ok(()) => {
                self.deferred.clear();
                true
            }
            Err(e) => {
                warn!(error = %e, pending = self.deferred.len(), "Repository flush failed");
                false
            }
        }
    }

    // == Delete Item ==
    /// Removes `key` from the buffer and the repository.
    ///
    /// A key that is absent once unbuffered counts as deleted without
    /// contacting the repository's `forget`.
    pub fn delete_item(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.remove(key))
    }

    fn remove(&mut self, key: &str) -> bool {
        self.deferred.remove(key);

        if !self.repository.has(key) {
            return true;
        }

        match self.repository.forget(key) {
            Ok(forgotten) => forgotten,
            Err(e) => {
                warn!(key, error = %e, "Repository forget failed");
                false
            }
        }
    }

    // == Delete Items ==
    /// Deletes every key, returning true only if all deletions succeeded.
    ///
    /// All keys are validated first; an invalid key aborts before any deletion.
    pub fn delete_items<K: AsRef<str>>(&mut self, keys: &[K]) -> Result<bool> {
        Ok(self.delete_items_detailed(keys)?.is_success())
    }

    /// Like [`delete_items`](Self::delete_items), reporting each key's result.
    pub fn delete_items_detailed<K: AsRef<str>>(&mut self, keys: &[K]) -> Result<BatchOutcome> {
        validate_keys(keys)?;

        let mut outcome = BatchOutcome::new();
        for key in keys {
            let key = key.as_ref();
            let deleted = self.remove(key);
            outcome.record(key, deleted);
        }
        Ok(outcome)
    }

    // == Save ==
    /// Writes `item` through to the repository.
    ///
    /// Items without expiry are stored forever. Otherwise the remaining lifetime
    /// is floored to whole minutes; less than one minute left (or an expiry in
    /// the past) fails without contacting the repository.
    pub fn save<I: PoolItem<R::Value> + ?Sized>(&mut self, item: &I) -> bool {
        let saved = self.persist(item);
        self.stats.record_save(saved);
        saved
    }

    fn persist<I: PoolItem<R::Value> + ?Sized>(&mut self, item: &I) -> bool {
        let key = item.key();
        let value = item.value().cloned();

        let result = match item.expiration() {
            None => self.repository.forever(key, value),
            Some(expires_at) => match ttl_minutes(expires_at, Utc::now()) {
                Some(minutes) => self.repository.put(key, value, minutes),
                None => {
                    debug!(key, %expires_at, "Refusing save with less than one minute to live");
                    return false;
                }
            },
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Repository save failed");
                false
            }
        }
    }

    // == Save Deferred ==
    /// Buffers a copy of `item` until the next commit.
    ///
    /// Returns false, leaving the buffer untouched, if the item has already
    /// expired. A later deferred save for the same key replaces this one.
    /// The buffered copy is always a hit `CacheItem`, whatever `I` is.
    pub fn save_deferred<I: PoolItem<R::Value> + ?Sized>(&mut self, item: &I) -> bool {
        let now = Utc::now().fixed_offset();
        if item.expiration().is_some_and(|expires| expires < now) {
            debug!(key = item.key(), "Refusing deferred save of expired item");
            return false;
        }

        let mut buffered = CacheItem::with_value(item.key(), item.value().cloned(), true);
        buffered.expires_at(item.expiration());
        self.deferred.insert(buffered);
        true
    }

    // == Commit ==
    /// Saves every buffered item and empties the buffer.
    ///
    /// Every item is attempted; the result is true only if all saves succeeded.
    pub fn commit(&mut self) -> bool {
        self.commit_detailed().is_success()
    }

    /// Like [`commit`](Self::commit), reporting each key's result.
    pub fn commit_detailed(&mut self) -> BatchOutcome {
        let mut outcome = BatchOutcome::new();
        for item in self.deferred.drain() {
            let saved = self.save(&item);
            outcome.record(item.key(), saved);
        }
        self.stats.record_commit();

        if !outcome.is_empty() {
            debug!(
                items = outcome.len(),
                failed = outcome.failed_keys().len(),
                "Committed deferred items"
            );
        }
        outcome
    }

    // == Close ==
    /// Commits buffered items and releases the pool.
    pub fn close(mut self) -> bool {
        self.closed = true;
        self.commit()
    }
}

impl<R> fmt::Debug for CacheItemPool<R>
where
    R: Repository + fmt::Debug,
    R::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheItemPool")
            .field("repository", &self.repository)
            .field("deferred", &self.deferred)
            .field("stats", &self.stats)
            .field("config", &self.config)
            .finish()
    }
}

impl<R: Repository> Drop for CacheItemPool<R> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let pending = self.deferred.len();
        if !self.commit() {
            warn!(pending, "Commit on pool teardown failed");
        }
    }
}

// == TTL Translation ==
/// Whole minutes from `now` until `expires_at`, or `None` if under one minute.
///
/// Both instants are truncated to whole seconds, with `now` taken in the
/// expiry's own offset.
fn ttl_minutes(expires_at: DateTime<FixedOffset>, now: DateTime<Utc>) -> Option<u64> {
    let now = now.with_timezone(expires_at.offset());
    let seconds = expires_at.timestamp() - now.timestamp();
    let minutes = seconds.div_euclid(60);

    u64::try_from(minutes).ok().filter(|minutes| *minutes > 0)
}
