//! Repository Module
//!
//! The backing key-value store contract consumed by the item pool, plus an
//! in-memory implementation.

mod memory;

pub use memory::MemoryRepository;

use crate::error::Result;

// == Repository Trait ==
/// A key-value store with whole-minute TTLs and no pending-write batch.
///
/// Reads are infallible; a store that cannot answer should report the key as
/// absent. Writes may fail and the pool converts those failures into `false`.
pub trait Repository {
    /// Payload type stored under each key.
    type Value: Clone;

    /// True if a live value exists for `key`.
    fn has(&self, key: &str) -> bool;

    /// Fetches the value for `key`. The pool only calls this after `has`.
    fn get(&self, key: &str) -> Option<Self::Value>;

    /// Stores `value` for `minutes` minutes. `minutes` is always positive.
    fn put(&mut self, key: &str, value: Option<Self::Value>, minutes: u64) -> Result<()>;

    /// Stores `value` without expiry.
    fn forever(&mut self, key: &str, value: Option<Self::Value>) -> Result<()>;

    /// Removes `key`, returning whether the store reports success.
    fn forget(&mut self, key: &str) -> Result<bool>;

    /// Removes every key.
    fn flush(&mut self) -> Result<()>;
}

impl<R: Repository + ?Sized> Repository for &mut R {
    type Value = R::Value;

    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Option<Self::Value> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: Option<Self::Value>, minutes: u64) -> Result<()> {
        (**self).put(key, value, minutes)
    }

    fn forever(&mut self, key: &str, value: Option<Self::Value>) -> Result<()> {
        (**self).forever(key, value)
    }

    fn forget(&mut self, key: &str) -> Result<bool> {
        (**self).forget(key)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
