//! Cache Bridge - a deferred-write cache item pool
//!
//! Exposes a get/has/delete/save/save-deferred/commit item pool over any
//! key-value repository that only understands whole-minute TTLs.

pub mod cache;
pub mod config;
pub mod error;
pub mod repository;

pub use cache::{BatchOutcome, CacheItem, CacheItemPool, PoolItem, PoolStats};
pub use config::{ClearStrategy, Config};
pub use error::{CacheError, Result};
pub use repository::{MemoryRepository, Repository};
