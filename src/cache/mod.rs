//! Cache Module
//!
//! Cache items, the deferred-write item pool and its bookkeeping types.

mod deferred;
mod item;
mod key;
mod outcome;
mod pool;
mod stats;


// Re-export public types
pub use item::{CacheItem, PoolItem};
pub use key::validate_key;
pub use outcome::BatchOutcome;
pub use pool::CacheItemPool;
pub use stats::PoolStats;

// == Public Constants ==
/// Characters that may not appear in a cache key
pub const RESERVED_KEY_CHARACTERS: [char; 8] = ['{', '}', '(', ')', '/', '\\', '@', ':'];
