//! Key validation shared by every key-accepting pool operation.

use crate::cache::RESERVED_KEY_CHARACTERS;
use crate::error::{CacheError, Result};

/// Rejects keys containing any reserved character.
pub fn validate_key(key: &str) -> Result<()> {
    if key.contains(RESERVED_KEY_CHARACTERS) {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Validates every key before any of them is used.
pub(crate) fn validate_keys<K: AsRef<str>>(keys: &[K]) -> Result<()> {
    keys.iter().try_for_each(|key| validate_key(key.as_ref()))
}
