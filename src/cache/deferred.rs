//! Deferred Buffer Module
//!
//! Holds items saved with `save_deferred` until the pool commits them.

use std::collections::HashMap;

use crate::cache::CacheItem;

// == Deferred Buffer ==
/// Keyed buffer of pending items.
///
/// Each key remembers the sequence number of its first insertion, so replacing
/// an entry keeps its commit position and draining yields first-insertion order.
#[derive(Debug)]
pub(crate) struct DeferredBuffer<V> {
    entries: HashMap<String, (u64, CacheItem<V>)>,
    next_seq: u64,
}

impl<V> Default for DeferredBuffer<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<V> DeferredBuffer<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers `item`, replacing any prior entry for the same key.
    pub fn insert(&mut self, item: CacheItem<V>) {
        if let Some((_, slot)) = self.entries.get_mut(item.key()) {
            *slot = item;
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(item.key().to_string(), (seq, item));
    }

    pub fn get(&self, key: &str) -> Option<&CacheItem<V>> {
        self.entries.get(key).map(|(_, item)| item)
    }

    pub fn remove(&mut self, key: &str) -> Option<CacheItem<V>> {
        self.entries.remove(key).map(|(_, item)| item)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Buffered items in commit order.
    pub fn items(&self) -> Vec<&CacheItem<V>> {
        let mut ordered: Vec<_> = self.entries.values().collect();
        ordered.sort_by_key(|(seq, _)| *seq);
        ordered.into_iter().map(|(_, item)| item).collect()
    }

    /// Empties the buffer, returning its items in commit order.
    pub fn drain(&mut self) -> Vec<CacheItem<V>> {
        let mut ordered: Vec<_> = self.entries.drain().map(|(_, entry)| entry).collect();
        ordered.sort_by_key(|(seq, _)| *seq);
        ordered.into_iter().map(|(_, item)| item).collect()
    }
}
