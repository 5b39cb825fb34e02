//! Per-search memo of part matches.
//!
//! A descendant chain visits the same node once for every ancestor that
//! matched the previous part, so the same (node, part) question gets asked
//! repeatedly. The tree is immutable for the duration of a search, which
//! makes the answers safe to reuse.

use std::collections::HashMap;

/// Memoized match results keyed by node key and part index.
#[derive(Default)]
pub struct MatchCache {
    /// Per-node per-part memoized match results.
    store: HashMap<(u64, usize), bool>,
}

impl MatchCache {
    /// Cache a result.
    #[inline]
    pub fn set(&mut self, node_key: u64, part_index: usize, matched: bool) {
        self.store.insert((node_key, part_index), matched);
    }

    /// Get a cached result.
    #[inline]
    pub fn get(&self, node_key: u64, part_index: usize) -> Option<bool> {
        self.store.get(&(node_key, part_index)).copied()
    }

    /// Number of cached answers.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop every cached answer.
    #[inline]
    pub fn clear(&mut self) {
        self.store.clear();
    }
}
