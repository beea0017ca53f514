//! The index engines, each implementing [`TripleIndex`](ternary_api::index::TripleIndex) with a different strategy.
//!
//! * [`HashIndex`] maintains all its index tables eagerly;
//! * [`LazyIndex`] builds the entry of a key the first time this key is queried;
//! * [`SortedIndex`] answers queries by binary search in sorted arrays of triples;
//! * [`TrieIndex`] stores triples in tries keyed by pairs of nodes;
//! * [`SyncIndex`] wraps any of the above to share it between threads.
//!
//! All engines keep a primary store, keyed by the hash of each triple,
//! which is the reference content of the index.
use ternary_api::index::TripleNotFound;
use ternary_api::triple::Triple;

use crate::multimap::HashMultimap;

mod _hash;
pub use _hash::*;
mod _lazy;
pub use _lazy::*;
mod _sorted;
pub use _sorted::*;
mod _sync;
pub use _sync::*;
mod _trie;
pub use _trie::*;

/// The primary store of an engine: a deduplicated set of triples keyed by their hash.
#[derive(Clone, Debug, Default)]
pub(crate) struct TripleStore {
    // distinct triples rarely share a hash, hence a unit value capacity
    triples: HashMultimap<u64, Triple>,
}

impl TripleStore {
    pub fn new() -> Self {
        TripleStore {
            triples: HashMultimap::with_value_capacity(1),
        }
    }

    /// Return `false` if `t` was already present.
    pub fn insert(&mut self, t: &Triple) -> bool {
        self.triples.add(t.hash_code(), t.clone())
    }

    /// Return `false` if `t` was not present.
    pub fn remove(&mut self, t: &Triple) -> bool {
        remove_and_prune(&mut self.triples, &t.hash_code(), t)
    }

    pub fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound> {
        self.triples
            .get(&t.hash_code(), t)
            .cloned()
            .ok_or_else(|| TripleNotFound(t.clone()))
    }

    pub fn contains(&self, t: &Triple) -> bool {
        self.triples.contains(&t.hash_code(), t)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> + '_ {
        self.triples.values()
    }

    pub fn clear(&mut self) {
        self.triples.clear()
    }
}

/// Remove `v` from the values of `k`, unregistering `k` if it has no value left.
pub(crate) fn remove_and_prune<K, V>(map: &mut HashMultimap<K, V>, k: &K, v: &V) -> bool
where
    K: Eq + std::hash::Hash,
    V: Eq + std::hash::Hash,
{
    let removed = map.remove(k, v);
    if removed && map.value_count(k) == 0 {
        map.remove_key(k);
    }
    removed
}
