//! A hash-based one-to-many map, used as the building block of index tables.
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::options::DEFAULT_CAPACITY;

/// A map from keys to *sets* of values.
///
/// A key can be registered with no value (see [`add_empty`](HashMultimap::add_empty));
/// such a key is distinct from an unknown key, which [`contains_key`](HashMultimap::contains_key) reports.
/// Removing the last value of a key keeps the key registered.
#[derive(Clone, Debug)]
pub struct HashMultimap<K, V> {
    map: HashMap<K, HashSet<V>>,
    value_capacity: usize,
    len: usize,
}

impl<K, V> Default for HashMultimap<K, V> {
    fn default() -> Self {
        HashMultimap {
            map: HashMap::new(),
            value_capacity: DEFAULT_CAPACITY,
            len: 0,
        }
    }
}

impl<K, V> HashMultimap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an empty multimap,
    /// where the value set of each new key is allocated with room for `value_capacity` values.
    pub fn with_value_capacity(value_capacity: usize) -> Self {
        HashMultimap {
            map: HashMap::new(),
            value_capacity,
            len: 0,
        }
    }

    /// The initial capacity of the value set of each new key.
    pub fn value_capacity(&self) -> usize {
        self.value_capacity
    }

    /// Associate `v` to `k`.
    ///
    /// Return `false` (and leave the multimap unchanged) if this pair was already present.
    pub fn add(&mut self, k: K, v: V) -> bool {
        let capacity = self.value_capacity;
        let added = self
            .map
            .entry(k)
            .or_insert_with(|| HashSet::with_capacity(capacity))
            .insert(v);
        if added {
            self.len += 1;
        }
        added
    }

    /// Register `k` with no value, if it is not registered yet.
    ///
    /// Return `true` iff `k` was not registered before.
    pub fn add_empty(&mut self, k: K) -> bool {
        if self.map.contains_key(&k) {
            return false;
        }
        self.map.insert(k, HashSet::with_capacity(self.value_capacity));
        true
    }

    /// Remove the association of `v` to `k`.
    ///
    /// Return `false` if there was no such association.
    pub fn remove(&mut self, k: &K, v: &V) -> bool {
        let removed = self.map.get_mut(k).map_or(false, |values| values.remove(v));
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Unregister `k` along with all its values.
    ///
    /// Return `true` iff `k` was registered.
    pub fn remove_key(&mut self, k: &K) -> bool {
        match self.map.remove(k) {
            Some(values) => {
                self.len -= values.len();
                true
            }
            None => false,
        }
    }

    /// Whether `k` is registered (possibly with no value).
    pub fn contains_key(&self, k: &K) -> bool {
        self.map.contains_key(k)
    }

    pub fn contains(&self, k: &K, v: &V) -> bool {
        self.map.get(k).map_or(false, |values| values.contains(v))
    }

    /// The stored value equal to `v` under `k`, if any.
    pub fn get(&self, k: &K, v: &V) -> Option<&V> {
        self.map.get(k).and_then(|values| values.get(v))
    }

    /// Iterate over the values of `k`; empty if `k` is unknown.
    pub fn get_values(&self, k: &K) -> impl Iterator<Item = &V> + '_ {
        self.map.get(k).into_iter().flatten()
    }

    /// The number of values of `k`.
    pub fn value_count(&self, k: &K) -> usize {
        self.map.get(k).map_or(0, HashSet::len)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values().flatten()
    }

    /// The number of (key, value) pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of registered keys, including keys with no value.
    pub fn key_count(&self) -> usize {
        self.map.len()
    }

    /// Remove all keys and values, releasing their storage.
    pub fn clear(&mut self) {
        self.map = HashMap::new();
        self.len = 0;
    }
}
