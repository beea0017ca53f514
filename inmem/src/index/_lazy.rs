// this module is transparently re-exported by its parent `index`
use log::trace;
use parking_lot::RwLock;
use std::hash::Hash;
use ternary_api::index::{TripleIndex, TripleIter, TripleNotFound};
use ternary_api::node::Node;
use ternary_api::triple::{pair_hash, Triple};

use super::TripleStore;
use crate::multimap::HashMultimap;
use crate::options::IndexOptions;

/// An index building its tables on demand.
///
/// The first query on a given key scans the primary store once,
/// and caches the matching triples for *that key only*.
/// Later insertions extend the entries of cached keys,
/// and deletions remove triples from them.
///
/// Caches sit behind a [`RwLock`], so that queries only need `&self`;
/// the returned sequences are snapshots of the cached entry.
#[derive(Debug)]
pub struct LazyIndex {
    options: IndexOptions,
    store: TripleStore,
    cache: RwLock<LazyCache>,
}

#[derive(Clone, Debug)]
struct LazyCache {
    s: HashMultimap<Node, Triple>,
    p: HashMultimap<Node, Triple>,
    o: HashMultimap<Node, Triple>,
    sp: HashMultimap<u64, Triple>,
    po: HashMultimap<u64, Triple>,
    so: HashMultimap<u64, Triple>,
}

impl LazyCache {
    fn new(capacity: usize) -> Self {
        LazyCache {
            s: HashMultimap::with_value_capacity(capacity),
            p: HashMultimap::with_value_capacity(capacity),
            o: HashMultimap::with_value_capacity(capacity),
            sp: HashMultimap::with_value_capacity(capacity),
            po: HashMultimap::with_value_capacity(capacity),
            so: HashMultimap::with_value_capacity(capacity),
        }
    }
}

/// Shared and exclusive accessors to one table of a [`LazyCache`].
struct Table<K> {
    get: fn(&LazyCache) -> &HashMultimap<K, Triple>,
    get_mut: fn(&mut LazyCache) -> &mut HashMultimap<K, Triple>,
}

const SUBJECTS: Table<Node> = Table {
    get: |c| &c.s,
    get_mut: |c| &mut c.s,
};
const PREDICATES: Table<Node> = Table {
    get: |c| &c.p,
    get_mut: |c| &mut c.p,
};
const OBJECTS: Table<Node> = Table {
    get: |c| &c.o,
    get_mut: |c| &mut c.o,
};
const SUBJECT_PREDICATES: Table<u64> = Table {
    get: |c| &c.sp,
    get_mut: |c| &mut c.sp,
};
const PREDICATE_OBJECTS: Table<u64> = Table {
    get: |c| &c.po,
    get_mut: |c| &mut c.po,
};
const SUBJECT_OBJECTS: Table<u64> = Table {
    get: |c| &c.so,
    get_mut: |c| &mut c.so,
};

/// The number of keys cached by each table of a [`LazyIndex`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub subjects: usize,
    pub predicates: usize,
    pub objects: usize,
    pub subject_predicates: usize,
    pub predicate_objects: usize,
    pub subject_objects: usize,
}

impl LazyIndex {
    pub fn new() -> Self {
        Self::with_options(IndexOptions::default())
    }

    pub fn with_options(options: IndexOptions) -> Self {
        LazyIndex {
            options,
            store: TripleStore::new(),
            cache: RwLock::new(LazyCache::new(options.capacity())),
        }
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// How many keys are currently cached.
    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.read();
        CacheStats {
            subjects: cache.s.key_count(),
            predicates: cache.p.key_count(),
            objects: cache.o.key_count(),
            subject_predicates: cache.sp.key_count(),
            predicate_objects: cache.po.key_count(),
            subject_objects: cache.so.key_count(),
        }
    }

    /// Return the cached entry of `key` in the table selected by `table`,
    /// scanning the store for triples satisfying `belongs` if `key` was not cached yet.
    fn lookup<K, F>(&self, table: Table<K>, key: K, belongs: F) -> Vec<Triple>
    where
        K: Eq + Hash + Clone + std::fmt::Debug,
        F: Fn(&Triple) -> bool,
    {
        {
            let cache = self.cache.read();
            let entries = (table.get)(&*cache);
            if entries.contains_key(&key) {
                return entries.get_values(&key).cloned().collect();
            }
        }
        let mut cache = self.cache.write();
        let entries = (table.get_mut)(&mut *cache);
        // another thread may have filled the entry in the meantime
        if entries.add_empty(key.clone()) {
            trace!("LazyIndex: caching entry for {:?}", key);
            for t in self.store.iter().filter(|t| belongs(t)) {
                entries.add(key.clone(), t.clone());
            }
        }
        entries.get_values(&key).cloned().collect()
    }
}

impl Default for LazyIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LazyIndex {
    fn clone(&self) -> Self {
        LazyIndex {
            options: self.options,
            store: self.store.clone(),
            cache: RwLock::new(self.cache.read().clone()),
        }
    }
}

fn extend_if_cached<K: Eq + Hash>(table: &mut HashMultimap<K, Triple>, key: K, t: &Triple) {
    if table.contains_key(&key) {
        table.add(key, t.clone());
    }
}

impl TripleIndex for LazyIndex {
    fn add(&mut self, t: Triple) -> bool {
        if !self.store.insert(&t) {
            return false;
        }
        let cache = self.cache.get_mut();
        extend_if_cached(&mut cache.s, t.s().clone(), &t);
        extend_if_cached(&mut cache.p, t.p().clone(), &t);
        extend_if_cached(&mut cache.o, t.o().clone(), &t);
        if self.options.full_indexing() {
            extend_if_cached(&mut cache.sp, pair_hash(t.s(), t.p()), &t);
            extend_if_cached(&mut cache.po, pair_hash(t.p(), t.o()), &t);
            extend_if_cached(&mut cache.so, pair_hash(t.s(), t.o()), &t);
        }
        true
    }

    fn delete(&mut self, t: &Triple) -> bool {
        if !self.store.remove(t) {
            return false;
        }
        let cache = self.cache.get_mut();
        // cached keys stay registered, their entry remains valid
        cache.s.remove(t.s(), t);
        cache.p.remove(t.p(), t);
        cache.o.remove(t.o(), t);
        cache.sp.remove(&pair_hash(t.s(), t.p()), t);
        cache.po.remove(&pair_hash(t.p(), t.o()), t);
        cache.so.remove(&pair_hash(t.s(), t.o()), t);
        true
    }

    fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound> {
        self.store.get(t)
    }

    fn contains(&self, t: &Triple) -> bool {
        self.store.contains(t)
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn triples(&self) -> TripleIter<'_> {
        Box::new(self.store.iter().cloned())
    }

    fn clear(&mut self) {
        self.store.clear();
        *self.cache.get_mut() = LazyCache::new(self.options.capacity());
    }

    fn with_subject(&self, s: &Node) -> TripleIter<'_> {
        let found = self.lookup(SUBJECTS, s.clone(), |t| t.s() == s);
        Box::new(found.into_iter())
    }

    fn with_predicate(&self, p: &Node) -> TripleIter<'_> {
        let found = self.lookup(PREDICATES, p.clone(), |t| t.p() == p);
        Box::new(found.into_iter())
    }

    fn with_object(&self, o: &Node) -> TripleIter<'_> {
        let found = self.lookup(OBJECTS, o.clone(), |t| t.o() == o);
        Box::new(found.into_iter())
    }

    fn with_subject_predicate(&self, s: &Node, p: &Node) -> TripleIter<'_> {
        let found = if self.options.full_indexing() {
            let key = pair_hash(s, p);
            self.lookup(SUBJECT_PREDICATES, key, |t| pair_hash(t.s(), t.p()) == key)
        } else {
            self.lookup(SUBJECTS, s.clone(), |t| t.s() == s)
        };
        let (s, p) = (s.clone(), p.clone());
        Box::new(
            found
                .into_iter()
                .filter(move |t| t.s() == &s && t.p() == &p),
        )
    }

    fn with_predicate_object(&self, p: &Node, o: &Node) -> TripleIter<'_> {
        let found = if self.options.full_indexing() {
            let key = pair_hash(p, o);
            self.lookup(PREDICATE_OBJECTS, key, |t| pair_hash(t.p(), t.o()) == key)
        } else {
            self.lookup(OBJECTS, o.clone(), |t| t.o() == o)
        };
        let (p, o) = (p.clone(), o.clone());
        Box::new(
            found
                .into_iter()
                .filter(move |t| t.p() == &p && t.o() == &o),
        )
    }

    fn with_subject_object(&self, s: &Node, o: &Node) -> TripleIter<'_> {
        let found = if self.options.full_indexing() {
            let key = pair_hash(s, o);
            self.lookup(SUBJECT_OBJECTS, key, |t| pair_hash(t.s(), t.o()) == key)
        } else {
            self.lookup(SUBJECTS, s.clone(), |t| t.s() == s)
        };
        let (s, o) = (s.clone(), o.clone());
        Box::new(
            found
                .into_iter()
                .filter(move |t| t.s() == &s && t.o() == &o),
        )
    }
}
