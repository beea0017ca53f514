// this module is transparently re-exported by its parent `index`
use ternary_api::index::{NodeIter, TripleIndex, TripleIter, TripleNotFound};
use ternary_api::node::Node;
use ternary_api::triple::{pair_hash, Triple};

use super::{remove_and_prune, TripleStore};
use crate::multimap::HashMultimap;
use crate::options::IndexOptions;

/// An eagerly maintained index.
///
/// Every insertion updates the subject, predicate and object tables,
/// and, with [full indexing](IndexOptions::full_indexing),
/// the subject-predicate, predicate-object and subject-object tables.
/// The latter are keyed by the [combined hash](pair_hash) of the two nodes.
///
/// This is the default engine of [`Graph`](crate::graph::Graph).
#[derive(Clone, Debug)]
pub struct HashIndex {
    options: IndexOptions,
    store: TripleStore,
    s: HashMultimap<Node, Triple>,
    p: HashMultimap<Node, Triple>,
    o: HashMultimap<Node, Triple>,
    sp: HashMultimap<u64, Triple>,
    po: HashMultimap<u64, Triple>,
    so: HashMultimap<u64, Triple>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::with_options(IndexOptions::default())
    }

    pub fn with_options(options: IndexOptions) -> Self {
        let capacity = options.capacity();
        HashIndex {
            options,
            store: TripleStore::new(),
            s: HashMultimap::with_value_capacity(capacity),
            p: HashMultimap::with_value_capacity(capacity),
            o: HashMultimap::with_value_capacity(capacity),
            sp: HashMultimap::with_value_capacity(capacity),
            po: HashMultimap::with_value_capacity(capacity),
            so: HashMultimap::with_value_capacity(capacity),
        }
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TripleIndex for HashIndex {
    fn add(&mut self, t: Triple) -> bool {
        if !self.store.insert(&t) {
            return false;
        }
        self.s.add(t.s().clone(), t.clone());
        self.p.add(t.p().clone(), t.clone());
        self.o.add(t.o().clone(), t.clone());
        if self.options.full_indexing() {
            self.sp.add(pair_hash(t.s(), t.p()), t.clone());
            self.po.add(pair_hash(t.p(), t.o()), t.clone());
            self.so.add(pair_hash(t.s(), t.o()), t);
        }
        true
    }

    fn delete(&mut self, t: &Triple) -> bool {
        if !self.store.remove(t) {
            return false;
        }
        remove_and_prune(&mut self.s, t.s(), t);
        remove_and_prune(&mut self.p, t.p(), t);
        remove_and_prune(&mut self.o, t.o(), t);
        if self.options.full_indexing() {
            remove_and_prune(&mut self.sp, &pair_hash(t.s(), t.p()), t);
            remove_and_prune(&mut self.po, &pair_hash(t.p(), t.o()), t);
            remove_and_prune(&mut self.so, &pair_hash(t.s(), t.o()), t);
        }
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
        for table in [&mut self.s, &mut self.p, &mut self.o] {
            table.clear();
        }
        for table in [&mut self.sp, &mut self.po, &mut self.so] {
            table.clear();
        }
    }

    fn with_subject(&self, s: &Node) -> TripleIter<'_> {
        Box::new(self.s.get_values(s).cloned())
    }

    fn with_predicate(&self, p: &Node) -> TripleIter<'_> {
        Box::new(self.p.get_values(p).cloned())
    }

    fn with_object(&self, o: &Node) -> TripleIter<'_> {
        Box::new(self.o.get_values(o).cloned())
    }

    fn with_subject_predicate(&self, s: &Node, p: &Node) -> TripleIter<'_> {
        let (s, p) = (s.clone(), p.clone());
        if self.options.full_indexing() {
            let key = pair_hash(&s, &p);
            Box::new(
                self.sp
                    .get_values(&key)
                    .filter(move |t| t.s() == &s && t.p() == &p)
                    .cloned(),
            )
        } else {
            Box::new(self.s.get_values(&s).filter(move |t| t.p() == &p).cloned())
        }
    }

    fn with_predicate_object(&self, p: &Node, o: &Node) -> TripleIter<'_> {
        let (p, o) = (p.clone(), o.clone());
        if self.options.full_indexing() {
            let key = pair_hash(&p, &o);
            Box::new(
                self.po
                    .get_values(&key)
                    .filter(move |t| t.p() == &p && t.o() == &o)
                    .cloned(),
            )
        } else {
            Box::new(self.o.get_values(&o).filter(move |t| t.p() == &p).cloned())
        }
    }

    fn with_subject_object(&self, s: &Node, o: &Node) -> TripleIter<'_> {
        let (s, o) = (s.clone(), o.clone());
        if self.options.full_indexing() {
            let key = pair_hash(&s, &o);
            Box::new(
                self.so
                    .get_values(&key)
                    .filter(move |t| t.s() == &s && t.o() == &o)
                    .cloned(),
            )
        } else {
            Box::new(self.s.get_values(&s).filter(move |t| t.o() == &o).cloned())
        }
    }

    fn subject_nodes(&self) -> NodeIter<'_> {
        Box::new(self.s.keys().cloned())
    }

    fn predicate_nodes(&self) -> NodeIter<'_> {
        Box::new(self.p.keys().cloned())
    }

    fn object_nodes(&self) -> NodeIter<'_> {
        Box::new(self.o.keys().cloned())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::index::test::numbered_triples;

    ternary_api::test_triple_index_impl!(hash_index, HashIndex);
    ternary_api::test_triple_index_impl!(
        hash_index_partial,
        HashIndex,
        || HashIndex::with_options(IndexOptions::default().with_full_indexing(false))
    );

    #[test]
    fn pair_tables_follow_full_indexing() {
        let mut full = HashIndex::new();
        let mut partial =
            HashIndex::with_options(IndexOptions::default().with_full_indexing(false));
        for t in numbered_triples(6) {
            full.add(t.clone());
            partial.add(t);
        }
        assert_eq!(full.sp.len(), 6);
        assert_eq!(full.so.len(), 6);
        assert_eq!(partial.sp.len(), 0);
        assert_eq!(partial.po.key_count(), 0);
        assert_eq!(full.s.key_count(), 3);
        assert_eq!(full.p.key_count(), 2);
    }

    #[test]
    fn emptied_keys_are_dropped() {
        let mut g = HashIndex::new();
        let triples = numbered_triples(3);
        for t in &triples {
            g.add(t.clone());
        }
        g.delete(&triples[0]);
        assert_eq!(g.s.key_count(), 2);
        assert_eq!(g.subject_nodes().count(), 2);
        assert_eq!(g.object_nodes().count(), 2);
    }

    #[test]
    fn capacity_option_is_kept() {
        let options = IndexOptions::new(3, true).unwrap();
        let g = HashIndex::with_options(options);
        assert_eq!(g.options().capacity(), 3);
        assert_eq!(g.s.value_capacity(), 3);
        assert_eq!(g.p.value_capacity(), 3);
        assert_eq!(g.o.value_capacity(), 3);
        assert_eq!(g.sp.value_capacity(), 3);
        assert_eq!(g.po.value_capacity(), 3);
        assert_eq!(g.so.value_capacity(), 3);
    }
}
