// this module is transparently re-exported by its parent `index`
use std::collections::HashSet;
use std::slice::from_ref;
use ternary_api::index::{NodeIter, TripleIndex, TripleIter, TripleNotFound};
use ternary_api::node::Node;
use ternary_api::triple::Triple;

use super::TripleStore;
use crate::options::IndexOptions;
use crate::trie::Trie;

type TripleTrie = Trie<Node, HashSet<Triple>>;

/// An index storing triples in tries keyed by two of their nodes.
///
/// The four tries are keyed by
/// subject then predicate, predicate then object, object then subject,
/// and (with [full indexing](IndexOptions::full_indexing)) subject then object.
/// A single-node query collects every triple under a first-level node;
/// a pair query reads a single leaf.
/// Deleting the last triple of a leaf prunes the emptied branch.
#[derive(Clone, Debug)]
pub struct TrieIndex {
    options: IndexOptions,
    store: TripleStore,
    sp: TripleTrie,
    po: TripleTrie,
    os: TripleTrie,
    so: TripleTrie,
}

impl TrieIndex {
    pub fn new() -> Self {
        Self::with_options(IndexOptions::default())
    }

    pub fn with_options(options: IndexOptions) -> Self {
        TrieIndex {
            options,
            store: TripleStore::new(),
            sp: Trie::new(),
            po: Trie::new(),
            os: Trie::new(),
            so: Trie::new(),
        }
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }
}

fn insert_into(trie: &mut TripleTrie, capacity: usize, k1: &Node, k2: &Node, t: &Triple) {
    trie.move_to_node(&[k1.clone(), k2.clone()])
        .value_or_insert_with(|| HashSet::with_capacity(capacity))
        .insert(t.clone());
}

fn remove_from(trie: &mut TripleTrie, k1: &Node, k2: &Node, t: &Triple) {
    let keys = [k1.clone(), k2.clone()];
    if let Some(node) = trie.find_mut(&keys) {
        let emptied = node.value_mut().map_or(false, |set| {
            set.remove(t);
            set.is_empty()
        });
        if emptied {
            node.set_value(None);
        }
    }
    trie.prune(&keys);
}

fn under<'a>(trie: &'a TripleTrie, k1: &Node) -> TripleIter<'a> {
    Box::new(trie.values_under(from_ref(k1)).flatten().cloned())
}

fn leaf<'a>(trie: &'a TripleTrie, k1: &Node, k2: &Node) -> TripleIter<'a> {
    match trie.find(&[k1.clone(), k2.clone()]).and_then(|n| n.value()) {
        Some(set) => Box::new(set.iter().cloned()),
        None => Box::new(std::iter::empty()),
    }
}

fn first_level_keys(trie: &TripleTrie) -> NodeIter<'_> {
    Box::new(trie.root().children().map(|(k, _)| k.clone()))
}

impl Default for TrieIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TripleIndex for TrieIndex {
    fn add(&mut self, t: Triple) -> bool {
        if !self.store.insert(&t) {
            return false;
        }
        let (s, p, o) = (t.s(), t.p(), t.o());
        let capacity = self.options.capacity();
        insert_into(&mut self.sp, capacity, s, p, &t);
        insert_into(&mut self.po, capacity, p, o, &t);
        insert_into(&mut self.os, capacity, o, s, &t);
        if self.options.full_indexing() {
            insert_into(&mut self.so, capacity, s, o, &t);
        }
        true
    }

    fn delete(&mut self, t: &Triple) -> bool {
        if !self.store.remove(t) {
            return false;
        }
        let (s, p, o) = (t.s(), t.p(), t.o());
        remove_from(&mut self.sp, s, p, t);
        remove_from(&mut self.po, p, o, t);
        remove_from(&mut self.os, o, s, t);
        if self.options.full_indexing() {
            remove_from(&mut self.so, s, o, t);
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
        for trie in [&mut self.sp, &mut self.po, &mut self.os, &mut self.so] {
            trie.clear();
        }
    }

    fn with_subject(&self, s: &Node) -> TripleIter<'_> {
        under(&self.sp, s)
    }

    fn with_predicate(&self, p: &Node) -> TripleIter<'_> {
        under(&self.po, p)
    }

    fn with_object(&self, o: &Node) -> TripleIter<'_> {
        under(&self.os, o)
    }

    fn with_subject_predicate(&self, s: &Node, p: &Node) -> TripleIter<'_> {
        leaf(&self.sp, s, p)
    }

    fn with_predicate_object(&self, p: &Node, o: &Node) -> TripleIter<'_> {
        leaf(&self.po, p, o)
    }

    fn with_subject_object(&self, s: &Node, o: &Node) -> TripleIter<'_> {
        if self.options.full_indexing() {
            leaf(&self.so, s, o)
        } else {
            leaf(&self.os, o, s)
        }
    }

    fn subject_nodes(&self) -> NodeIter<'_> {
        first_level_keys(&self.sp)
    }

    fn predicate_nodes(&self) -> NodeIter<'_> {
        first_level_keys(&self.po)
    }

    fn object_nodes(&self) -> NodeIter<'_> {
        first_level_keys(&self.os)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::index::test::{numbered_triples, uri};

    ternary_api::test_triple_index_impl!(trie_index, TrieIndex);
    ternary_api::test_triple_index_impl!(
        trie_index_partial,
        TrieIndex,
        || TrieIndex::with_options(IndexOptions::default().with_full_indexing(false))
    );

    #[test]
    fn deleting_prunes_branches() {
        let mut g = TrieIndex::new();
        let triples = numbered_triples(4);
        for t in &triples {
            g.add(t.clone());
        }
        assert_eq!(g.sp.root().children().count(), 3);
        // s0 holds triples 0 and 3
        g.delete(&triples[0]);
        assert!(g.sp.find(&[uri("s0"), uri("p0")]).is_none());
        assert!(g.sp.find(&[uri("s0"), uri("p1")]).is_some());
        g.delete(&triples[3]);
        assert!(g.sp.find(&[uri("s0")]).is_none());
        assert_eq!(g.subject_nodes().count(), 2);
        for t in &triples[1..3] {
            g.delete(t);
        }
        for trie in [&g.sp, &g.po, &g.os, &g.so] {
            assert!(trie.is_empty());
        }
    }

    #[test]
    fn single_node_queries_do_not_borrow_their_key() {
        let mut g = TrieIndex::new();
        for t in numbered_triples(4) {
            g.add(t);
        }
        // the keys are temporaries, dropped before the results are consumed
        let by_subject = g.with_subject(&uri("s0"));
        let by_predicate = g.with_predicate(&uri("p0"));
        let by_object = g.with_object(&uri("o1"));
        assert_eq!(by_subject.count(), 2);
        assert_eq!(by_predicate.count(), 2);
        assert_eq!(by_object.count(), 1);
    }

    #[test]
    fn subject_object_trie_follows_full_indexing() {
        let mut g = TrieIndex::with_options(IndexOptions::default().with_full_indexing(false));
        for t in numbered_triples(4) {
            g.add(t);
        }
        assert!(g.so.is_empty());
        assert_eq!(g.with_subject_object(&uri("s0"), &uri("o3")).count(), 1);
    }
}
