// this module is transparently re-exported by its parent `index`
// It implements TripleIndex for standard set types.
use super::*;
use std::collections::BTreeSet;
use std::hash::BuildHasher;

impl<S> TripleIndex for HashSet<Triple, S>
where
    S: BuildHasher,
{
    fn add(&mut self, t: Triple) -> bool {
        self.insert(t)
    }

    fn delete(&mut self, t: &Triple) -> bool {
        self.remove(t)
    }

    fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound> {
        HashSet::get(self, t)
            .cloned()
            .ok_or_else(|| TripleNotFound(t.clone()))
    }

    fn contains(&self, t: &Triple) -> bool {
        HashSet::contains(self, t)
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn triples(&self) -> TripleIter<'_> {
        Box::new(self.iter().cloned())
    }

    fn clear(&mut self) {
        HashSet::clear(self)
    }
}

impl TripleIndex for BTreeSet<Triple> {
    fn add(&mut self, t: Triple) -> bool {
        self.insert(t)
    }

    fn delete(&mut self, t: &Triple) -> bool {
        self.remove(t)
    }

    fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound> {
        BTreeSet::get(self, t)
            .cloned()
            .ok_or_else(|| TripleNotFound(t.clone()))
    }

    fn contains(&self, t: &Triple) -> bool {
        BTreeSet::contains(self, t)
    }

    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn triples(&self) -> TripleIter<'_> {
        Box::new(self.iter().cloned())
    }

    fn clear(&mut self) {
        BTreeSet::clear(self)
    }
}
