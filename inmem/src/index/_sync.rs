// this module is transparently re-exported by its parent `index`
use parking_lot::RwLock;
use std::vec::IntoIter;
use ternary_api::index::{NodeIter, TripleIndex, TripleIter, TripleNotFound};
use ternary_api::node::Node;
use ternary_api::triple::Triple;

use super::HashIndex;

/// A snapshot of the result of a query on a [`SyncIndex`].
pub type Snapshot<T = Triple> = IntoIter<T>;

/// A thread-safe wrapper around any [`TripleIndex`].
///
/// All operations are available through `&self`, so a `SyncIndex` can be shared in an `Arc`.
/// Writers take the lock exclusively for the whole mutation.
/// Readers take it in shared mode, recursively,
/// so that a read nested in another read on the same thread never deadlocks
/// (see [`read`](SyncIndex::read)),
/// and return a [`Snapshot`] collected before the lock is released.
///
/// `SyncIndex` also implements [`TripleIndex`] itself,
/// where exclusive access makes locking unnecessary.
#[derive(Debug, Default)]
pub struct SyncIndex<I = HashIndex> {
    inner: RwLock<I>,
}

impl<I: TripleIndex> SyncIndex<I> {
    pub fn new(inner: I) -> Self {
        SyncIndex {
            inner: RwLock::new(inner),
        }
    }

    /// Consume this wrapper, returning the wrapped index.
    pub fn into_inner(self) -> I {
        self.inner.into_inner()
    }

    /// Run `f` with shared access to the wrapped index.
    ///
    /// Other reads, including ones performed by `f` through this `SyncIndex`, can proceed concurrently.
    pub fn read<R, F: FnOnce(&I) -> R>(&self, f: F) -> R {
        f(&self.inner.read_recursive())
    }

    /// Run `f` with exclusive access to the wrapped index.
    ///
    /// `f` must not access this `SyncIndex`, or it will deadlock.
    pub fn write<R, F: FnOnce(&mut I) -> R>(&self, f: F) -> R {
        f(&mut self.inner.write())
    }

    pub fn add(&self, t: Triple) -> bool {
        self.inner.write().add(t)
    }

    pub fn delete(&self, t: &Triple) -> bool {
        self.inner.write().delete(t)
    }

    pub fn clear(&self) {
        self.inner.write().clear()
    }

    pub fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound> {
        self.inner.read_recursive().get(t)
    }

    pub fn contains(&self, t: &Triple) -> bool {
        self.inner.read_recursive().contains(t)
    }

    pub fn len(&self) -> usize {
        self.inner.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read_recursive().is_empty()
    }

    pub fn triples(&self) -> Snapshot {
        self.snapshot(|i| i.triples())
    }

    pub fn with_subject(&self, s: &Node) -> Snapshot {
        self.snapshot(|i| i.with_subject(s))
    }

    pub fn with_predicate(&self, p: &Node) -> Snapshot {
        self.snapshot(|i| i.with_predicate(p))
    }

    pub fn with_object(&self, o: &Node) -> Snapshot {
        self.snapshot(|i| i.with_object(o))
    }

    pub fn with_subject_predicate(&self, s: &Node, p: &Node) -> Snapshot {
        self.snapshot(|i| i.with_subject_predicate(s, p))
    }

    pub fn with_predicate_object(&self, p: &Node, o: &Node) -> Snapshot {
        self.snapshot(|i| i.with_predicate_object(p, o))
    }

    pub fn with_subject_object(&self, s: &Node, o: &Node) -> Snapshot {
        self.snapshot(|i| i.with_subject_object(s, o))
    }

    pub fn subject_nodes(&self) -> Snapshot<Node> {
        self.snapshot(|i| i.subject_nodes())
    }

    pub fn predicate_nodes(&self) -> Snapshot<Node> {
        self.snapshot(|i| i.predicate_nodes())
    }

    pub fn object_nodes(&self) -> Snapshot<Node> {
        self.snapshot(|i| i.object_nodes())
    }

    fn snapshot<T, F>(&self, query: F) -> Snapshot<T>
    where
        F: for<'a> FnOnce(&'a I) -> Box<dyn Iterator<Item = T> + 'a>,
    {
        let inner = self.inner.read_recursive();
        let items: Vec<T> = query(&inner).collect();
        items.into_iter()
    }
}

impl<I: TripleIndex> TripleIndex for SyncIndex<I> {
    fn add(&mut self, t: Triple) -> bool {
        self.inner.get_mut().add(t)
    }

    fn delete(&mut self, t: &Triple) -> bool {
        self.inner.get_mut().delete(t)
    }

    fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound> {
        SyncIndex::get(self, t)
    }

    fn contains(&self, t: &Triple) -> bool {
        SyncIndex::contains(self, t)
    }

    fn len(&self) -> usize {
        SyncIndex::len(self)
    }

    fn triples(&self) -> TripleIter<'_> {
        Box::new(SyncIndex::triples(self))
    }

    fn clear(&mut self) {
        self.inner.get_mut().clear()
    }

    fn with_subject(&self, s: &Node) -> TripleIter<'_> {
        Box::new(SyncIndex::with_subject(self, s))
    }

    fn with_predicate(&self, p: &Node) -> TripleIter<'_> {
        Box::new(SyncIndex::with_predicate(self, p))
    }

    fn with_object(&self, o: &Node) -> TripleIter<'_> {
        Box::new(SyncIndex::with_object(self, o))
    }

    fn with_subject_predicate(&self, s: &Node, p: &Node) -> TripleIter<'_> {
        Box::new(SyncIndex::with_subject_predicate(self, s, p))
    }

    fn with_predicate_object(&self, p: &Node, o: &Node) -> TripleIter<'_> {
        Box::new(SyncIndex::with_predicate_object(self, p, o))
    }

    fn with_subject_object(&self, s: &Node, o: &Node) -> TripleIter<'_> {
        Box::new(SyncIndex::with_subject_object(self, s, o))
    }

    fn subject_nodes(&self) -> NodeIter<'_> {
        Box::new(SyncIndex::subject_nodes(self))
    }

    fn predicate_nodes(&self) -> NodeIter<'_> {
        Box::new(SyncIndex::predicate_nodes(self))
    }

    fn object_nodes(&self) -> NodeIter<'_> {
        Box::new(SyncIndex::object_nodes(self))
    }
}

impl<I: TripleIndex> From<I> for SyncIndex<I> {
    fn from(inner: I) -> Self {
        SyncIndex::new(inner)
    }
}
