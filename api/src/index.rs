//! The [`TripleIndex`] contract, shared by every in-memory triple collection.
//!
//! A triple index stores a *set* of [`Triple`]s and answers pattern queries
//! by subject, predicate, object, and each pair of them.
//! Queries return lazy sequences ([`TripleIter`]);
//! queries on keys that the index does not know return empty sequences.
//!
//! Only [`add`](TripleIndex::add), [`delete`](TripleIndex::delete), [`get`](TripleIndex::get),
//! [`len`](TripleIndex::len), [`triples`](TripleIndex::triples) and [`clear`](TripleIndex::clear)
//! are required; every other method has a default implementation
//! based on them, which implementors may override with a more efficient one.
use crate::node::Node;
use crate::triple::Triple;
use std::collections::HashSet;
use thiserror::Error;

mod _ext_impl;


/// The lazy sequence of triples returned by [`TripleIndex`] queries.
pub type TripleIter<'a> = Box<dyn Iterator<Item = Triple> + 'a>;

/// The lazy sequence of nodes returned by [`TripleIndex`] node-set accessors.
pub type NodeIter<'a> = Box<dyn Iterator<Item = Node> + 'a>;

/// This error is raised by [`TripleIndex::get`] when the triple is not in the index.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("The given triple does not exist in the triple collection: {0}")]
pub struct TripleNotFound(pub Triple);

/// An indexed set of triples.
///
/// See the [module documentation](self).
pub trait TripleIndex {
    /// Insert `t` in this index.
    ///
    /// Return `true` iff `t` was not already present.
    fn add(&mut self, t: Triple) -> bool;

    /// Remove `t` from this index.
    ///
    /// Return `true` iff `t` was present.
    fn delete(&mut self, t: &Triple) -> bool;

    /// Return the instance of `t` stored in this index.
    ///
    /// The returned triple is equal to `t`,
    /// and shares its storage with the one that was [added](TripleIndex::add).
    fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound>;

    /// The number of triples in this index.
    fn len(&self) -> usize;

    /// Iterate over all the triples of this index.
    fn triples(&self) -> TripleIter<'_>;

    /// Remove all triples (and index storage) from this index.
    ///
    /// The index remains usable afterwards.
    fn clear(&mut self);

    fn contains(&self, t: &Triple) -> bool {
        self.get(t).is_ok()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the triples having `s` as their subject.
    fn with_subject(&self, s: &Node) -> TripleIter<'_> {
        let s = s.clone();
        Box::new(self.triples().filter(move |t| t.s() == &s))
    }

    /// Iterate over the triples having `p` as their predicate.
    fn with_predicate(&self, p: &Node) -> TripleIter<'_> {
        let p = p.clone();
        Box::new(self.triples().filter(move |t| t.p() == &p))
    }

    /// Iterate over the triples having `o` as their object.
    fn with_object(&self, o: &Node) -> TripleIter<'_> {
        let o = o.clone();
        Box::new(self.triples().filter(move |t| t.o() == &o))
    }

    /// Iterate over the triples having `s` as their subject and `p` as their predicate.
    fn with_subject_predicate(&self, s: &Node, p: &Node) -> TripleIter<'_> {
        let p = p.clone();
        Box::new(self.with_subject(s).filter(move |t| t.p() == &p))
    }

    /// Iterate over the triples having `p` as their predicate and `o` as their object.
    fn with_predicate_object(&self, p: &Node, o: &Node) -> TripleIter<'_> {
        let o = o.clone();
        Box::new(self.with_predicate(p).filter(move |t| t.o() == &o))
    }

    /// Iterate over the triples having `s` as their subject and `o` as their object.
    fn with_subject_object(&self, s: &Node, o: &Node) -> TripleIter<'_> {
        let s = s.clone();
        Box::new(self.with_object(o).filter(move |t| t.s() == &s))
    }

    /// Iterate over the triples matching the given pattern,
    /// where `None` matches any node.
    fn triples_matching(
        &self,
        s: Option<&Node>,
        p: Option<&Node>,
        o: Option<&Node>,
    ) -> TripleIter<'_> {
        match (s, p, o) {
            (None, None, None) => self.triples(),
            (Some(s), None, None) => self.with_subject(s),
            (None, Some(p), None) => self.with_predicate(p),
            (None, None, Some(o)) => self.with_object(o),
            (Some(s), Some(p), None) => self.with_subject_predicate(s, p),
            (None, Some(p), Some(o)) => self.with_predicate_object(p, o),
            (Some(s), None, Some(o)) => self.with_subject_object(s, o),
            (Some(s), Some(p), Some(o)) => {
                Box::new(self.get(&Triple::new(s.clone(), p.clone(), o.clone())).into_iter())
            }
        }
    }

    /// Iterate over the distinct subjects of this index.
    fn subject_nodes(&self) -> NodeIter<'_> {
        distinct(self.triples().map(|t| t.s().clone()))
    }

    /// Iterate over the distinct predicates of this index.
    fn predicate_nodes(&self) -> NodeIter<'_> {
        distinct(self.triples().map(|t| t.p().clone()))
    }

    /// Iterate over the distinct objects of this index.
    fn object_nodes(&self) -> NodeIter<'_> {
        distinct(self.triples().map(|t| t.o().clone()))
    }

    /// Insert all the given triples, returning how many were not already present.
    fn add_all<I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator<Item = Triple>,
        Self: Sized,
    {
        triples
            .into_iter()
            .map(|t| self.add(t))
            .filter(|added| *added)
            .count()
    }

    /// Remove all the given triples, returning how many were present.
    fn delete_all<'t, I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator<Item = &'t Triple>,
        Self: Sized,
    {
        triples
            .into_iter()
            .map(|t| self.delete(t))
            .filter(|deleted| *deleted)
            .count()
    }
}

/// Lazily filter out the nodes already yielded by `nodes`.
pub fn distinct<'a, I>(nodes: I) -> NodeIter<'a>
where
    I: Iterator<Item = Node> + 'a,
{
    let mut seen = HashSet::new();
    Box::new(nodes.filter(move |n| seen.insert(n.clone())))
}
