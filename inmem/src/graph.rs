//! A [`Graph`] is a set of triples, held by one of the [index engines](crate::index),
//! and notifying its subscribers of every change.
use std::fmt;

use log::debug;
use ternary_api::index::{NodeIter, TripleIndex, TripleIter, TripleNotFound};
use ternary_api::node::{BlankNodeMapper, Node};
use ternary_api::triple::Triple;

use crate::index::HashIndex;

/// A change applied to a [`Graph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    Asserted(Triple),
    Retracted(Triple),
    Cleared,
    /// Another graph was merged into this one, adding `added` new triples.
    Merged { added: usize },
}

/// Identifies a subscription to the events of a [`Graph`],
/// so that it can be [cancelled](Graph::unsubscribe).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SubscriptionId(usize);

type Subscriber = Box<dyn FnMut(&GraphEvent) + Send + Sync>;

/// An optionally named set of triples.
///
/// The graph delegates storage and queries to its index engine `I`,
/// and notifies its subscribers of effective changes only:
/// asserting a triple already present, or retracting an absent one,
/// raises no event.
///
/// `Graph` implements [`TripleIndex`] itself, by delegation;
/// [`add`](TripleIndex::add) and [`delete`](TripleIndex::delete)
/// go through [`assert`](Graph::assert) and [`retract`](Graph::retract).
pub struct Graph<I: TripleIndex = HashIndex> {
    name: Option<Node>,
    index: I,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: usize,
}

impl Graph<HashIndex> {
    pub fn new() -> Self {
        Self::with_index(HashIndex::new())
    }

    /// A graph named by `name`, which is expected to be a URI node.
    pub fn named(name: Node) -> Self {
        Self::new().with_name(name)
    }
}

impl<I: TripleIndex> Graph<I> {
    /// A graph storing its triples in `index`.
    ///
    /// Triples already present in `index` belong to the graph.
    pub fn with_index(index: I) -> Self {
        Graph {
            name: None,
            index,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn with_name(mut self, name: Node) -> Self {
        self.name = Some(name);
        self
    }

    pub fn name(&self) -> Option<&Node> {
        self.name.as_ref()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Consume this graph, returning its index engine.
    pub fn into_index(self) -> I {
        self.index
    }

    /// Insert `t`, returning `true` iff it was not already present.
    pub fn assert(&mut self, t: Triple) -> bool {
        if !self.index.add(t.clone()) {
            return false;
        }
        self.notify(&GraphEvent::Asserted(t));
        true
    }

    /// Insert all the given triples, returning how many were not already present.
    pub fn assert_all<T: IntoIterator<Item = Triple>>(&mut self, triples: T) -> usize {
        triples.into_iter().filter(|t| self.assert(t.clone())).count()
    }

    /// Remove `t`, returning `true` iff it was present.
    pub fn retract(&mut self, t: &Triple) -> bool {
        if !self.index.delete(t) {
            return false;
        }
        self.notify(&GraphEvent::Retracted(t.clone()));
        true
    }

    /// Remove all the given triples, returning how many were present.
    pub fn retract_all<'t, T: IntoIterator<Item = &'t Triple>>(&mut self, triples: T) -> usize {
        triples.into_iter().filter(|t| self.retract(t)).count()
    }

    /// Remove every triple from this graph.
    pub fn clear(&mut self) {
        if self.index.is_empty() {
            return;
        }
        self.index.clear();
        self.notify(&GraphEvent::Cleared);
    }

    /// Copy the triples of `other` into this graph,
    /// replacing each of its blank nodes with a fresh one.
    ///
    /// Merging thus never unifies the blank nodes of this graph with those of `other`,
    /// even when they are equal.
    /// Return the number of triples added.
    pub fn merge<J: TripleIndex + ?Sized>(&mut self, other: &J) -> usize {
        let mut mapper = BlankNodeMapper::new();
        let mut added = 0;
        for t in other.triples() {
            let t = if t.is_ground() {
                t
            } else {
                t.map_nodes(|n| {
                    if n.is_blank() {
                        mapper.get_or_create(&n.to_string())
                    } else {
                        n.clone()
                    }
                })
            };
            if self.index.add(t) {
                added += 1;
            }
        }
        debug!(
            "Graph: merged {} triples, {} fresh blank nodes",
            added,
            mapper.len()
        );
        self.notify_merged(added);
        added
    }

    /// Copy the triples of `other` into this graph as they are,
    /// blank nodes included.
    ///
    /// Return the number of triples added.
    pub fn merge_keep_blanks<J: TripleIndex + ?Sized>(&mut self, other: &J) -> usize {
        let added = other.triples().filter(|t| self.index.add(t.clone())).count();
        self.notify_merged(added);
        added
    }

    /// Register `callback`, to be called with every subsequent change of this graph.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Cancel a subscription.
    ///
    /// Return `false` if `id` was not (or no longer) subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() < before
    }

    fn notify_merged(&mut self, added: usize) {
        if added > 0 {
            self.notify(&GraphEvent::Merged { added });
        }
    }

    fn notify(&mut self, event: &GraphEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }
}

impl<I: TripleIndex + Default> Default for Graph<I> {
    fn default() -> Self {
        Self::with_index(I::default())
    }
}

impl<I: TripleIndex> fmt::Debug for Graph<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("len", &self.index.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<I: TripleIndex> TripleIndex for Graph<I> {
    fn add(&mut self, t: Triple) -> bool {
        self.assert(t)
    }

    fn delete(&mut self, t: &Triple) -> bool {
        self.retract(t)
    }

    fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound> {
        self.index.get(t)
    }

    fn contains(&self, t: &Triple) -> bool {
        self.index.contains(t)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn triples(&self) -> TripleIter<'_> {
        self.index.triples()
    }

    fn clear(&mut self) {
        Graph::clear(self)
    }

    fn with_subject(&self, s: &Node) -> TripleIter<'_> {
        self.index.with_subject(s)
    }

    fn with_predicate(&self, p: &Node) -> TripleIter<'_> {
        self.index.with_predicate(p)
    }

    fn with_object(&self, o: &Node) -> TripleIter<'_> {
        self.index.with_object(o)
    }

    fn with_subject_predicate(&self, s: &Node, p: &Node) -> TripleIter<'_> {
        self.index.with_subject_predicate(s, p)
    }

    fn with_predicate_object(&self, p: &Node, o: &Node) -> TripleIter<'_> {
        self.index.with_predicate_object(p, o)
    }

    fn with_subject_object(&self, s: &Node, o: &Node) -> TripleIter<'_> {
        self.index.with_subject_object(s, o)
    }

    fn subject_nodes(&self) -> NodeIter<'_> {
        self.index.subject_nodes()
    }

    fn predicate_nodes(&self) -> NodeIter<'_> {
        self.index.predicate_nodes()
    }

    fn object_nodes(&self) -> NodeIter<'_> {
        self.index.object_nodes()
    }
}
