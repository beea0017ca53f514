//! Pairs of blank nodes occurring together in a triple.
use std::collections::{BTreeMap, BTreeSet};

use ternary_api::node::Node;
use ternary_api::triple::Triple;

/// The positions of the two blank nodes of a [`MappingPair`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum PairKind {
    SubjectPredicate,
    SubjectObject,
    PredicateObject,
}

/// Two distinct blank nodes sharing a triple,
/// whose third position (`bound`) is not blank.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct MappingPair {
    pub kind: PairKind,
    pub bound: Node,
    pub first: Node,
    pub second: Node,
}

impl MappingPair {
    /// The pair of `t`, if it has exactly two distinct blank nodes.
    ///
    /// Triples made of three blank nodes must be rejected beforehand.
    pub fn of(t: &Triple) -> Option<MappingPair> {
        let (s, p, o) = (t.s(), t.p(), t.o());
        let (kind, first, second, bound) = match (s.is_blank(), p.is_blank(), o.is_blank()) {
            (true, true, false) => (PairKind::SubjectPredicate, s, p, o),
            (true, false, true) => (PairKind::SubjectObject, s, o, p),
            (false, true, true) => (PairKind::PredicateObject, p, o, s),
            _ => return None,
        };
        if first == second {
            return None;
        }
        Some(MappingPair {
            kind,
            bound: bound.clone(),
            first: first.clone(),
            second: second.clone(),
        })
    }

    /// Whether `self` and `other` can correspond to each other under some mapping.
    pub fn same_shape(&self, other: &MappingPair) -> bool {
        self.kind == other.kind && self.bound == other.bound
    }

    pub fn involves(&self, node: &Node) -> bool {
        &self.first == node || &self.second == node
    }
}

/// The dependency pairs of a set of non-ground triples.
#[derive(Clone, Debug, Default)]
pub(crate) struct Dependencies {
    pairs: BTreeSet<MappingPair>,
    /// how many pairs share each (kind, bound node)
    shapes: BTreeMap<(PairKind, Node), usize>,
    /// how many triples involve both nodes of each pair
    shared: BTreeMap<(Node, Node), usize>,
}

impl Dependencies {
    pub fn new(triples: &[Triple]) -> Self {
        let mut deps = Dependencies::default();
        for t in triples {
            if let Some(pair) = MappingPair::of(t) {
                *deps
                    .shared
                    .entry(ordered(&pair.first, &pair.second))
                    .or_default() += 1;
                if !deps.pairs.contains(&pair) {
                    *deps
                        .shapes
                        .entry((pair.kind, pair.bound.clone()))
                        .or_default() += 1;
                    deps.pairs.insert(pair);
                }
            }
        }
        deps
    }

    pub fn pairs(&self) -> impl Iterator<Item = &MappingPair> {
        self.pairs.iter()
    }

    /// Whether `node` belongs to no pair.
    pub fn is_independent(&self, node: &Node) -> bool {
        !self.pairs.iter().any(|pair| pair.involves(node))
    }

    /// Whether `pair` is the only one of its kind with its bound node.
    pub fn is_canonical(&self, pair: &MappingPair) -> bool {
        self.shapes.get(&(pair.kind, pair.bound.clone())) == Some(&1)
    }

    /// The only pair shaped like `pair`, if there is exactly one.
    pub fn canonical_match(&self, pair: &MappingPair) -> Option<&MappingPair> {
        let mut candidates = self.pairs.iter().filter(|other| other.same_shape(pair));
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// The number of triples involving both nodes of `pair`.
    pub fn shared_triples(&self, pair: &MappingPair) -> usize {
        self.shared
            .get(&ordered(&pair.first, &pair.second))
            .copied()
            .unwrap_or(0)
    }
}

fn ordered(n1: &Node, n2: &Node) -> (Node, Node) {
    if n1 <= n2 {
        (n1.clone(), n2.clone())
    } else {
        (n2.clone(), n1.clone())
    }
}
