//! I define [`Mapping`], the result of a successful graph comparison.
use std::collections::btree_map::{BTreeMap, Iter};
use std::fmt;

use ternary_api::node::Node;
use ternary_api::triple::Triple;

/// A bijection from the blank nodes of one graph to the blank nodes of another.
///
/// Applying the mapping to every triple of the first graph
/// yields exactly the triples of the second graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping(BTreeMap<Node, Node>);

impl Mapping {
    pub(crate) fn new() -> Self {
        Mapping(BTreeMap::new())
    }

    /// Map every node of `nodes` to itself.
    pub(crate) fn identity<I: IntoIterator<Item = Node>>(nodes: I) -> Self {
        Mapping(nodes.into_iter().map(|n| (n.clone(), n)).collect())
    }

    pub(crate) fn from_map(map: BTreeMap<Node, Node>) -> Self {
        Mapping(map)
    }

    /// The image of the blank node `source`, if it is mapped.
    pub fn get(&self, source: &Node) -> Option<&Node> {
        self.0.get(source)
    }

    /// The number of mapped blank nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no blank node is mapped (i.e. the compared graphs were ground).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the (source, image) pairs, ordered by source.
    pub fn iter(&self) -> Iter<'_, Node, Node> {
        self.0.iter()
    }

    /// Rename the blank nodes of `t` according to this mapping.
    ///
    /// Nodes without an image are kept unchanged.
    pub fn apply(&self, t: &Triple) -> Triple {
        apply(&self.0, t)
    }
}

pub(crate) fn apply(map: &BTreeMap<Node, Node>, t: &Triple) -> Triple {
    if t.is_ground() {
        return t.clone();
    }
    t.map_nodes(|n| map.get(n).unwrap_or(n).clone())
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a Node, &'a Node);
    type IntoIter = Iter<'a, Node, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (source, image)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {} -> {}", source, image)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn apply_renames_mapped_nodes_only() {
        let (b1, b2, b3) = (Node::blank(), Node::blank(), Node::blank());
        let p = Node::uri_unchecked("http://example.org/p");
        let mut map = BTreeMap::new();
        map.insert(b1.clone(), b2.clone());
        let mapping = Mapping::from_map(map);
        let t = Triple::new(b1.clone(), p.clone(), b3.clone());
        assert_eq!(mapping.apply(&t), Triple::new(b2.clone(), p, b3));
        assert_eq!(mapping.get(&b1), Some(&b2));
        assert_eq!(mapping.get(&b2), None);
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn identity_and_display() {
        let b = Node::blank_with_id(ternary_api::node::BlankId::from_raw(7));
        let mapping = Mapping::identity(vec![b.clone()]);
        assert_eq!(mapping.get(&b), Some(&b));
        assert_eq!(mapping.to_string(), "{ _:b7 -> _:b7 }");
        assert_eq!(Mapping::new().to_string(), "{ }");
        assert!(Mapping::new().is_empty());
    }
}
