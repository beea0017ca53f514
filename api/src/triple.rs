//! I define [`Triple`], an immutable (subject, predicate, object) statement.
//!
//! Like [`Node`]s, triples are cheap to clone and cache their hash.
//! Cloning a triple shares its storage, so a triple stored in an index
//! and the triples later returned by the index's queries are the same allocation
//! (see [`Triple::ptr_eq`]).
use crate::node::Node;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct TripleData {
    s: Node,
    p: Node,
    o: Node,
    hash: u64,
}

/// An RDF triple.
#[derive(Clone)]
pub struct Triple(Arc<TripleData>);

impl Triple {
    pub fn new(s: Node, p: Node, o: Node) -> Self {
        let mut hasher = DefaultHasher::new();
        hasher.write_u64(s.hash_code());
        hasher.write_u64(p.hash_code());
        hasher.write_u64(o.hash_code());
        let hash = hasher.finish();
        Triple(Arc::new(TripleData { s, p, o, hash }))
    }

    /// The subject of this triple.
    pub fn s(&self) -> &Node {
        &self.0.s
    }

    /// The predicate of this triple.
    pub fn p(&self) -> &Node {
        &self.0.p
    }

    /// The object of this triple.
    pub fn o(&self) -> &Node {
        &self.0.o
    }

    /// The three nodes of this triple, in subject-predicate-object order.
    pub fn spo(&self) -> [&Node; 3] {
        [&self.0.s, &self.0.p, &self.0.o]
    }

    /// Iterate over the three nodes of this triple.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.spo().into_iter()
    }

    /// Iterate over the blank nodes of this triple.
    ///
    /// A blank node occurring at several positions is yielded once per position.
    pub fn blank_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|n| n.is_blank())
    }

    /// A triple is ground iff none of its nodes is a blank node.
    pub fn is_ground(&self) -> bool {
        !self.nodes().any(Node::is_blank)
    }

    /// Whether all three positions hold blank nodes.
    pub fn is_all_blank(&self) -> bool {
        self.nodes().all(Node::is_blank)
    }

    /// Whether `node` occurs at any position of this triple.
    pub fn involves(&self, node: &Node) -> bool {
        self.nodes().any(|n| n == node)
    }

    /// Build a new triple by applying `f` to every node of this one.
    pub fn map_nodes<F: FnMut(&Node) -> Node>(&self, mut f: F) -> Triple {
        Triple::new(f(self.s()), f(self.p()), f(self.o()))
    }

    /// The hash computed when this triple was built.
    pub fn hash_code(&self) -> u64 {
        self.0.hash
    }

    /// Whether `a` and `b` share the same storage.
    pub fn ptr_eq(a: &Triple, b: &Triple) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

/// Combine the hash codes of two nodes into the key of a pair index.
///
/// The result depends on the order of the nodes.
/// Distinct pairs may collide, so pair lookups must re-check node equality.
pub fn pair_hash(a: &Node, b: &Node) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write_u64(a.hash_code());
    hasher.write_u64(b.hash_code());
    hasher.finish()
}

impl PartialEq for Triple {
    fn eq(&self, other: &Self) -> bool {
        Triple::ptr_eq(self, other)
            || (self.0.hash == other.0.hash
                && self.0.s == other.0.s
                && self.0.p == other.0.p
                && self.0.o == other.0.o)
    }
}

impl Eq for Triple {}

impl Hash for Triple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash)
    }
}

impl PartialOrd for Triple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Triple {
    /// Triples are sorted by subject, then predicate, then object.
    fn cmp(&self, other: &Self) -> Ordering {
        self.s()
            .cmp(other.s())
            .then_with(|| self.p().cmp(other.p()))
            .then_with(|| self.o().cmp(other.o()))
    }
}

impl fmt::Debug for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Triple({} {} {})", self.s(), self.p(), self.o())
    }
}

impl fmt::Display for Triple {
    /// Render this triple as an N-Triples line (without the line break).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.s(), self.p(), self.o())
    }
}

impl From<[Node; 3]> for Triple {
    fn from([s, p, o]: [Node; 3]) -> Self {
        Triple::new(s, p, o)
    }
}

impl From<(Node, Node, Node)> for Triple {
    fn from((s, p, o): (Node, Node, Node)) -> Self {
        Triple::new(s, p, o)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::BlankId;

    fn uri(suffix: &str) -> Node {
        Node::uri_unchecked(format!("http://example.org/{}", suffix))
    }

    #[test]
    fn ground() {
        let t = Triple::new(uri("s"), uri("p"), Node::literal("o"));
        assert!(t.is_ground());
        assert!(!t.is_all_blank());
        assert_eq!(t.blank_nodes().count(), 0);
    }

    #[test]
    fn not_ground() {
        let b = Node::blank();
        let t = Triple::new(uri("s"), uri("p"), b.clone());
        assert!(!t.is_ground());
        assert!(t.involves(&b));
        assert!(!t.involves(&uri("o")));
        assert_eq!(t.blank_nodes().collect::<Vec<_>>(), vec![&b]);
    }

    #[test]
    fn all_blank() {
        let b = Node::blank();
        let t = Triple::new(b.clone(), b.clone(), Node::blank());
        assert!(t.is_all_blank());
        assert_eq!(t.blank_nodes().count(), 3);
    }

    #[test]
    fn equality_and_hash() {
        let t1 = Triple::new(uri("s"), uri("p"), uri("o"));
        let t2 = Triple::new(uri("s"), uri("p"), uri("o"));
        assert_eq!(t1, t2);
        assert!(!Triple::ptr_eq(&t1, &t2));
        assert_eq!(t1.hash_code(), t2.hash_code());
        assert!(Triple::ptr_eq(&t1, &t1.clone()));
        let t3 = Triple::new(uri("o"), uri("p"), uri("s"));
        assert_ne!(t1, t3);
    }

    #[test]
    fn ordering() {
        let t1 = Triple::new(uri("a"), uri("z"), uri("z"));
        let t2 = Triple::new(uri("b"), uri("a"), uri("a"));
        let t3 = Triple::new(uri("b"), uri("a"), uri("b"));
        assert!(t1 < t2);
        assert!(t2 < t3);
    }

    #[test]
    fn map_nodes() {
        let b1 = Node::blank_with_id(BlankId::from_raw(1_000_001));
        let b2 = Node::blank_with_id(BlankId::from_raw(1_000_002));
        let t = Triple::new(b1.clone(), uri("p"), b1.clone());
        let mapped = t.map_nodes(|n| if n == &b1 { b2.clone() } else { n.clone() });
        assert_eq!(mapped, Triple::new(b2.clone(), uri("p"), b2));
    }

    #[test]
    fn pair_hash_is_ordered() {
        assert_ne!(pair_hash(&uri("a"), &uri("b")), pair_hash(&uri("b"), &uri("a")));
        assert_eq!(pair_hash(&uri("a"), &uri("b")), pair_hash(&uri("a"), &uri("b")));
    }

    #[test]
    fn display() {
        let t = Triple::new(uri("s"), uri("p"), Node::literal("o"));
        assert_eq!(
            t.to_string(),
            "<http://example.org/s> <http://example.org/p> \"o\" ."
        );
    }
}
