//! This crate is an in-memory [RDF] triple store.
//!
//! It holds sets of *triples* (subject, predicate, object),
//! indexes them for retrieval by any of their nodes or pairs of nodes,
//! and compares graphs up to the renaming of their blank nodes.
//!
//! It re-exports the crates composing the toolkit:
//! * [`api`] (`ternary_api`): [nodes](node), [triples](triple) and the [`TripleIndex`](index::TripleIndex) contract;
//! * [`inmem`] (`ternary_inmem`): the index engines and the [`Graph`](graph::Graph);
//! * [`isomorphism`] (`ternary_isomorphism`): graph comparison.
//!
//! [RDF]: https://www.w3.org/TR/rdf-primer/
//!
//! # Getting Started
//!
//! ```
//! use ternary::prelude::*;
//! use ternary::inmem::index::SortedIndex;
//! use ternary::isomorphism::isomorphic_graphs;
//!
//! let alice = Node::uri("http://example.org/alice")?;
//! let knows = Node::uri("http://xmlns.com/foaf/0.1/knows")?;
//!
//! let friend = Node::blank();
//! let mut g = Graph::new();
//! g.assert(Triple::new(alice.clone(), knows.clone(), friend.clone()));
//! g.assert(Triple::new(friend.clone(), knows.clone(), alice.clone()));
//! assert_eq!(g.with_subject(&alice).count(), 1);
//! assert_eq!(g.with_predicate(&knows).count(), 2);
//!
//! let someone = Node::blank();
//! let mut h = Graph::with_index(SortedIndex::new());
//! h.assert(Triple::new(someone.clone(), knows.clone(), alice.clone()));
//! h.assert(Triple::new(alice.clone(), knows.clone(), someone.clone()));
//! assert!(isomorphic_graphs(&g, &h)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use ternary_api as api;
pub use ternary_api::{index, node, ns, triple};
pub use ternary_inmem as inmem;
pub use ternary_inmem::{graph, options};
pub use ternary_isomorphism as isomorphism;

pub mod prelude {
    //! Prelude for the `ternary` crate.
    pub use ternary_api::prelude::*;
    pub use ternary_inmem::graph::{Graph, GraphEvent};
    pub use ternary_inmem::index::HashIndex;
    pub use ternary_inmem::options::IndexOptions;
    pub use ternary_isomorphism::{GraphMatcher, Mapping, MatchError};
}
