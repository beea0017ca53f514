//! This crate defines the value model shared by the whole `ternary` toolkit:
//! RDF [nodes](node::Node), [triples](triple::Triple),
//! and the [`TripleIndex`](index::TripleIndex) contract
//! that every in-memory triple collection implements.
//!
//! See also the [`ternary`](https://docs.rs/ternary) facade crate.

pub mod index;
pub mod node;
pub mod ns;
pub mod triple;

pub mod prelude {
    //! Prelude for the `ternary_api` crate.
    pub use crate::index::{TripleIndex, TripleIter, TripleNotFound};
    pub use crate::node::{BlankId, Node, NodeError, NodeKind};
    pub use crate::triple::Triple;
}
