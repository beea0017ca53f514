//! This crate is part of [ternary],
//! an in-memory [RDF] triple store.
//!
//! It provides the in-memory [triple index engines](index),
//! all implementing [`TripleIndex`](ternary_api::index::TripleIndex),
//! and the [`Graph`](graph::Graph) built on top of them.
//!
//! | engine                      | strategy                                             |
//! |-----------------------------|------------------------------------------------------|
//! | [`HashIndex`](index::HashIndex)     | eager hash tables, updated on every insertion  |
//! | [`LazyIndex`](index::LazyIndex)     | per-key caches, filled by the first query      |
//! | [`SortedIndex`](index::SortedIndex) | sorted arrays, searched by bisection           |
//! | [`TrieIndex`](index::TrieIndex)     | tries keyed by pairs of nodes                  |
//!
//! Any of them can be made thread-safe with [`SyncIndex`](index::SyncIndex).
//!
//! [ternary]: https://docs.rs/ternary/latest/ternary/
//! [RDF]: https://www.w3.org/TR/rdf-primer/

pub mod graph;
pub mod index;
pub mod multimap;
pub mod options;
pub mod trie;

#[cfg(test)]
fn test_setup() {
    TEST_SETUP.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[cfg(test)]
static TEST_SETUP: std::sync::Once = std::sync::Once::new();
