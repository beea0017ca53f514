//! This crate is part of [ternary],
//! an in-memory [RDF] triple store.
//!
//! This crate provides functions to check if two graphs are [isomorphic],
//! i.e. equal up to a bijective renaming of their blank nodes,
//! and to retrieve that renaming.
//!
//! Any [`TripleIndex`] can be compared, in particular the graphs of `ternary_inmem`.
//! Triples made of three blank nodes are not supported,
//! and cause an [`AllBlankTriple`](MatchError::AllBlankTriple) error.
//!
//! [ternary]: https://docs.rs/ternary/latest/ternary/
//! [RDF]: https://www.w3.org/TR/rdf-primer/
//! [isomorphic]: https://www.w3.org/TR/rdf11-concepts/#graph-isomorphism
#![deny(missing_docs)]

mod brute_force;
mod dependency;
mod error;
pub mod mapping;
mod matcher;

pub use error::MatchError;
pub use mapping::Mapping;
pub use matcher::GraphMatcher;

use ternary_api::index::TripleIndex;

/// Compare `a` and `b`, returning the mapping from the blank nodes of `a` to those of `b`
/// if they are equal up to blank node renaming.
///
/// # Error
/// See [`GraphMatcher::equals`].
pub fn match_graphs<A, B>(a: &A, b: &B) -> Result<Option<Mapping>, MatchError>
where
    A: TripleIndex + ?Sized,
    B: TripleIndex + ?Sized,
{
    let mut matcher = GraphMatcher::new();
    matcher.equals(a, b)?;
    Ok(matcher.into_mapping())
}

/// Computes whether two graphs are isomorphic.
///
/// # Error
/// See [`GraphMatcher::equals`].
pub fn isomorphic_graphs<A, B>(a: &A, b: &B) -> Result<bool, MatchError>
where
    A: TripleIndex + ?Sized,
    B: TripleIndex + ?Sized,
{
    GraphMatcher::new().equals(a, b)
}

#[cfg(test)]
mod test;

#[cfg(test)]
fn test_setup() {
    TEST_SETUP.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[cfg(test)]
static TEST_SETUP: std::sync::Once = std::sync::Once::new();
