use ternary_api::triple::Triple;
use thiserror::Error;

/// An error preventing [`GraphMatcher`](crate::GraphMatcher) from deciding whether two graphs are equal.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    /// One of the graphs contains a triple made only of blank nodes,
    /// for which no mapping can be computed.
    #[error("Cannot compute a mapping when a triple is entirely made of blank nodes: {0}")]
    AllBlankTriple(Triple),
    /// The brute-force search needed more assignments than the configured budget.
    #[error("Brute-force search exceeded its budget of {0} steps")]
    StepLimitExceeded(usize),
}
