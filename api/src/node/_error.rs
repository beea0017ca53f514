// this module is transparently re-exported by its parent `node`
use thiserror::Error;

/// This error is raised when building a [`Node`](super::Node) from invalid data.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NodeError {
    #[error("The given IRI '{0}' is not valid: {1}")]
    InvalidUri(String, String),
    #[error("The given language tag '{0}' is not valid")]
    InvalidLanguageTag(String),
    #[error("The given variable name '{0}' does not comply with SPARQL's VARNAME")]
    InvalidVariableName(String),
}
