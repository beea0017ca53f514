//! Standard and custom namespaces.
//!
//! This module provides:
//! * the [`Namespace`] type for building URI nodes under a common prefix;
//! * modules holding the IRIs of the most common vocabulary terms.
//!
//! # Example use
//! ```
//! use ternary_api::node::Node;
//! use ternary_api::ns::{rdf, Namespace};
//! use ternary_api::triple::Triple;
//!
//! let schema = Namespace::new("http://schema.org/").unwrap();
//! let name = schema.get("name").unwrap();
//! let t = Triple::new(name, Node::uri_unchecked(rdf::TYPE), Node::uri_unchecked(rdf::PROPERTY));
//! assert!(t.is_ground());
//! ```
use crate::node::{Node, NodeError};

/// A custom namespace.
///
/// The [`get`](Namespace::get) method can be used to create a URI node
/// by concatenating a suffix to this namespace's IRI.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Namespace(Box<str>);

impl Namespace {
    /// Build a custom namespace based on the given IRI.
    ///
    /// `iri` must be a valid IRI, otherwise this constructor returns an error.
    pub fn new<T: AsRef<str>>(iri: T) -> Result<Self, NodeError> {
        let iri = iri.as_ref();
        Node::uri(iri)?;
        Ok(Namespace(iri.into()))
    }

    /// Build a URI node by appending `suffix` to this namespace.
    ///
    /// Return an error if the concatenation produces an invalid IRI.
    pub fn get(&self, suffix: &str) -> Result<Node, NodeError> {
        Node::uri(format!("{}{}", self.0, suffix))
    }

    /// Build a URI node by appending `suffix` to this namespace,
    /// without checking that the resulting IRI is valid.
    pub fn get_unchecked(&self, suffix: &str) -> Node {
        Node::uri_unchecked(format!("{}{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! vocabulary {
    ($(#[$attr: meta])* $mod_name: ident, $prefix: literal, $($const_name: ident = $suffix: literal),* $(,)?) => {
        $(#[$attr])*
        pub mod $mod_name {
            /// The namespace IRI.
            pub const NS: &str = $prefix;
            $(
                #[doc = concat!("`", $prefix, $suffix, "`")]
                pub const $const_name: &str = concat!($prefix, $suffix);
            )*
        }
    };
}

vocabulary!(
    /// The standard `rdf:` namespace.
    rdf,
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    TYPE = "type",
    PROPERTY = "Property",
    LANG_STRING = "langString",
    FIRST = "first",
    REST = "rest",
    NIL = "nil",
);

vocabulary!(
    /// The standard `rdfs:` namespace.
    rdfs,
    "http://www.w3.org/2000/01/rdf-schema#",
    CLASS = "Class",
    RESOURCE = "Resource",
    SUB_CLASS_OF = "subClassOf",
    DOMAIN = "domain",
    RANGE = "range",
    LABEL = "label",
);

vocabulary!(
    /// The standard `xsd:` namespace.
    xsd,
    "http://www.w3.org/2001/XMLSchema#",
    STRING = "string",
    INTEGER = "integer",
    BOOLEAN = "boolean",
    DATE = "date",
);
