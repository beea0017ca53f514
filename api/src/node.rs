//! I define [`Node`], the value type of every position of a [`Triple`].
//!
//! A node is one of
//! * a [variable](NodeKind::Variable) (`?x`), used in patterns,
//! * a [blank node](NodeKind::Blank), identified by an opaque [`BlankId`],
//! * a [URI](NodeKind::Uri),
//! * a [literal](NodeKind::Literal), made of a lexical form and an optional datatype or language tag,
//! * a [graph literal](NodeKind::GraphLiteral), embedding a set of triples.
//!
//! Nodes are immutable and cheap to clone: their content is shared behind an [`Arc`].
//! Their hash is computed once, at construction time.
//!
//! Nodes are totally ordered, first by [kind](NodeKind), then by content
//! (see [`Node::cmp`](#impl-Ord-for-Node)).
use crate::triple::Triple;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

mod _blank;
pub use _blank::*;
mod _display;
mod _error;
pub use _error::*;
mod _literal;
pub use _literal::*;

lazy_static! {
    /// The `LANGTAG` production of [Turtle](https://www.w3.org/TR/turtle/#grammar-production-LANGTAG),
    /// without the leading `@`.
    ///
    /// This regular expression matches the whole input (`^...$`).
    static ref LANG_TAG: Regex = Regex::new(r"^[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8})*$").unwrap();

    /// Production of SPARQL's VARNAME according to the
    /// [SPARQL spec](https://www.w3.org/TR/sparql11-query/#rVARNAME).
    ///
    /// This regular expression matches the whole input (`^...$`).
    static ref VARNAME: Regex = Regex::new(r#"(?x)
      ^
      [_A-Za-z0-9\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\U{10000}-\U{EFFFF}]
      [_A-Za-z0-9\u{B7}\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{300}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{203F}-\u{2040}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\U{10000}-\U{EFFFF}]*
      $
    "#).unwrap();
}

/// The kind of a [`Node`].
///
/// The order of the variants is the order in which nodes of different kinds are sorted.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum NodeKind {
    Variable,
    Blank,
    Uri,
    Literal,
    GraphLiteral,
}

/// The content of a [`Node`].
///
/// The derived ordering is the node ordering:
/// kinds are compared first (in declaration order), then contents.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum NodeValue {
    Variable(Box<str>),
    Blank(BlankId),
    Uri(Box<str>),
    Literal(Literal),
    /// The triples of a graph literal, sorted and without duplicates.
    GraphLiteral(Box<[Triple]>),
}

impl NodeValue {
    /// The kind of this value.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Variable(_) => NodeKind::Variable,
            NodeValue::Blank(_) => NodeKind::Blank,
            NodeValue::Uri(_) => NodeKind::Uri,
            NodeValue::Literal(_) => NodeKind::Literal,
            NodeValue::GraphLiteral(_) => NodeKind::GraphLiteral,
        }
    }
}

#[derive(Debug)]
struct NodeData {
    value: NodeValue,
    hash: u64,
}

/// An RDF node.
///
/// See the [module documentation](self).
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

impl Node {
    /// Wrap `value` into a new node, computing its hash.
    pub fn from_value(value: NodeValue) -> Self {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        let hash = hasher.finish();
        Node(Arc::new(NodeData { value, hash }))
    }

    /// Build a URI node,
    /// returning an error if `iri` is not a valid absolute IRI.
    pub fn uri<T: AsRef<str>>(iri: T) -> Result<Self, NodeError> {
        let iri = iri.as_ref();
        match oxiri::Iri::parse(iri) {
            Ok(_) => Ok(Self::uri_unchecked(iri)),
            Err(err) => Err(NodeError::InvalidUri(iri.to_string(), err.to_string())),
        }
    }

    /// Build a URI node without checking that `iri` is valid.
    pub fn uri_unchecked<T: Into<Box<str>>>(iri: T) -> Self {
        Self::from_value(NodeValue::Uri(iri.into()))
    }

    /// Build a blank node with a [fresh](BlankId::fresh) identifier.
    pub fn blank() -> Self {
        Self::blank_with_id(BlankId::fresh())
    }

    /// Build the blank node identified by `id`.
    pub fn blank_with_id(id: BlankId) -> Self {
        Self::from_value(NodeValue::Blank(id))
    }

    /// Build a plain literal (no datatype, no language tag).
    pub fn literal<T: Into<Box<str>>>(lexical: T) -> Self {
        Self::from_value(NodeValue::Literal(Literal::plain(lexical)))
    }

    /// Build a typed literal,
    /// returning an error if `datatype` is not a valid absolute IRI.
    pub fn typed_literal<L, D>(lexical: L, datatype: D) -> Result<Self, NodeError>
    where
        L: Into<Box<str>>,
        D: AsRef<str>,
    {
        let datatype = datatype.as_ref();
        oxiri::Iri::parse(datatype)
            .map_err(|err| NodeError::InvalidUri(datatype.to_string(), err.to_string()))?;
        Ok(Self::typed_literal_unchecked(lexical, datatype))
    }

    /// Build a typed literal without checking the datatype IRI.
    pub fn typed_literal_unchecked<L, D>(lexical: L, datatype: D) -> Self
    where
        L: Into<Box<str>>,
        D: Into<Box<str>>,
    {
        Self::from_value(NodeValue::Literal(Literal::typed(lexical, datatype)))
    }

    /// Build a language-tagged literal.
    ///
    /// The tag is normalized to lower case;
    /// an error is returned if it is not a valid language tag.
    pub fn lang_literal<L, T>(lexical: L, tag: T) -> Result<Self, NodeError>
    where
        L: Into<Box<str>>,
        T: AsRef<str>,
    {
        let tag = tag.as_ref();
        if !LANG_TAG.is_match(tag) {
            return Err(NodeError::InvalidLanguageTag(tag.to_string()));
        }
        Ok(Self::lang_literal_unchecked(lexical, tag.to_ascii_lowercase()))
    }

    /// Build a language-tagged literal without checking nor normalizing the tag.
    pub fn lang_literal_unchecked<L, T>(lexical: L, tag: T) -> Self
    where
        L: Into<Box<str>>,
        T: Into<Box<str>>,
    {
        Self::from_value(NodeValue::Literal(Literal::lang(lexical, tag)))
    }

    /// Build a variable,
    /// returning an error if `name` does not comply with SPARQL's VARNAME.
    pub fn variable<T: AsRef<str>>(name: T) -> Result<Self, NodeError> {
        let name = name.as_ref();
        if VARNAME.is_match(name) {
            Ok(Self::variable_unchecked(name))
        } else {
            Err(NodeError::InvalidVariableName(name.to_string()))
        }
    }

    /// Build a variable without checking its name.
    pub fn variable_unchecked<T: Into<Box<str>>>(name: T) -> Self {
        Self::from_value(NodeValue::Variable(name.into()))
    }

    /// Build a graph literal embedding the given triples.
    ///
    /// Duplicate triples are ignored.
    pub fn graph_literal<I: IntoIterator<Item = Triple>>(triples: I) -> Self {
        let mut triples: Vec<Triple> = triples.into_iter().collect();
        triples.sort();
        triples.dedup();
        Self::from_value(NodeValue::GraphLiteral(triples.into_boxed_slice()))
    }

    /// The content of this node.
    pub fn value(&self) -> &NodeValue {
        &self.0.value
    }

    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        self.0.value.kind()
    }

    /// The hash computed when this node was built.
    ///
    /// Equal nodes always have the same hash code.
    pub fn hash_code(&self) -> u64 {
        self.0.hash
    }

    /// Whether `a` and `b` share the same storage.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.0.value, NodeValue::Variable(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.0.value, NodeValue::Blank(_))
    }

    pub fn is_uri(&self) -> bool {
        matches!(self.0.value, NodeValue::Uri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.0.value, NodeValue::Literal(_))
    }

    pub fn is_graph_literal(&self) -> bool {
        matches!(self.0.value, NodeValue::GraphLiteral(_))
    }

    /// The IRI of this node, if it is a URI.
    pub fn as_uri(&self) -> Option<&str> {
        match &self.0.value {
            NodeValue::Uri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The identifier of this node, if it is a blank node.
    pub fn blank_id(&self) -> Option<BlankId> {
        match &self.0.value {
            NodeValue::Blank(id) => Some(*id),
            _ => None,
        }
    }

    /// The literal value of this node, if it is a literal.
    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.0.value {
            NodeValue::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The name of this node, if it is a variable.
    pub fn variable_name(&self) -> Option<&str> {
        match &self.0.value {
            NodeValue::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// The (sorted) triples of this node, if it is a graph literal.
    pub fn graph_triples(&self) -> Option<&[Triple]> {
        match &self.0.value {
            NodeValue::GraphLiteral(triples) => Some(triples),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Node::ptr_eq(self, other) || (self.0.hash == other.0.hash && self.0.value == other.0.value)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    /// Nodes are sorted by [kind](NodeKind) first:
    /// variables < blank nodes < URIs < literals < graph literals.
    /// Then variables are sorted by name, blank nodes by identifier, URIs by IRI,
    /// literals by lexical form, then datatype, then language tag,
    /// and graph literals by their sorted sequence of triples.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if Node::ptr_eq(self, other) {
            return std::cmp::Ordering::Equal;
        }
        self.0.value.cmp(&other.0.value)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self)
    }
}

impl From<BlankId> for Node {
    fn from(id: BlankId) -> Self {
        Node::blank_with_id(id)
    }
}
