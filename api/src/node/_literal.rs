// this module is transparently re-exported by its parent `node`
use crate::ns::rdf;

/// The content of a literal [`Node`](super::Node).
///
/// A literal has a lexical form, and at most one of a datatype or a language tag.
/// Literals with neither are *plain* literals; they are distinct from literals
/// explicitly typed as `xsd:string`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Literal {
    lexical: Box<str>,
    datatype: Option<Box<str>>,
    language: Option<Box<str>>,
}

impl Literal {
    pub(crate) fn plain<L: Into<Box<str>>>(lexical: L) -> Self {
        Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub(crate) fn typed<L: Into<Box<str>>, D: Into<Box<str>>>(lexical: L, datatype: D) -> Self {
        Literal {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub(crate) fn lang<L: Into<Box<str>>, T: Into<Box<str>>>(lexical: L, tag: T) -> Self {
        Literal {
            lexical: lexical.into(),
            datatype: None,
            language: Some(tag.into()),
        }
    }

    pub fn lexical_form(&self) -> &str {
        &self.lexical
    }

    /// The explicit datatype of this literal, if any.
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    pub fn language_tag(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// The datatype of this literal, with `rdf:langString` for language-tagged literals.
    /// Plain literals have none.
    pub fn effective_datatype(&self) -> Option<&str> {
        match (&self.datatype, &self.language) {
            (Some(dt), _) => Some(dt),
            (None, Some(_)) => Some(rdf::LANG_STRING),
            (None, None) => None,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.datatype.is_none() && self.language.is_none()
    }
}
