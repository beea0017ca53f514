// this module is transparently re-exported by its parent `node`
//
// Implement the Display trait for Node, using the N-Triples syntax
// (extended with `?var` and `{ ... }` for variables and graph literals).
use super::*;

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            NodeValue::Variable(name) => write!(f, "?{}", name),
            NodeValue::Blank(id) => write!(f, "_:b{}", id.as_u64()),
            NodeValue::Uri(iri) => write!(f, "<{}>", iri),
            NodeValue::Literal(lit) => write_literal(f, lit),
            NodeValue::GraphLiteral(triples) => {
                f.write_str("{")?;
                for t in triples.iter() {
                    write!(f, " {}", t)?;
                }
                f.write_str(" }")
            }
        }
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, lit: &Literal) -> fmt::Result {
    f.write_str("\"")?;
    for c in lit.lexical_form().chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")?;
    if let Some(tag) = lit.language_tag() {
        write!(f, "@{}", tag)
    } else if let Some(dt) = lit.datatype() {
        write!(f, "^^<{}>", dt)
    } else {
        Ok(())
    }
}
