// this module is transparently re-exported by its parent `node`
use super::Node;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BLANK_ID: AtomicU64 = AtomicU64::new(1);

/// The opaque identifier of a blank node.
///
/// Two blank nodes are equal iff their identifiers are equal.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BlankId(u64);

impl BlankId {
    /// Allocate an identifier that was never returned before by this process.
    pub fn fresh() -> Self {
        BlankId(NEXT_BLANK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Rebuild an identifier from its raw value.
    ///
    /// Raw values share their space with [`fresh`](BlankId::fresh) identifiers,
    /// so this is only meant for values previously obtained with [`as_u64`](BlankId::as_u64).
    pub fn from_raw(raw: u64) -> Self {
        BlankId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Hands out one fresh blank node per label,
/// always the same one for a given label.
///
/// This is how textual blank node labels (`_:a`) are turned into [`Node`]s:
/// two mappers never share blank nodes, even for identical labels.
#[derive(Clone, Debug, Default)]
pub struct BlankNodeMapper {
    map: HashMap<Box<str>, Node>,
}

impl BlankNodeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// The blank node associated to `label`, allocated on first use.
    pub fn get_or_create(&mut self, label: &str) -> Node {
        if let Some(node) = self.map.get(label) {
            return node.clone();
        }
        let node = Node::blank();
        self.map.insert(label.into(), node.clone());
        node
    }

    /// The blank node associated to `label`, if it was already allocated.
    pub fn get(&self, label: &str) -> Option<&Node> {
        self.map.get(label)
    }

    /// A blank node associated with no label.
    pub fn fresh(&self) -> Node {
        Node::blank()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
