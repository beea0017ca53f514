//! A generic trie, where each node may hold a value and has keyed children.
use std::collections::HashMap;
use std::hash::Hash;

/// A node of a [`Trie`].
#[derive(Clone, Debug)]
pub struct TrieNode<K, V> {
    value: Option<V>,
    children: HashMap<K, TrieNode<K, V>>,
}

impl<K, V> Default for TrieNode<K, V> {
    fn default() -> Self {
        TrieNode {
            value: None,
            children: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> TrieNode<K, V> {
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    /// The value of this node, inserting `f()` first if there is none.
    pub fn value_or_insert_with<F: FnOnce() -> V>(&mut self, f: F) -> &mut V {
        self.value.get_or_insert_with(f)
    }

    /// Replace the value of this node, returning the previous one.
    pub fn set_value(&mut self, value: Option<V>) -> Option<V> {
        std::mem::replace(&mut self.value, value)
    }

    pub fn child(&self, key: &K) -> Option<&TrieNode<K, V>> {
        self.children.get(key)
    }

    pub fn children(&self) -> impl Iterator<Item = (&K, &TrieNode<K, V>)> + '_ {
        self.children.iter()
    }

    /// A node is empty if it has neither a value nor children.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    /// Iterate over the values of this node and all its descendants.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { stack: vec![self] }
    }
}

/// Depth-first iterator over the values of a trie sub-tree.
///
/// See [`TrieNode::values`] and [`Trie::values_under`].
pub struct Values<'a, K, V> {
    stack: Vec<&'a TrieNode<K, V>>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children.values());
            if let Some(value) = &node.value {
                return Some(value);
            }
        }
        None
    }
}

/// A trie of `V`s, where paths are sequences of `K`s.
#[derive(Clone, Debug)]
pub struct Trie<K, V> {
    root: TrieNode<K, V>,
}

impl<K, V> Default for Trie<K, V> {
    fn default() -> Self {
        Trie {
            root: TrieNode::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Trie<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &TrieNode<K, V> {
        &self.root
    }

    /// Return the node at the end of `keys`, creating the missing nodes along the path.
    pub fn move_to_node(&mut self, keys: &[K]) -> &mut TrieNode<K, V> {
        let mut node = &mut self.root;
        for k in keys {
            node = node.children.entry(k.clone()).or_default();
        }
        node
    }

    /// Return the node at the end of `keys`, if it exists.
    pub fn find(&self, keys: &[K]) -> Option<&TrieNode<K, V>> {
        let mut node = &self.root;
        for k in keys {
            node = node.children.get(k)?;
        }
        Some(node)
    }

    pub fn find_mut(&mut self, keys: &[K]) -> Option<&mut TrieNode<K, V>> {
        let mut node = &mut self.root;
        for k in keys {
            node = node.children.get_mut(k)?;
        }
        Some(node)
    }

    /// Iterate over all values stored at or below the node at the end of `keys`.
    ///
    /// Empty if there is no such node.
    pub fn values_under(&self, keys: &[K]) -> Values<'_, K, V> {
        Values {
            stack: self.find(keys).into_iter().collect(),
        }
    }

    /// Remove the empty nodes along `keys`, deepest first.
    pub fn prune(&mut self, keys: &[K]) {
        prune_path(&mut self.root, keys);
    }

    pub fn clear(&mut self) {
        self.root = TrieNode::default();
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Return whether `node` is empty after pruning the rest of the path.
fn prune_path<K: Eq + Hash, V>(node: &mut TrieNode<K, V>, keys: &[K]) -> bool {
    if let Some((first, rest)) = keys.split_first() {
        if let Some(child) = node.children.get_mut(first) {
            if prune_path(child, rest) {
                node.children.remove(first);
            }
        }
    }
    node.is_empty()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn move_to_node_creates_path() {
        let mut t = Trie::<char, u32>::new();
        assert!(t.is_empty());
        t.move_to_node(&['a', 'b']).set_value(Some(1));
        assert_eq!(t.find(&['a', 'b']).and_then(TrieNode::value), Some(&1));
        assert!(t.find(&['a']).is_some());
        assert!(t.find(&['a']).unwrap().value().is_none());
        assert!(t.find(&['b']).is_none());
        assert!(!t.is_empty());
    }

    #[test]
    fn find_mut() {
        let mut t = Trie::<char, Vec<u32>>::new();
        t.move_to_node(&['x']).value_or_insert_with(Vec::new).push(1);
        t.find_mut(&['x']).unwrap().value_mut().unwrap().push(2);
        assert_eq!(t.find(&['x']).unwrap().value(), Some(&vec![1, 2]));
        assert!(t.find_mut(&['y']).is_none());
    }

    #[test]
    fn values_under() {
        let mut t = Trie::<char, u32>::new();
        t.move_to_node(&['a', 'b']).set_value(Some(1));
        t.move_to_node(&['a', 'c']).set_value(Some(2));
        t.move_to_node(&['a']).set_value(Some(3));
        t.move_to_node(&['d', 'e']).set_value(Some(4));
        let mut values: Vec<_> = t.values_under(&['a']).copied().collect();
        values.sort();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(t.values_under(&[]).count(), 4);
        assert_eq!(t.values_under(&['z']).count(), 0);
        assert_eq!(t.root().children().count(), 2);
    }

    #[test]
    fn prune() {
        let mut t = Trie::<char, u32>::new();
        t.move_to_node(&['a', 'b']).set_value(Some(1));
        t.move_to_node(&['a', 'c']).set_value(Some(2));
        t.find_mut(&['a', 'b']).unwrap().set_value(None);
        t.prune(&['a', 'b']);
        assert!(t.find(&['a', 'b']).is_none());
        assert!(t.find(&['a', 'c']).is_some());
        t.find_mut(&['a', 'c']).unwrap().set_value(None);
        t.prune(&['a', 'c']);
        assert!(t.find(&['a']).is_none());
        assert!(t.is_empty());
    }

    #[test]
    fn prune_keeps_non_empty_nodes() {
        let mut t = Trie::<char, u32>::new();
        t.move_to_node(&['a', 'b']).set_value(Some(1));
        t.prune(&['a', 'b']);
        assert!(t.find(&['a', 'b']).is_some());
        t.prune(&['z']);
        assert!(!t.is_empty());
    }

    #[test]
    fn clear() {
        let mut t = Trie::<char, u32>::new();
        t.move_to_node(&['a']).set_value(Some(1));
        t.clear();
        assert!(t.is_empty());
        assert!(t.find(&['a']).is_none());
    }
}
