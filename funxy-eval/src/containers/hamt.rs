//! A persistent hash array mapped trie (HAMT), fan-out 32, keyed on the
//! low bits of a 32-bit hash with bucket nodes for collisions.
//! Put/Remove/Get/Contains are O(log32 n) with shared structure; iteration
//! order is unspecified but stable within one value.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

const BITS: usize = 5;
const BRANCH: usize = 1 << BITS;
const MASK: u32 = (BRANCH - 1) as u32;

fn hash_of<K: Hash>(key: &K) -> u32 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() as u32
}

#[derive(Debug, Clone)]
enum Node<K, V> {
    Empty,
    Leaf { hash: u32, entries: Vec<(K, V)> },
    Branch(Vec<Arc<Node<K, V>>>),
}

#[derive(Debug, Clone)]
pub struct PMap<K, V> {
    root: Arc<Node<K, V>>,
    size: usize,
}

impl<K: Clone + PartialEq + Hash, V: Clone> Default for PMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + PartialEq + Hash, V: Clone> PMap<K, V> {
    pub fn new() -> Self {
        Self {
            root: Arc::new(Node::Empty),
            size: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = hash_of(key);
        get_in(&self.root, hash, 0, key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = hash_of(&key);
        let (new_root, grew) = insert_in(&self.root, hash, 0, key, value);
        Self {
            root: new_root,
            size: if grew { self.size + 1 } else { self.size },
        }
    }

    pub fn remove(&self, key: &K) -> Self {
        let hash = hash_of(key);
        match remove_in(&self.root, hash, 0, key) {
            Some(new_root) => Self {
                root: new_root,
                size: self.size - 1,
            },
            None => self.clone(),
        }
    }

    pub fn iter(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.size);
        collect(&self.root, &mut out);
        out
    }
}

fn get_in<'a, K: PartialEq, V>(node: &'a Node<K, V>, hash: u32, shift: u32, key: &K) -> Option<&'a V> {
    match node {
        Node::Empty => None,
        Node::Leaf { entries, .. } => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
        Node::Branch(children) => {
            let idx = ((hash >> shift) & MASK) as usize;
            children.get(idx).and_then(|c| get_in(c, hash, shift + BITS as u32, key))
        }
    }
}

fn insert_in<K: Clone + PartialEq + Hash, V: Clone>(
    node: &Arc<Node<K, V>>,
    hash: u32,
    shift: u32,
    key: K,
    value: V,
) -> (Arc<Node<K, V>>, bool) {
    match node.as_ref() {
        Node::Empty => (
            Arc::new(Node::Leaf {
                hash,
                entries: vec![(key, value)],
            }),
            true,
        ),
        Node::Leaf {
            hash: leaf_hash,
            entries,
        } => {
            if *leaf_hash == hash {
                if let Some(pos) = entries.iter().position(|(k, _)| *k == key) {
                    let mut entries = entries.clone();
                    entries[pos] = (key, value);
                    return (Arc::new(Node::Leaf { hash, entries }), false);
                }
                let mut entries = entries.clone();
                entries.push((key, value));
                (Arc::new(Node::Leaf { hash, entries }), true)
            } else {
                // Split into a branch and re-insert both.
                let mut children: Vec<Arc<Node<K, V>>> = vec![Arc::new(Node::Empty); BRANCH];
                let leaf_idx = ((*leaf_hash >> shift) & MASK) as usize;
                children[leaf_idx] = Arc::new(Node::Leaf {
                    hash: *leaf_hash,
                    entries: entries.clone(),
                });
                let branch = Arc::new(Node::Branch(children));
                insert_in(&branch, hash, shift, key, value)
            }
        }
        Node::Branch(children) => {
            let idx = ((hash >> shift) & MASK) as usize;
            let mut children = children.clone();
            let (new_child, grew) =
                insert_in(&children[idx], hash, shift + BITS as u32, key, value);
            children[idx] = new_child;
            (Arc::new(Node::Branch(children)), grew)
        }
    }
}

fn remove_in<K: Clone + PartialEq + Hash, V: Clone>(
    node: &Arc<Node<K, V>>,
    hash: u32,
    shift: u32,
    key: &K,
) -> Option<Arc<Node<K, V>>> {
    match node.as_ref() {
        Node::Empty => None,
        Node::Leaf { hash: h, entries } => {
            if *h != hash || !entries.iter().any(|(k, _)| k == key) {
                return None;
            }
            let remaining: Vec<_> = entries.iter().filter(|(k, _)| k != key).cloned().collect();
            if remaining.is_empty() {
                Some(Arc::new(Node::Empty))
            } else {
                Some(Arc::new(Node::Leaf {
                    hash,
                    entries: remaining,
                }))
            }
        }
        Node::Branch(children) => {
            let idx = ((hash >> shift) & MASK) as usize;
            let new_child = remove_in(&children[idx], hash, shift + BITS as u32, key)?;
            let mut children = children.clone();
            children[idx] = new_child;
            Some(Arc::new(Node::Branch(children)))
        }
    }
}

fn collect<'a, K, V>(node: &'a Node<K, V>, out: &mut Vec<(&'a K, &'a V)>) {
    match node {
        Node::Empty => {}
        Node::Leaf { entries, .. } => out.extend(entries.iter().map(|(k, v)| (k, v))),
        Node::Branch(children) => {
            for child in children {
                collect(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove_roundtrip() {
        let m: PMap<String, i32> = PMap::new();
        let m = m.insert("a".to_string(), 1);
        let m = m.insert("b".to_string(), 2);
        assert_eq!(m.get(&"a".to_string()), Some(&1));
        let m2 = m.remove(&"a".to_string());
        assert_eq!(m2.get(&"a".to_string()), None);
        // Original is untouched (persistence).
        assert_eq!(m.get(&"a".to_string()), Some(&1));
    }

    #[test]
    fn many_keys_are_all_retrievable() {
        let mut m: PMap<i32, i32> = PMap::new();
        for i in 0..500 {
            m = m.insert(i, i * 2);
        }
        assert_eq!(m.len(), 500);
        for i in 0..500 {
            assert_eq!(m.get(&i), Some(&(i * 2)));
        }
    }
}
