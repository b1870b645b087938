//! JSON persistence of committed structures.
//!
//! Linear structures store their values in order; trees store a nested
//! `{data, left, right}` shape with the node count alongside. Parent links
//! are not stored and are rebuilt on load. Conversion to and from the model
//! uses explicit stacks; JSON reading and writing run without a nesting
//! limit on a stack that grows on demand, so a degenerate tree of any depth
//! round-trips.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::engine::Structure;
use crate::error::StructvizError;
use crate::model::{
    BinaryTree, Flavor, HuffmanForest, HuffmanNode, LinkedList, NodeId,
    SearchTree, SequenceList, Stack, TreeArena, Value,
};

/// One node of a persisted pointer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Node value.
    pub data: Value,
    /// Left subtree.
    #[serde(default)]
    pub left: Option<Box<TreeRecord>>,
    /// Right subtree.
    #[serde(default)]
    pub right: Option<Box<TreeRecord>>,
}

impl Drop for TreeRecord {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Self>> =
            self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// One node of a persisted Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanRecord {
    /// Symbol; present on leaves only.
    #[serde(default)]
    pub data: Option<String>,
    /// Weight of the subtree.
    pub weight: u64,
    /// Left subtree.
    #[serde(default)]
    pub left: Option<Box<HuffmanRecord>>,
    /// Right subtree.
    #[serde(default)]
    pub right: Option<Box<HuffmanRecord>>,
}

impl Drop for HuffmanRecord {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Self>> =
            self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// Persisted form of a [`Structure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    /// Stack, bottom to top.
    Stack {
        /// Items.
        items: Vec<Value>,
    },
    /// Sequence list, front to back.
    Sequence {
        /// Items.
        items: Vec<Value>,
    },
    /// Linked list, head to tail.
    LinkedList {
        /// Elements.
        elements: Vec<Value>,
    },
    /// Plain binary tree.
    BinaryTree {
        /// Root node.
        root: Option<Box<TreeRecord>>,
        /// Node count.
        size: usize,
    },
    /// Binary search tree.
    Bst {
        /// Root node.
        root: Option<Box<TreeRecord>>,
        /// Node count.
        size: usize,
    },
    /// AVL tree.
    Avl {
        /// Root node.
        root: Option<Box<TreeRecord>>,
        /// Node count.
        size: usize,
    },
    /// Huffman tree.
    Huffman {
        /// Root node.
        root: Option<Box<HuffmanRecord>>,
        /// Leaf count.
        size: usize,
    },
}

impl Record {
    /// Capture `structure`.
    #[must_use]
    pub fn from_structure(structure: &Structure) -> Self {
        match structure {
            Structure::Stack(s) => Self::Stack {
                items: s.items().to_vec(),
            },
            Structure::Sequence(s) => Self::Sequence {
                items: s.items().to_vec(),
            },
            Structure::Linked(l) => Self::LinkedList {
                elements: l.values(),
            },
            Structure::Binary(t) => Self::BinaryTree {
                root: export_tree(t.arena()),
                size: t.len(),
            },
            Structure::Search(t) => {
                let root = export_tree(t.arena());
                let size = t.len();
                match t.flavor() {
                    Flavor::Bst => Self::Bst { root, size },
                    Flavor::Avl => Self::Avl { root, size },
                }
            }
            Structure::Huffman(f) => Self::Huffman {
                root: export_huffman(f),
                size: f.leaf_count(),
            },
        }
    }

    /// Rebuild the structure, checking the stored size and, for search
    /// trees, the ordering and balance invariants.
    pub fn into_structure(self) -> Result<Structure, StructvizError> {
        let structure = match self {
            Self::Stack { items } => Structure::Stack(Stack::from_items(items)),
            Self::Sequence { items } => {
                Structure::Sequence(SequenceList::from_items(items))
            }
            Self::LinkedList { elements } => {
                Structure::Linked(LinkedList::from_values(&elements))
            }
            Self::BinaryTree { root, size } => {
                let arena = import_tree(root.as_deref(), size)?;
                Structure::Binary(BinaryTree::from_arena(arena))
            }
            Self::Bst { root, size } => {
                let arena = import_tree(root.as_deref(), size)?;
                Structure::Search(SearchTree::from_arena(arena, Flavor::Bst)?)
            }
            Self::Avl { root, size } => {
                let arena = import_tree(root.as_deref(), size)?;
                Structure::Search(SearchTree::from_arena(arena, Flavor::Avl)?)
            }
            Self::Huffman { root, size } => {
                Structure::Huffman(import_huffman(root.as_deref(), size)?)
            }
        };
        Ok(structure)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StructvizError> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::pretty(&mut out);
        self.serialize(serde_stacker::Serializer::new(&mut ser))?;
        String::from_utf8(out).map_err(|e| StructvizError::Record(e.to_string()))
    }

    /// Parse JSON produced by [`to_json`](Self::to_json). Nesting depth is
    /// not limited.
    pub fn from_json(text: &str) -> Result<Self, StructvizError> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let record = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(record)
    }
}

fn export_tree(arena: &TreeArena) -> Option<Box<TreeRecord>> {
    let root = arena.root()?;
    let mut built: Vec<Option<Box<TreeRecord>>> = Vec::new();
    let order = arena.pre_order();
    let mut slot_of = FxHashMap::default();
    for (i, &id) in order.iter().enumerate() {
        let _ = slot_of.insert(id, i);
        built.push(None);
    }
    let take = |id: Option<NodeId>, built: &mut [Option<Box<TreeRecord>>]| {
        id.and_then(|c| slot_of.get(&c).copied())
            .and_then(|i| built.get_mut(i))
            .and_then(Option::take)
    };
    for (i, &id) in order.iter().enumerate().rev() {
        let Some(node) = arena.get(id) else {
            continue;
        };
        let record = TreeRecord {
            data: node.value,
            left: take(node.left, &mut built),
            right: take(node.right, &mut built),
        };
        if let Some(slot) = built.get_mut(i) {
            *slot = Some(Box::new(record));
        }
    }
    take(Some(root), &mut built)
}

fn import_tree(
    root: Option<&TreeRecord>,
    size: usize,
) -> Result<TreeArena, StructvizError> {
    let mut arena = TreeArena::new();
    let mut pending: Vec<(&TreeRecord, Option<(NodeId, bool)>)> =
        root.into_iter().map(|r| (r, None)).collect();
    while let Some((record, parent)) = pending.pop() {
        let id = arena.alloc(record.data);
        match parent {
            None => arena.set_root(Some(id)),
            Some((p, true)) => arena.set_left(p, Some(id)),
            Some((p, false)) => arena.set_right(p, Some(id)),
        }
        if let Some(right) = &record.right {
            pending.push((right, Some((id, false))));
        }
        if let Some(left) = &record.left {
            pending.push((left, Some((id, true))));
        }
    }
    check_size(size, arena.len())?;
    Ok(arena)
}

fn export_huffman(forest: &HuffmanForest) -> Option<Box<HuffmanRecord>> {
    let root = forest.root()?;
    let mut built: Vec<Option<Box<HuffmanRecord>>> = vec![None; forest.len()];
    let mut order = Vec::new();
    let mut stack = vec![root];
    let mut seen = FxHashSet::default();
    while let Some(index) = stack.pop() {
        if !seen.insert(index) {
            continue;
        }
        let Some(node) = forest.node(index) else {
            continue;
        };
        order.push(index);
        stack.extend(node.left);
        stack.extend(node.right);
    }
    for &index in order.iter().rev() {
        let Some(node) = forest.node(index) else {
            continue;
        };
        let mut take = |c: Option<usize>| c.and_then(|c| built.get_mut(c)).and_then(Option::take);
        let record = HuffmanRecord {
            data: node.symbol.clone(),
            weight: node.weight,
            left: take(node.left),
            right: take(node.right),
        };
        if let Some(slot) = built.get_mut(index) {
            *slot = Some(Box::new(record));
        }
    }
    built.get_mut(root).and_then(Option::take)
}

fn import_huffman(
    root: Option<&HuffmanRecord>,
    size: usize,
) -> Result<HuffmanForest, StructvizError> {
    let mut nodes: Vec<HuffmanNode> = Vec::new();
    let mut pending: Vec<(&HuffmanRecord, Option<(usize, bool)>)> =
        root.into_iter().map(|r| (r, None)).collect();
    while let Some((record, parent)) = pending.pop() {
        let index = nodes.len();
        let is_leaf = record.left.is_none() && record.right.is_none();
        if is_leaf && record.data.is_none() {
            return Err(StructvizError::Record(format!(
                "Huffman leaf of weight {} has no symbol",
                record.weight
            )));
        }
        nodes.push(HuffmanNode {
            symbol: if is_leaf { record.data.clone() } else { None },
            weight: record.weight,
            parent: parent.map(|(p, _)| p),
            left: None,
            right: None,
        });
        if let Some((p, is_left)) = parent {
            if let Some(node) = nodes.get_mut(p) {
                if is_left {
                    node.left = Some(index);
                } else {
                    node.right = Some(index);
                }
            }
        }
        if let Some(right) = &record.right {
            pending.push((right, Some((index, false))));
        }
        if let Some(left) = &record.left {
            pending.push((left, Some((index, true))));
        }
    }
    let forest = HuffmanForest::from_tree(nodes, root.map(|_| 0));
    check_size(size, forest.leaf_count())?;
    Ok(forest)
}

fn check_size(stored: usize, actual: usize) -> Result<(), StructvizError> {
    if stored == actual {
        Ok(())
    } else {
        Err(StructvizError::Record(format!(
            "size {stored} does not match {actual} stored nodes"
        )))
    }
}
