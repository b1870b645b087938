//! Node and arena model for every animated structure.
//!
//! Pointer trees (plain binary tree, BST, AVL) live in a [`TreeArena`]
//! whose child links own their nodes and whose parent links are plain
//! indices. The Huffman forest is an append-only arena addressed by
//! `usize`. Linear structures are thin wrappers over `Vec` or a slot
//! arena.

mod arena;
mod binary_tree;
mod huffman;
mod linear;
mod linked;
mod search_tree;

pub use arena::{NodeId, TreeArena, TreeNode};
pub use binary_tree::{BinaryTree, Side};
pub use huffman::{HuffmanForest, HuffmanNode, Merge};
pub use linear::{SequenceList, Stack};
pub use linked::{LinkNode, LinkedList};
pub use search_tree::{Flavor, Removed, Rotation, RotationKind, SearchTree};

/// Element type stored by every value-carrying structure.
pub type Value = i64;
