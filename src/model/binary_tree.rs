//! Plain (unordered) binary tree addressed by level-order index.

use std::fmt;
use std::str::FromStr;

use super::arena::{NodeId, TreeArena};
use super::Value;
use crate::error::StructvizError;

/// Which child slot of a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left child.
    Left,
    /// Right child.
    Right,
}

impl FromStr for Side {
    type Err = StructvizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(Self::Left),
            "R" | "r" => Ok(Self::Right),
            other => Err(StructvizError::InvalidArgument(format!(
                "side must be L or R, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "L",
            Self::Right => "R",
        })
    }
}

/// Binary tree without ordering; nodes are named by their breadth-first
/// position (root = 0).
#[derive(Debug, Clone, Default)]
pub struct BinaryTree {
    arena: TreeArena,
}

impl BinaryTree {
    /// Empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a pre-built arena.
    #[must_use]
    pub fn from_arena(mut arena: TreeArena) -> Self {
        arena.refresh_heights();
        Self { arena }
    }

    /// Complete tree filled in level order from `values`.
    #[must_use]
    pub fn complete(values: &[Value]) -> Self {
        let mut arena = TreeArena::new();
        let ids: Vec<NodeId> = values.iter().map(|&v| arena.alloc(v)).collect();
        arena.set_root(ids.first().copied());
        for (i, &id) in ids.iter().enumerate() {
            arena.set_left(id, ids.get(2 * i + 1).copied());
            arena.set_right(id, ids.get(2 * i + 2).copied());
        }
        Self::from_arena(arena)
    }

    /// Underlying node storage.
    #[must_use]
    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.arena.clear();
    }

    /// Node at a level-order index.
    #[must_use]
    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        self.arena.level_order().get(index).copied()
    }

    /// Check that `insert(parent_index, _, side)` would succeed.
    pub fn check_insert(
        &self,
        parent_index: usize,
        side: Side,
    ) -> Result<(), StructvizError> {
        if self.arena.is_empty() {
            return if parent_index == 0 {
                Ok(())
            } else {
                Err(StructvizError::IndexOutOfRange {
                    index: parent_index,
                    len: 0,
                })
            };
        }
        let parent = self.node_at(parent_index).ok_or(
            StructvizError::IndexOutOfRange {
                index: parent_index,
                len: self.len(),
            },
        )?;
        let occupied = match side {
            Side::Left => self.arena.left(parent),
            Side::Right => self.arena.right(parent),
        };
        if occupied.is_some() {
            return Err(StructvizError::InvalidArgument(format!(
                "node {parent_index} already has a {} child",
                match side {
                    Side::Left => "left",
                    Side::Right => "right",
                }
            )));
        }
        Ok(())
    }

    /// Attach a leaf under the node at `parent_index`. On an empty tree the
    /// only valid address is 0, which creates the root.
    pub fn insert(
        &mut self,
        parent_index: usize,
        value: Value,
        side: Side,
    ) -> Result<NodeId, StructvizError> {
        self.check_insert(parent_index, side)?;
        let parent = self.node_at(parent_index);
        let id = self.arena.alloc(value);
        match (parent, side) {
            (None, _) => self.arena.set_root(Some(id)),
            (Some(p), Side::Left) => self.arena.set_left(p, Some(id)),
            (Some(p), Side::Right) => self.arena.set_right(p, Some(id)),
        }
        self.arena.refresh_heights();
        Ok(id)
    }

    /// Check that `remove(index)` would succeed.
    pub fn check_remove(&self, index: usize) -> Result<NodeId, StructvizError> {
        self.node_at(index).ok_or(StructvizError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Detach and drop the subtree rooted at the node at `index`. Returns
    /// the number of nodes removed.
    pub fn remove(&mut self, index: usize) -> Result<usize, StructvizError> {
        let id = self.check_remove(index)?;
        let removed = self.arena.release_subtree(id);
        self.arena.refresh_heights();
        Ok(removed)
    }

    /// Values in level order.
    #[must_use]
    pub fn level_order_values(&self) -> Vec<Value> {
        self.arena
            .level_order()
            .into_iter()
            .filter_map(|id| self.arena.value(id))
            .collect()
    }
}
