//! Slot arena backing every pointer-linked binary tree.
//!
//! Child links are the owning edges: a node lives exactly as long as some
//! parent (or the root slot) refers to it, and detaching a node releases its
//! slot. Parent links are observer indices used for rotations and upward
//! walks and never decide lifetime.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashSet;

use super::Value;

/// Stable handle of a node inside a [`TreeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Slot index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tree node. `height` counts levels (leaf = 1, absent child = 0) and is
/// kept current for every flavor of tree, not just AVL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Stored value.
    pub value: Value,
    /// Owning link to the left child.
    pub left: Option<NodeId>,
    /// Owning link to the right child.
    pub right: Option<NodeId>,
    /// Back-reference to the parent (non-owning).
    pub parent: Option<NodeId>,
    /// Height of the subtree rooted here.
    pub height: i32,
}

impl TreeNode {
    fn leaf(value: Value) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent: None,
            height: 1,
        }
    }
}

/// Index-addressed node storage plus the root link.
#[derive(Debug, Clone, Default)]
pub struct TreeArena {
    slots: Vec<Option<TreeNode>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl TreeArena {
    /// Empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node, if any.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow a live node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Value stored at `id`.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<Value> {
        self.get(id).map(|n| n.value)
    }

    /// Left child of `id`.
    #[must_use]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.left)
    }

    /// Right child of `id`.
    #[must_use]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.right)
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Height of an optional subtree (absent = 0).
    #[must_use]
    pub fn height(&self, id: Option<NodeId>) -> i32 {
        id.and_then(|id| self.get(id)).map_or(0, |n| n.height)
    }

    /// `height(left) - height(right)` at `id`.
    #[must_use]
    pub fn balance_factor(&self, id: NodeId) -> i32 {
        self.height(self.left(id)) - self.height(self.right(id))
    }

    /// Allocate a detached leaf.
    pub(crate) fn alloc(&mut self, value: Value) -> NodeId {
        self.len += 1;
        if let Some(id) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(id.index()) {
                *slot = Some(TreeNode::leaf(value));
                return id;
            }
        }
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(TreeNode::leaf(value)));
        id
    }

    /// Release a single slot. Links pointing at it must already be cut.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<TreeNode> {
        let node = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id);
        self.len -= 1;
        if self.root == Some(id) {
            self.root = None;
        }
        Some(node)
    }

    /// Detach `id` from its parent and release it with all descendants.
    /// Returns the number of released nodes.
    pub(crate) fn release_subtree(&mut self, id: NodeId) -> usize {
        let parent = self.parent(id);
        self.replace_child(parent, id, None);
        let doomed = self.pre_order_from(id);
        for node in &doomed {
            let _ = self.release(*node);
        }
        doomed.len()
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
        if let Some(node) = root.and_then(|r| self.get_mut(r)) {
            node.parent = None;
        }
    }

    pub(crate) fn set_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(node) = self.get_mut(parent) {
            node.left = child;
        }
        if let Some(node) = child.and_then(|c| self.get_mut(c)) {
            node.parent = Some(parent);
        }
    }

    pub(crate) fn set_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(node) = self.get_mut(parent) {
            node.right = child;
        }
        if let Some(node) = child.and_then(|c| self.get_mut(c)) {
            node.parent = Some(parent);
        }
    }

    /// Put `new` where `old` hangs under `parent` (or at the root when
    /// `parent` is `None`) and re-point `new`'s parent link.
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            None => self.root = new,
            Some(p) => {
                if let Some(node) = self.get_mut(p) {
                    if node.left == Some(old) {
                        node.left = new;
                    } else if node.right == Some(old) {
                        node.right = new;
                    }
                }
            }
        }
        if let Some(node) = new.and_then(|n| self.get_mut(n)) {
            node.parent = parent;
        }
    }

    /// Recompute the height of one node from its children.
    pub(crate) fn update_height(&mut self, id: NodeId) {
        let h = 1 + self
            .height(self.left(id))
            .max(self.height(self.right(id)));
        if let Some(node) = self.get_mut(id) {
            node.height = h;
        }
    }

    /// Recompute every height bottom-up.
    pub(crate) fn refresh_heights(&mut self) {
        for id in self.pre_order().into_iter().rev() {
            self.update_height(id);
        }
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Node ids in pre-order (node, left, right).
    #[must_use]
    pub fn pre_order(&self) -> Vec<NodeId> {
        self.root.map_or_else(Vec::new, |r| self.pre_order_from(r))
    }

    /// Pre-order of the subtree rooted at `start`. A node reachable twice
    /// is emitted once.
    #[must_use]
    pub fn pre_order_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len);
        let mut seen = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(node) = self.get(id) else {
                continue;
            };
            out.push(id);
            if let Some(r) = node.right {
                stack.push(r);
            }
            if let Some(l) = node.left {
                stack.push(l);
            }
        }
        out
    }

    /// Node ids in symmetric order.
    #[must_use]
    pub fn in_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len);
        let mut seen = FxHashSet::default();
        let mut stack = Vec::new();
        let mut cursor = self.root;
        loop {
            while let Some(id) = cursor {
                if !seen.insert(id) {
                    break;
                }
                stack.push(id);
                cursor = self.left(id);
            }
            let Some(id) = stack.pop() else {
                break;
            };
            out.push(id);
            cursor = self.right(id);
        }
        out
    }

    /// Node ids in breadth-first order; the position of a node in this list
    /// is its level-order index.
    #[must_use]
    pub fn level_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len);
        let mut seen = FxHashSet::default();
        let mut queue: VecDeque<NodeId> = self.root.into_iter().collect();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            let Some(node) = self.get(id) else {
                continue;
            };
            out.push(id);
            queue.extend(node.left);
            queue.extend(node.right);
        }
        out
    }

    /// Values in symmetric order.
    #[must_use]
    pub fn in_order_values(&self) -> Vec<Value> {
        self.in_order()
            .into_iter()
            .filter_map(|id| self.value(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds   2
    ///         / \
    ///        1   3
    fn small() -> (TreeArena, [NodeId; 3]) {
        let mut arena = TreeArena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        let c = arena.alloc(3);
        arena.set_root(Some(b));
        arena.set_left(b, Some(a));
        arena.set_right(b, Some(c));
        arena.refresh_heights();
        (arena, [a, b, c])
    }

    #[test]
    fn traversal_orders() {
        let (arena, [a, b, c]) = small();
        assert_eq!(arena.pre_order(), vec![b, a, c]);
        assert_eq!(arena.in_order(), vec![a, b, c]);
        assert_eq!(arena.level_order(), vec![b, a, c]);
        assert_eq!(arena.in_order_values(), vec![1, 2, 3]);
    }

    #[test]
    fn heights_and_parents() {
        let (arena, [a, b, _]) = small();
        assert_eq!(arena.height(Some(b)), 2);
        assert_eq!(arena.height(None), 0);
        assert_eq!(arena.parent(a), Some(b));
        assert_eq!(arena.balance_factor(b), 0);
    }

    #[test]
    fn release_subtree_frees_slots_for_reuse() {
        let (mut arena, [a, b, _]) = small();
        assert_eq!(arena.release_subtree(a), 1);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.left(b), None);
        let reused = arena.alloc(9);
        assert_eq!(reused, a);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn releasing_root_subtree_empties_tree() {
        let (mut arena, [_, b, _]) = small();
        assert_eq!(arena.release_subtree(b), 3);
        assert!(arena.is_empty());
        assert_eq!(arena.root(), None);
    }

    #[test]
    fn traversals_survive_a_cycle() {
        let (mut arena, [a, b, _]) = small();
        // Corrupt: a's left points back at the root.
        if let Some(node) = arena.get_mut(a) {
            node.left = Some(b);
        }
        assert_eq!(arena.pre_order().len(), 3);
        assert_eq!(arena.in_order().len(), 3);
        assert_eq!(arena.level_order().len(), 3);
    }
}
