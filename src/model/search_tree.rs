//! Binary search tree with an optional AVL balancing discipline.
//!
//! Raw operations (`insert_unbalanced`, `delete_unbalanced`) keep the search
//! order and heights but never rotate. The animated path commits a raw
//! operation and then runs [`SearchTree::rebalance_from`]; the immediate
//! path does both in one call.

use std::cmp::Ordering;

use super::arena::{NodeId, TreeArena};
use super::Value;
use crate::error::StructvizError;

/// Balancing discipline applied after mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Plain binary search tree.
    Bst,
    /// Height-balanced AVL tree.
    Avl,
}

/// Shape of an imbalance and the rotations that repair it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationKind {
    /// Single right rotation.
    LeftLeft,
    /// Left rotation on the left child, then right rotation.
    LeftRight,
    /// Single left rotation.
    RightRight,
    /// Right rotation on the right child, then left rotation.
    RightLeft,
}

/// One repair performed by the rebalance walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Which case was repaired.
    pub kind: RotationKind,
    /// Value held by the node that was out of balance.
    pub pivot: Value,
    /// Root of the repaired subtree.
    pub new_root: NodeId,
}

/// Result of a raw delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    /// The value that left the tree.
    pub value: Value,
    /// Parent of the node whose slot was physically released; the upward
    /// rebalance walk starts here.
    pub parent: Option<NodeId>,
}

/// Ordered binary tree over [`Value`]s.
#[derive(Debug, Clone)]
pub struct SearchTree {
    arena: TreeArena,
    flavor: Flavor,
}

impl SearchTree {
    /// Empty tree of the given flavor.
    #[must_use]
    pub fn new(flavor: Flavor) -> Self {
        Self {
            arena: TreeArena::new(),
            flavor,
        }
    }

    /// Adopt a pre-built arena after checking the search order (and, for
    /// AVL, the balance).
    pub fn from_arena(
        mut arena: TreeArena,
        flavor: Flavor,
    ) -> Result<Self, StructvizError> {
        arena.refresh_heights();
        if arena.in_order().len() != arena.len() {
            return Err(StructvizError::InvalidArgument(
                "tree has unreachable or shared nodes".to_owned(),
            ));
        }
        let values = arena.in_order_values();
        if values.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StructvizError::InvalidArgument(
                "tree violates the search order".to_owned(),
            ));
        }
        let tree = Self { arena, flavor };
        if flavor == Flavor::Avl && !tree.is_balanced() {
            return Err(StructvizError::InvalidArgument(
                "tree violates the AVL balance".to_owned(),
            ));
        }
        Ok(tree)
    }

    /// Balancing discipline.
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Underlying node storage.
    #[must_use]
    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.arena.root()
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

    /// Replace the contents with `values` inserted in order.
    pub fn build(&mut self, values: &[Value]) {
        self.clear();
        for &v in values {
            let _ = self.insert(v);
        }
    }

    /// Values in symmetric order.
    #[must_use]
    pub fn in_order_values(&self) -> Vec<Value> {
        self.arena.in_order_values()
    }

    /// Find the node holding `value`. A miss is a normal outcome.
    #[must_use]
    pub fn search(&self, value: Value) -> Option<NodeId> {
        let mut cursor = self.arena.root();
        let mut steps = 0;
        while let Some(id) = cursor {
            steps += 1;
            if steps > self.arena.len() {
                return None;
            }
            let node = self.arena.get(id)?;
            cursor = match value.cmp(&node.value) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Insert and, for AVL, rebalance. `None` means the value was already
    /// present.
    pub fn insert(&mut self, value: Value) -> Option<NodeId> {
        let id = self.insert_unbalanced(value)?;
        if self.flavor == Flavor::Avl {
            let _ = self.rebalance_from(Some(id));
        }
        Some(id)
    }

    /// Attach a new leaf in search order without rotating.
    pub fn insert_unbalanced(&mut self, value: Value) -> Option<NodeId> {
        let Some(mut cursor) = self.arena.root() else {
            let id = self.arena.alloc(value);
            self.arena.set_root(Some(id));
            return Some(id);
        };
        for _ in 0..=self.arena.len() {
            let (held, left, right) = {
                let node = self.arena.get(cursor)?;
                (node.value, node.left, node.right)
            };
            match value.cmp(&held) {
                Ordering::Equal => return None,
                Ordering::Less => match left {
                    Some(next) => cursor = next,
                    None => {
                        let id = self.arena.alloc(value);
                        self.arena.set_left(cursor, Some(id));
                        self.refresh_upward(Some(cursor));
                        return Some(id);
                    }
                },
                Ordering::Greater => match right {
                    Some(next) => cursor = next,
                    None => {
                        let id = self.arena.alloc(value);
                        self.arena.set_right(cursor, Some(id));
                        self.refresh_upward(Some(cursor));
                        return Some(id);
                    }
                },
            }
        }
        None
    }

    /// Delete and, for AVL, rebalance. Returns whether `value` was present.
    pub fn delete(&mut self, value: Value) -> bool {
        let Some(removed) = self.delete_unbalanced(value) else {
            return false;
        };
        if self.flavor == Flavor::Avl {
            let _ = self.rebalance_from(removed.parent);
        }
        true
    }

    /// Remove `value` without rotating.
    ///
    /// Two-child nodes take their in-order successor's value and the
    /// successor (which has at most one child) is spliced out instead.
    pub fn delete_unbalanced(&mut self, value: Value) -> Option<Removed> {
        let target = self.search(value)?;
        let spliced = match (self.arena.left(target), self.arena.right(target))
        {
            (Some(_), Some(right)) => {
                let successor = self.leftmost(right);
                let successor_value = self.arena.value(successor)?;
                if let Some(node) = self.arena.get_mut(target) {
                    node.value = successor_value;
                }
                successor
            }
            _ => target,
        };
        let parent = self.splice_out(spliced);
        self.refresh_upward(parent);
        Some(Removed { value, parent })
    }

    /// Walk upward from `start`, refreshing heights and repairing every
    /// node whose balance factor leaves `[-1, 1]`.
    ///
    /// After each rotation the walk resumes from the rotated subtree's new
    /// root rather than stopping, so a single call also settles the
    /// multi-rotation cascades that deletions can cause.
    pub fn rebalance_from(&mut self, start: Option<NodeId>) -> Vec<Rotation> {
        let mut rotations = Vec::new();
        let limit = 2 * self.arena.len() + 2;
        let mut cursor = start;
        let mut steps = 0;
        while let Some(id) = cursor {
            steps += 1;
            if steps > limit {
                log::warn!("rebalance walk exceeded {limit} steps; stopping");
                break;
            }
            self.arena.update_height(id);
            let bf = self.arena.balance_factor(id);
            let repaired = if bf > 1 {
                self.repair_left_heavy(id)
            } else if bf < -1 {
                self.repair_right_heavy(id)
            } else {
                None
            };
            cursor = match repaired {
                Some(rotation) => {
                    log::debug!(
                        "rebalance: {:?} at {}",
                        rotation.kind,
                        rotation.pivot
                    );
                    rotations.push(rotation);
                    Some(rotation.new_root)
                }
                None => self.arena.parent(id),
            };
        }
        rotations
    }

    fn repair_left_heavy(&mut self, id: NodeId) -> Option<Rotation> {
        let left = self.arena.left(id)?;
        let pivot = self.arena.value(id)?;
        let kind = if self.arena.balance_factor(left) >= 0 {
            RotationKind::LeftLeft
        } else {
            RotationKind::LeftRight
        };
        if kind == RotationKind::LeftRight {
            let _ = self.rotate_left(left)?;
        }
        let new_root = self.rotate_right(id)?;
        Some(Rotation {
            kind,
            pivot,
            new_root,
        })
    }

    fn repair_right_heavy(&mut self, id: NodeId) -> Option<Rotation> {
        let right = self.arena.right(id)?;
        let pivot = self.arena.value(id)?;
        let kind = if self.arena.balance_factor(right) <= 0 {
            RotationKind::RightRight
        } else {
            RotationKind::RightLeft
        };
        if kind == RotationKind::RightLeft {
            let _ = self.rotate_right(right)?;
        }
        let new_root = self.rotate_left(id)?;
        Some(Rotation {
            kind,
            pivot,
            new_root,
        })
    }

    /// Rotate the subtree at `id` to the left; its right child becomes the
    /// local root, which is returned.
    pub fn rotate_left(&mut self, id: NodeId) -> Option<NodeId> {
        let pivot = self.arena.right(id)?;
        let inner = self.arena.left(pivot);
        let parent = self.arena.parent(id);
        self.arena.replace_child(parent, id, Some(pivot));
        self.arena.set_right(id, inner);
        self.arena.set_left(pivot, Some(id));
        self.arena.update_height(id);
        self.arena.update_height(pivot);
        Some(pivot)
    }

    /// Rotate the subtree at `id` to the right; its left child becomes the
    /// local root, which is returned.
    pub fn rotate_right(&mut self, id: NodeId) -> Option<NodeId> {
        let pivot = self.arena.left(id)?;
        let inner = self.arena.right(pivot);
        let parent = self.arena.parent(id);
        self.arena.replace_child(parent, id, Some(pivot));
        self.arena.set_left(id, inner);
        self.arena.set_right(pivot, Some(id));
        self.arena.update_height(id);
        self.arena.update_height(pivot);
        Some(pivot)
    }

    /// Whether stored heights are exact and every balance factor lies in
    /// `[-1, 1]`.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.arena.pre_order().into_iter().all(|id| {
            let Some(node) = self.arena.get(id) else {
                return false;
            };
            let (lh, rh) = (
                self.arena.height(node.left),
                self.arena.height(node.right),
            );
            node.height == 1 + lh.max(rh) && (lh - rh).abs() <= 1
        })
    }

    fn leftmost(&self, start: NodeId) -> NodeId {
        let mut cursor = start;
        for _ in 0..self.arena.len() {
            match self.arena.left(cursor) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        cursor
    }

    /// Unlink a node with at most one child, hoisting that child into its
    /// place. Returns the former parent.
    fn splice_out(&mut self, id: NodeId) -> Option<NodeId> {
        let child = self.arena.left(id).or_else(|| self.arena.right(id));
        let parent = self.arena.parent(id);
        if let Some(node) = self.arena.get_mut(id) {
            node.left = None;
            node.right = None;
        }
        self.arena.replace_child(parent, id, child);
        let _ = self.arena.release(id);
        parent
    }

    fn refresh_upward(&mut self, start: Option<NodeId>) {
        let mut cursor = start;
        for _ in 0..=self.arena.len() {
            let Some(id) = cursor else {
                break;
            };
            self.arena.update_height(id);
            cursor = self.arena.parent(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bst(values: &[Value]) -> SearchTree {
        let mut tree = SearchTree::new(Flavor::Bst);
        tree.build(values);
        tree
    }

    fn avl(values: &[Value]) -> SearchTree {
        let mut tree = SearchTree::new(Flavor::Avl);
        tree.build(values);
        tree
    }

    #[test]
    fn insert_orders_and_ignores_duplicates() {
        let mut tree = bst(&[50, 30, 70, 20, 40]);
        assert_eq!(tree.insert(30), None);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.in_order_values(), vec![20, 30, 40, 50, 70]);
    }

    #[test]
    fn search_hits_and_misses() {
        let tree = bst(&[50, 30, 70]);
        let hit = tree.search(70);
        assert_eq!(hit.and_then(|id| tree.arena().value(id)), Some(70));
        assert_eq!(tree.search(65), None);
    }

    #[test]
    fn delete_two_child_node_uses_successor() {
        let mut tree = bst(&[50, 30, 70, 20, 40]);
        assert!(tree.delete(30));
        assert_eq!(tree.in_order_values(), vec![20, 40, 50, 70]);
        assert!(!tree.delete(30));
    }

    #[test]
    fn delete_leaf_one_child_and_root() {
        let mut tree = bst(&[50, 30, 70, 60]);
        assert!(tree.delete(60));
        assert!(tree.delete(70));
        assert!(tree.delete(50));
        assert_eq!(tree.in_order_values(), vec![30]);
        let root = tree.root();
        assert_eq!(root.and_then(|r| tree.arena().parent(r)), None);
        assert!(tree.delete(30));
        assert!(tree.is_empty());
    }

    #[test]
    fn one_child_splice_relinks_parent() {
        let mut tree = bst(&[50, 30, 20]);
        assert!(tree.delete(30));
        let child = tree.search(20);
        let root = tree.search(50);
        assert_eq!(child.and_then(|c| tree.arena().parent(c)), root);
    }

    #[test]
    fn avl_single_and_double_rotations() {
        for values in [[1, 2, 3], [3, 2, 1], [3, 1, 2], [1, 3, 2]] {
            let tree = avl(&values);
            assert!(tree.is_balanced(), "{values:?}");
            let root = tree.root().and_then(|r| tree.arena().value(r));
            assert_eq!(root, Some(2), "{values:?}");
        }
    }

    #[test]
    fn raw_insert_then_walk_reports_rotation() {
        let mut tree = avl(&[30, 20]);
        let id = tree.insert_unbalanced(10);
        assert!(!tree.is_balanced());
        let rotations = tree.rebalance_from(id);
        assert_eq!(rotations.len(), 1);
        assert_eq!(rotations[0].kind, RotationKind::LeftLeft);
        assert_eq!(rotations[0].pivot, 30);
        assert!(tree.is_balanced());
    }

    #[test]
    fn left_right_case_is_classified() {
        let mut tree = avl(&[30, 10]);
        let id = tree.insert_unbalanced(20);
        let rotations = tree.rebalance_from(id);
        assert_eq!(rotations[0].kind, RotationKind::LeftRight);
    }

    #[test]
    fn avl_delete_keeps_balance() {
        let mut tree = avl(&(1..=32).collect::<Vec<_>>());
        for v in [1, 2, 3, 4, 5, 6, 7, 8, 16, 24] {
            assert!(tree.delete(v));
            assert!(tree.is_balanced(), "after deleting {v}");
        }
        assert_eq!(tree.len(), 22);
    }

    #[test]
    fn sequential_inserts_stay_logarithmic() {
        let tree = avl(&(0..1000).collect::<Vec<_>>());
        assert!(tree.is_balanced());
        // 1.44 * log2(1001) is about 14.4
        assert!(tree.arena().height(tree.root()) <= 15);
    }

    #[test]
    fn from_arena_rejects_misordered_tree() {
        let mut arena = TreeArena::new();
        let a = arena.alloc(5);
        let b = arena.alloc(9);
        arena.set_root(Some(a));
        arena.set_left(a, Some(b));
        assert!(SearchTree::from_arena(arena, Flavor::Bst).is_err());
    }

    #[test]
    fn from_arena_rejects_unbalanced_avl() {
        let tree = bst(&[1, 2, 3]);
        let arena = tree.arena().clone();
        assert!(SearchTree::from_arena(arena.clone(), Flavor::Bst).is_ok());
        assert!(SearchTree::from_arena(arena, Flavor::Avl).is_err());
    }
}
