//! The closed set of structures an engine can own, and the dispatch from
//! requests to mutations and choreographies.

use std::fmt;
use std::str::FromStr;

use super::command::{BuildInput, Mutation, Outcome, Request};
use crate::animation::{
    Choreography, ElementOp, HuffmanBuildOp, LinkedInsertOp, LinkedRemoveOp,
    OpKind, PathWalkOp, SequenceInsertOp, SequenceRemoveOp, WalkMode,
};
use crate::error::StructvizError;
use crate::layout::{
    layout_forest, layout_linked, layout_sequence, layout_stack, layout_tree,
    Layout, Morph, NodeKey,
};
use crate::model::{
    BinaryTree, Flavor, HuffmanForest, LinkedList, NodeId, SearchTree,
    SequenceList, Stack, Value,
};
use crate::options::{LayoutOptions, Options};

/// Which structure an engine animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// LIFO stack.
    Stack,
    /// Array-backed list.
    Sequence,
    /// Doubly linked list.
    LinkedList,
    /// Unordered binary tree.
    BinaryTree,
    /// Binary search tree.
    Bst,
    /// Self-balancing search tree.
    Avl,
    /// Huffman coding tree.
    Huffman,
}

impl StructureKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Stack,
        Self::Sequence,
        Self::LinkedList,
        Self::BinaryTree,
        Self::Bst,
        Self::Avl,
        Self::Huffman,
    ];

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Sequence => "sequence list",
            Self::LinkedList => "linked list",
            Self::BinaryTree => "binary tree",
            Self::Bst => "binary search tree",
            Self::Avl => "AVL tree",
            Self::Huffman => "Huffman tree",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StructureKind {
    type Err = StructvizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stack" => Ok(Self::Stack),
            "sequence" | "list" | "sequence-list" => Ok(Self::Sequence),
            "linked" | "linked-list" => Ok(Self::LinkedList),
            "binary" | "binary-tree" => Ok(Self::BinaryTree),
            "bst" => Ok(Self::Bst),
            "avl" => Ok(Self::Avl),
            "huffman" => Ok(Self::Huffman),
            other => Err(StructvizError::InvalidArgument(format!(
                "unknown structure '{other}'"
            ))),
        }
    }
}

/// The model owned by an engine.
#[derive(Debug, Clone)]
pub enum Structure {
    /// LIFO stack.
    Stack(Stack),
    /// Array-backed list.
    Sequence(SequenceList),
    /// Doubly linked list.
    Linked(LinkedList),
    /// Unordered binary tree.
    Binary(BinaryTree),
    /// BST or AVL tree, by flavor.
    Search(SearchTree),
    /// Huffman forest (a single tree once built).
    Huffman(HuffmanForest),
}

/// A request checked against the current model.
#[derive(Debug, Clone)]
pub(crate) enum Resolved {
    /// Change the model.
    Mutate(Mutation),
    /// Look a value up without changing anything.
    Search(Value),
    /// Reduce these Huffman leaves into a tree.
    Huffman(HuffmanForest),
}

/// How a resolved request runs when animation is on.
#[derive(Debug)]
pub(crate) enum Plan {
    /// Apply at once; nothing to animate.
    Instant(Mutation),
    /// Animate, optionally committing `upfront` before the first frame.
    Animate {
        upfront: Option<Mutation>,
        op: Box<dyn Choreography>,
    },
}

/// Result of applying one mutation.
#[derive(Debug, Clone)]
pub(crate) struct Applied {
    pub(crate) outcome: Outcome,
    /// Node movement caused by AVL rotations.
    pub(crate) morph: Option<Morph>,
    /// Node created by the mutation.
    pub(crate) touched: Option<NodeKey>,
}

impl Applied {
    fn plain(outcome: Outcome) -> Self {
        Self {
            outcome,
            morph: None,
            touched: None,
        }
    }

    fn touching(outcome: Outcome, key: NodeKey) -> Self {
        Self {
            outcome,
            morph: None,
            touched: Some(key),
        }
    }
}

impl Structure {
    /// Empty structure of `kind`.
    #[must_use]
    pub fn new(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Stack => Self::Stack(Stack::new()),
            StructureKind::Sequence => Self::Sequence(SequenceList::new()),
            StructureKind::LinkedList => Self::Linked(LinkedList::new()),
            StructureKind::BinaryTree => Self::Binary(BinaryTree::new()),
            StructureKind::Bst => Self::Search(SearchTree::new(Flavor::Bst)),
            StructureKind::Avl => Self::Search(SearchTree::new(Flavor::Avl)),
            StructureKind::Huffman => Self::Huffman(HuffmanForest::new()),
        }
    }

    /// Kind of this structure.
    #[must_use]
    pub fn kind(&self) -> StructureKind {
        match self {
            Self::Stack(_) => StructureKind::Stack,
            Self::Sequence(_) => StructureKind::Sequence,
            Self::Linked(_) => StructureKind::LinkedList,
            Self::Binary(_) => StructureKind::BinaryTree,
            Self::Search(tree) => match tree.flavor() {
                Flavor::Bst => StructureKind::Bst,
                Flavor::Avl => StructureKind::Avl,
            },
            Self::Huffman(_) => StructureKind::Huffman,
        }
    }

    /// Logical size: elements, tree nodes, or Huffman leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Stack(s) => s.len(),
            Self::Sequence(s) => s.len(),
            Self::Linked(l) => l.len(),
            Self::Binary(t) => t.len(),
            Self::Search(t) => t.len(),
            Self::Huffman(f) => f.leaf_count(),
        }
    }

    /// Whether the structure holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in the structure's natural order: bottom to top, front to
    /// back, level order for plain trees, in order for search trees. A
    /// Huffman tree yields its leaf weights.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        match self {
            Self::Stack(s) => s.items().to_vec(),
            Self::Sequence(s) => s.items().to_vec(),
            Self::Linked(l) => l.values(),
            Self::Binary(t) => t.level_order_values(),
            Self::Search(t) => t.in_order_values(),
            Self::Huffman(f) => f
                .nodes()
                .iter()
                .filter(|n| n.is_leaf())
                .filter_map(|n| Value::try_from(n.weight).ok())
                .collect(),
        }
    }

    /// The search tree, for BST and AVL structures.
    #[must_use]
    pub fn as_search_tree(&self) -> Option<&SearchTree> {
        match self {
            Self::Search(tree) => Some(tree),
            _ => None,
        }
    }

    /// The forest, for Huffman structures.
    #[must_use]
    pub fn as_huffman(&self) -> Option<&HuffmanForest> {
        match self {
            Self::Huffman(forest) => Some(forest),
            _ => None,
        }
    }

    /// Resting layout of the committed model.
    #[must_use]
    pub fn layout(&self, opts: &LayoutOptions) -> Layout {
        match self {
            Self::Stack(s) => layout_stack(s, opts),
            Self::Sequence(s) => layout_sequence(s, opts),
            Self::Linked(l) => layout_linked(l, opts),
            Self::Binary(t) => layout_tree(t.arena(), opts),
            Self::Search(t) => layout_tree(t.arena(), opts),
            Self::Huffman(f) => layout_forest(f, &[], opts),
        }
    }

    fn unsupported(&self, operation: &'static str) -> StructvizError {
        StructvizError::Unsupported {
            operation,
            structure: self.kind().name(),
        }
    }

    /// Validate `request` against the current model without changing it.
    pub(crate) fn resolve(
        &self,
        request: &Request,
    ) -> Result<Resolved, StructvizError> {
        let mutation = match (self, request) {
            (_, Request::Clear) => Mutation::Clear,
            (Self::Huffman(_), Request::Build(BuildInput::Weights(weights))) => {
                return HuffmanForest::from_weights(weights).map(Resolved::Huffman);
            }
            (Self::Huffman(_), Request::Build(BuildInput::Values(_))) => {
                return Err(StructvizError::InvalidArgument(
                    "Huffman build takes key:weight pairs".to_owned(),
                ));
            }
            (_, Request::Build(BuildInput::Weights(_))) => {
                return Err(StructvizError::InvalidArgument(format!(
                    "{} build takes plain values",
                    self.kind().name()
                )));
            }
            (_, Request::Build(BuildInput::Values(values))) => {
                Mutation::Build(values.clone())
            }
            (Self::Stack(_), Request::Push(value))
            | (Self::Stack(_), Request::Insert { value, index: None }) => {
                Mutation::StackPush(*value)
            }
            (Self::Stack(stack), Request::Pop) => {
                if stack.is_empty() {
                    return Err(StructvizError::EmptyStructure);
                }
                Mutation::StackPop
            }
            (Self::Sequence(list), Request::Insert { value, index }) => {
                let index = index.unwrap_or(list.len());
                list.check_insert(index)?;
                Mutation::SequenceInsert {
                    index,
                    value: *value,
                }
            }
            (Self::Sequence(list), Request::Remove { index }) => {
                list.check_remove(*index)?;
                Mutation::SequenceRemove { index: *index }
            }
            (Self::Linked(list), Request::Insert { value, index }) => {
                let index = index.unwrap_or(list.len());
                list.check_insert(index)?;
                Mutation::LinkedInsert {
                    index,
                    value: *value,
                }
            }
            (Self::Linked(list), Request::Remove { index }) => {
                list.check_remove(*index)?;
                Mutation::LinkedRemove { index: *index }
            }
            (
                Self::Binary(tree),
                Request::InsertChild {
                    parent_index,
                    value,
                    side,
                },
            ) => {
                tree.check_insert(*parent_index, *side)?;
                Mutation::BinaryInsert {
                    parent_index: *parent_index,
                    value: *value,
                    side: *side,
                }
            }
            (Self::Binary(tree), Request::Remove { index }) => {
                let _ = tree.check_remove(*index)?;
                Mutation::BinaryRemove { index: *index }
            }
            (Self::Search(_), Request::Insert { value, index: None }) => {
                Mutation::TreeInsert(*value)
            }
            (Self::Search(_), Request::Delete(value)) => Mutation::TreeDelete(*value),
            (Self::Search(_), Request::Search(value)) => {
                return Ok(Resolved::Search(*value));
            }
            (_, other) => return Err(self.unsupported(other.name())),
        };
        Ok(Resolved::Mutate(mutation))
    }

    /// Outcome of a lookup that changes nothing.
    pub(crate) fn observe(&self, value: Value) -> Outcome {
        match self.as_search_tree().and_then(|t| t.search(value)) {
            Some(_) => Outcome::Found(value),
            None => Outcome::NotFound(value),
        }
    }

    /// Apply `mutation` atomically. Fails without changing anything when
    /// the mutation no longer fits the model.
    pub(crate) fn apply(
        &mut self,
        mutation: Mutation,
        opts: &LayoutOptions,
    ) -> Result<Applied, StructvizError> {
        let name = mutation.name();
        match (self, mutation) {
            (this, Mutation::Clear) => {
                *this = Self::new(this.kind());
                Ok(Applied::plain(Outcome::Cleared))
            }
            (Self::Stack(stack), Mutation::StackPush(value)) => {
                stack.push(value);
                let top = NodeKey::Slot(stack.len() - 1);
                Ok(Applied::touching(Outcome::Pushed(value), top))
            }
            (Self::Stack(stack), Mutation::StackPop) => {
                stack.pop().map(|v| Applied::plain(Outcome::Popped(v)))
            }
            (Self::Stack(stack), Mutation::Build(values)) => {
                let n = values.len();
                *stack = Stack::from_items(values);
                Ok(Applied::plain(Outcome::Built(n)))
            }
            (Self::Sequence(list), Mutation::SequenceInsert { index, value }) => {
                list.insert(index, value)?;
                Ok(Applied::touching(Outcome::Inserted(value), NodeKey::Slot(index)))
            }
            (Self::Sequence(list), Mutation::SequenceRemove { index }) => list
                .remove(index)
                .map(|v| Applied::plain(Outcome::Removed(v))),
            (Self::Sequence(list), Mutation::Build(values)) => {
                let n = values.len();
                *list = SequenceList::from_items(values);
                Ok(Applied::plain(Outcome::Built(n)))
            }
            (Self::Linked(list), Mutation::LinkedInsert { index, value }) => {
                let slot = list.insert(index, value)?;
                Ok(Applied::touching(Outcome::Inserted(value), NodeKey::Slot(slot)))
            }
            (Self::Linked(list), Mutation::LinkedRemove { index }) => list
                .remove(index)
                .map(|v| Applied::plain(Outcome::Removed(v))),
            (Self::Linked(list), Mutation::Build(values)) => {
                *list = LinkedList::from_values(&values);
                Ok(Applied::plain(Outcome::Built(values.len())))
            }
            (
                Self::Binary(tree),
                Mutation::BinaryInsert {
                    parent_index,
                    value,
                    side,
                },
            ) => {
                let id = tree.insert(parent_index, value, side)?;
                Ok(Applied::touching(Outcome::Inserted(value), NodeKey::Tree(id)))
            }
            (Self::Binary(tree), Mutation::BinaryRemove { index }) => tree
                .remove(index)
                .map(|n| Applied::plain(Outcome::Pruned(n))),
            (Self::Binary(tree), Mutation::Build(values)) => {
                *tree = BinaryTree::complete(&values);
                Ok(Applied::plain(Outcome::Built(values.len())))
            }
            (Self::Search(tree), Mutation::TreeInsert(value)) => {
                Ok(insert_and_rebalance(tree, value, opts))
            }
            (Self::Search(tree), Mutation::TreeDelete(value)) => {
                Ok(delete_and_rebalance(tree, value, opts))
            }
            (Self::Search(tree), Mutation::Build(values)) => {
                tree.build(&values);
                Ok(Applied::plain(Outcome::Built(tree.len())))
            }
            (Self::Huffman(forest), Mutation::InstallForest(built)) => {
                if !built.is_reduced() {
                    return Err(StructvizError::InvalidArgument(
                        "Huffman forest is not fully reduced".to_owned(),
                    ));
                }
                *forest = *built;
                Ok(Applied::plain(Outcome::Built(forest.leaf_count())))
            }
            (this, _) => Err(this.unsupported(name)),
        }
    }

    /// Turn a resolved request into an animation plan.
    pub(crate) fn choreograph(
        &self,
        resolved: Resolved,
        options: &Options,
    ) -> Result<Plan, StructvizError> {
        let repeats = options.animation.flash_repeats;
        let animate = |upfront: Option<Mutation>, op: Box<dyn Choreography>| {
            Plan::Animate { upfront, op }
        };
        let mutation = match resolved {
            Resolved::Search(value) => {
                let tree = self
                    .as_search_tree()
                    .ok_or_else(|| self.unsupported("SEARCH"))?;
                let op = PathWalkOp::new(WalkMode::Search, value, tree);
                return Ok(animate(None, Box::new(op)));
            }
            Resolved::Huffman(leaves) => {
                let delay = options.animation.scaled_delay();
                let op = HuffmanBuildOp::new(leaves, repeats, delay);
                return Ok(animate(None, Box::new(op)));
            }
            Resolved::Mutate(mutation) => mutation,
        };
        let plan = match (self, mutation) {
            (Self::Stack(_), Mutation::StackPush(value)) => animate(
                Some(Mutation::StackPush(value)),
                Box::new(ElementOp::grow_in(OpKind::Push, value, Outcome::Pushed(value))),
            ),
            (Self::Stack(stack), Mutation::StackPop) => {
                let top = stack.peek().ok_or(StructvizError::EmptyStructure)?;
                let op = ElementOp::shrink_out(
                    OpKind::Pop,
                    vec![NodeKey::Slot(stack.len() - 1)],
                    Some(top),
                    Mutation::StackPop,
                    Outcome::Popped(top),
                );
                animate(None, Box::new(op))
            }
            (Self::Sequence(list), Mutation::SequenceInsert { index, value }) => {
                let op = SequenceInsertOp::new(index, value, list.len());
                animate(None, Box::new(op))
            }
            (Self::Sequence(list), Mutation::SequenceRemove { index }) => {
                let value = list.get(index).ok_or(StructvizError::IndexOutOfRange {
                    index,
                    len: list.len(),
                })?;
                let op = SequenceRemoveOp::new(index, value, list.len(), repeats);
                animate(None, Box::new(op))
            }
            (Self::Linked(list), Mutation::LinkedInsert { index, value }) => {
                let op = LinkedInsertOp::new(index, value, list.slots_in_order());
                animate(None, Box::new(op))
            }
            (Self::Linked(list), Mutation::LinkedRemove { index }) => {
                let value = list
                    .slot_at(index)
                    .and_then(|s| list.node(s))
                    .map(|n| n.value)
                    .ok_or(StructvizError::IndexOutOfRange {
                        index,
                        len: list.len(),
                    })?;
                let op = LinkedRemoveOp::new(index, value, list.slots_in_order());
                animate(None, Box::new(op))
            }
            (Self::Search(tree), Mutation::TreeInsert(value)) => {
                let op = PathWalkOp::new(WalkMode::Insert, value, tree);
                animate(None, Box::new(op))
            }
            (Self::Search(tree), Mutation::TreeDelete(value)) => {
                let op = PathWalkOp::new(WalkMode::Delete, value, tree);
                animate(None, Box::new(op))
            }
            (
                Self::Binary(_),
                Mutation::BinaryInsert {
                    parent_index,
                    value,
                    side,
                },
            ) => {
                let op = ElementOp::grow_in(
                    OpKind::ChildInsert,
                    value,
                    Outcome::Inserted(value),
                );
                let upfront = Mutation::BinaryInsert {
                    parent_index,
                    value,
                    side,
                };
                animate(Some(upfront), Box::new(op))
            }
            (Self::Binary(tree), Mutation::BinaryRemove { index }) => {
                let id = tree.check_remove(index)?;
                let doomed: Vec<NodeKey> = tree
                    .arena()
                    .pre_order_from(id)
                    .into_iter()
                    .map(NodeKey::Tree)
                    .collect();
                let op = ElementOp::shrink_out(
                    OpKind::SubtreeRemove,
                    doomed.clone(),
                    tree.arena().value(id),
                    Mutation::BinaryRemove { index },
                    Outcome::Pruned(doomed.len()),
                );
                animate(None, Box::new(op))
            }
            (_, other) => Plan::Instant(other),
        };
        Ok(plan)
    }
}

/// Raw insert, then AVL repair. Positions are captured between the two so
/// the rotations can be shown as a morph.
fn insert_and_rebalance(
    tree: &mut SearchTree,
    value: Value,
    opts: &LayoutOptions,
) -> Applied {
    let Some(id) = tree.insert_unbalanced(value) else {
        return Applied::plain(Outcome::Duplicate(value));
    };
    let mut applied = Applied::touching(Outcome::Inserted(value), NodeKey::Tree(id));
    if tree.flavor() == Flavor::Avl {
        applied.morph = rebalance_with_morph(tree, Some(id), opts);
    }
    applied
}

fn delete_and_rebalance(
    tree: &mut SearchTree,
    value: Value,
    opts: &LayoutOptions,
) -> Applied {
    let Some(removed) = tree.delete_unbalanced(value) else {
        return Applied::plain(Outcome::NotFound(value));
    };
    let mut applied = Applied::plain(Outcome::Deleted(value));
    if tree.flavor() == Flavor::Avl {
        applied.morph = rebalance_with_morph(tree, removed.parent, opts);
    }
    applied
}

fn rebalance_with_morph(
    tree: &mut SearchTree,
    start: Option<NodeId>,
    opts: &LayoutOptions,
) -> Option<Morph> {
    let before = layout_tree(tree.arena(), opts).positions;
    let rotations = tree.rebalance_from(start);
    if rotations.is_empty() {
        return None;
    }
    for rotation in &rotations {
        log::debug!("rotation {:?} at {}", rotation.kind, rotation.pivot);
    }
    let after = layout_tree(tree.arena(), opts).positions;
    Some(Morph::new(before, after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Side;

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    #[test]
    fn kinds_parse_loosely() {
        assert_eq!("AVL".parse::<StructureKind>().ok(), Some(StructureKind::Avl));
        assert_eq!(
            "linked-list".parse::<StructureKind>().ok(),
            Some(StructureKind::LinkedList)
        );
        assert!("heap".parse::<StructureKind>().is_err());
        for kind in StructureKind::ALL {
            assert_eq!(Structure::new(kind).kind(), kind);
        }
    }

    #[test]
    fn invalid_requests_are_rejected_before_mutation() {
        let stack = Structure::new(StructureKind::Stack);
        assert!(matches!(
            stack.resolve(&Request::Pop),
            Err(StructvizError::EmptyStructure)
        ));
        assert!(matches!(
            stack.resolve(&Request::Search(1)),
            Err(StructvizError::Unsupported { operation: "SEARCH", .. })
        ));
        let list = Structure::Sequence(SequenceList::from_items(vec![1, 2]));
        assert!(matches!(
            list.resolve(&Request::Insert {
                value: 9,
                index: Some(5)
            }),
            Err(StructvizError::IndexOutOfRange { index: 5, len: 2 })
        ));
        let huffman = Structure::new(StructureKind::Huffman);
        assert!(huffman
            .resolve(&Request::Build(BuildInput::Values(vec![1])))
            .is_err());
    }

    #[test]
    fn missing_index_appends() {
        let list = Structure::Linked(LinkedList::from_values(&[1, 2]));
        let resolved = list.resolve(&Request::Insert {
            value: 3,
            index: None,
        });
        assert!(matches!(
            resolved,
            Ok(Resolved::Mutate(Mutation::LinkedInsert { index: 2, value: 3 }))
        ));
    }

    #[test]
    fn duplicate_insert_is_an_outcome() {
        let mut tree = SearchTree::new(Flavor::Bst);
        tree.build(&[5, 3]);
        let mut s = Structure::Search(tree);
        let applied = s.apply(Mutation::TreeInsert(3), &opts());
        assert_eq!(applied.ok().map(|a| a.outcome), Some(Outcome::Duplicate(3)));
        assert_eq!(s.values(), vec![3, 5]);
    }

    #[test]
    fn avl_insert_reports_rotation_morph() {
        let mut s = Structure::new(StructureKind::Avl);
        for v in [10, 20] {
            let _ = s.apply(Mutation::TreeInsert(v), &opts());
        }
        let applied = s.apply(Mutation::TreeInsert(30), &opts());
        let morph = applied.ok().and_then(|a| a.morph);
        assert!(morph.is_some_and(|m| !m.is_still()));
        assert_eq!(s.values(), vec![10, 20, 30]);
        assert!(s.as_search_tree().is_some_and(SearchTree::is_balanced));
    }

    #[test]
    fn bst_insert_never_morphs() {
        let mut s = Structure::new(StructureKind::Bst);
        for v in [10, 20] {
            let _ = s.apply(Mutation::TreeInsert(v), &opts());
        }
        let applied = s.apply(Mutation::TreeInsert(30), &opts());
        assert!(applied.ok().is_some_and(|a| a.morph.is_none()));
    }

    #[test]
    fn foreign_mutation_is_unsupported() {
        let mut s = Structure::new(StructureKind::Stack);
        let err = s.apply(Mutation::TreeDelete(1), &opts());
        assert!(matches!(
            err,
            Err(StructvizError::Unsupported { operation: "DELETE", .. })
        ));
    }

    #[test]
    fn unreduced_forest_is_not_installed() {
        let weights = vec![("a".to_owned(), 1), ("b".to_owned(), 2)];
        let leaves = HuffmanForest::from_weights(&weights).unwrap_or_default();
        let mut s = Structure::new(StructureKind::Huffman);
        assert!(s
            .apply(Mutation::InstallForest(Box::new(leaves)), &opts())
            .is_err());
        assert!(s.is_empty());
    }

    #[test]
    fn plans_match_commit_points() {
        let options = Options::default();
        let stack = Structure::Stack(Stack::from_items(vec![1]));
        let push = stack.choreograph(Resolved::Mutate(Mutation::StackPush(2)), &options);
        assert!(matches!(push, Ok(Plan::Animate { upfront: Some(_), .. })));
        let pop = stack.choreograph(Resolved::Mutate(Mutation::StackPop), &options);
        assert!(matches!(pop, Ok(Plan::Animate { upfront: None, .. })));
        let clear = stack.choreograph(Resolved::Mutate(Mutation::Clear), &options);
        assert!(matches!(clear, Ok(Plan::Instant(Mutation::Clear))));

        let tree = Structure::Binary(BinaryTree::complete(&[1, 2, 3]));
        let insert = Mutation::BinaryInsert {
            parent_index: 1,
            value: 4,
            side: Side::Left,
        };
        let plan = tree.choreograph(Resolved::Mutate(insert), &options);
        assert!(matches!(plan, Ok(Plan::Animate { upfront: Some(_), .. })));
    }
}
