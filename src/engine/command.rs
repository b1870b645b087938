//! The engine's complete operation vocabulary.
//!
//! Callers describe what they want as a [`Request`]. The engine validates
//! it against the current model, and the model only ever changes through a
//! [`Mutation`] applied at the operation's commit point. Every finished
//! operation leaves an [`Outcome`].

use std::fmt;

use crate::model::{HuffmanForest, Side, Value};

// ── Requests ─────────────────────────────────────────────────────────────

/// Input of a bulk rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildInput {
    /// Plain values, in insertion order.
    Values(Vec<Value>),
    /// `(symbol, weight)` pairs for a Huffman build.
    Weights(Vec<(String, u64)>),
}

/// An operation requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Push onto a stack.
    Push(Value),
    /// Pop a stack.
    Pop,
    /// Insert a value. Linear structures take an optional position (append
    /// when absent); search trees take none.
    Insert {
        /// Value to insert.
        value: Value,
        /// Target position.
        index: Option<usize>,
    },
    /// Remove by position: a list element, or a plain binary tree subtree
    /// addressed by level-order index.
    Remove {
        /// Position to remove.
        index: usize,
    },
    /// Attach a leaf to a plain binary tree.
    InsertChild {
        /// Level-order index of the parent (0 on an empty tree).
        parent_index: usize,
        /// Value of the new leaf.
        value: Value,
        /// Which child slot to fill.
        side: Side,
    },
    /// Look a value up in a search tree.
    Search(Value),
    /// Delete a value from a search tree.
    Delete(Value),
    /// Replace the contents.
    Build(BuildInput),
    /// Empty the structure.
    Clear,
}

impl Request {
    /// Command name used in scripts and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Push(_) => "PUSH",
            Self::Pop => "POP",
            Self::Insert { .. } | Self::InsertChild { .. } => "INSERT",
            Self::Remove { .. } => "REMOVE",
            Self::Search(_) => "SEARCH",
            Self::Delete(_) => "DELETE",
            Self::Build(_) => "BUILD",
            Self::Clear => "CLEAR",
        }
    }
}

// ── Mutations ────────────────────────────────────────────────────────────

/// A validated model change, applied atomically at a commit point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Push onto the stack.
    StackPush(Value),
    /// Pop the stack.
    StackPop,
    /// Insert into the sequence list.
    SequenceInsert {
        /// Final position of the value.
        index: usize,
        /// Inserted value.
        value: Value,
    },
    /// Remove from the sequence list.
    SequenceRemove {
        /// Position removed.
        index: usize,
    },
    /// Insert into the linked list.
    LinkedInsert {
        /// Final position of the value.
        index: usize,
        /// Inserted value.
        value: Value,
    },
    /// Remove from the linked list.
    LinkedRemove {
        /// Position removed.
        index: usize,
    },
    /// Search-tree insert (with rebalance for AVL).
    TreeInsert(Value),
    /// Search-tree delete (with rebalance for AVL).
    TreeDelete(Value),
    /// Attach a plain binary tree leaf.
    BinaryInsert {
        /// Level-order index of the parent.
        parent_index: usize,
        /// Value of the new leaf.
        value: Value,
        /// Child slot.
        side: Side,
    },
    /// Drop a plain binary tree subtree.
    BinaryRemove {
        /// Level-order index of the subtree root.
        index: usize,
    },
    /// Rebuild from values.
    Build(Vec<Value>),
    /// Replace the Huffman forest with a fully reduced one.
    InstallForest(Box<HuffmanForest>),
    /// Empty the structure.
    Clear,
}

impl Mutation {
    /// Command name of the request this mutation came from.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StackPush(_) => "PUSH",
            Self::StackPop => "POP",
            Self::SequenceInsert { .. }
            | Self::LinkedInsert { .. }
            | Self::TreeInsert(_)
            | Self::BinaryInsert { .. } => "INSERT",
            Self::SequenceRemove { .. }
            | Self::LinkedRemove { .. }
            | Self::BinaryRemove { .. } => "REMOVE",
            Self::TreeDelete(_) => "DELETE",
            Self::Build(_) | Self::InstallForest(_) => "BUILD",
            Self::Clear => "CLEAR",
        }
    }
}

// ── Outcomes ─────────────────────────────────────────────────────────────

/// Result of a finished operation. Misses and duplicates are ordinary
/// outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Value pushed.
    Pushed(Value),
    /// Value popped.
    Popped(Value),
    /// Value inserted.
    Inserted(Value),
    /// Search-tree insert of a value already present; nothing changed.
    Duplicate(Value),
    /// List element removed.
    Removed(Value),
    /// Search hit.
    Found(Value),
    /// Search or delete miss.
    NotFound(Value),
    /// Search-tree delete.
    Deleted(Value),
    /// Rebuild finished; carries the number of elements.
    Built(usize),
    /// Structure emptied.
    Cleared,
    /// Subtree removed; carries the number of dropped nodes.
    Pruned(usize),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pushed(v) => write!(f, "pushed {v}"),
            Self::Popped(v) => write!(f, "popped {v}"),
            Self::Inserted(v) => write!(f, "inserted {v}"),
            Self::Duplicate(v) => write!(f, "{v} is already present"),
            Self::Removed(v) => write!(f, "removed {v}"),
            Self::Found(v) => write!(f, "found {v}"),
            Self::NotFound(v) => write!(f, "{v} not found"),
            Self::Deleted(v) => write!(f, "deleted {v}"),
            Self::Built(n) => write!(f, "built {n} elements"),
            Self::Cleared => f.write_str("cleared"),
            Self::Pruned(n) => write!(f, "removed subtree of {n} nodes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_read_as_messages() {
        assert_eq!(Outcome::NotFound(65).to_string(), "65 not found");
        assert_eq!(Outcome::Built(5).to_string(), "built 5 elements");
    }

    #[test]
    fn child_insert_is_an_insert_command() {
        let request = Request::InsertChild {
            parent_index: 0,
            value: 1,
            side: Side::Left,
        };
        assert_eq!(request.name(), "INSERT");
        assert_eq!(Request::Remove { index: 0 }.name(), "REMOVE");
    }
}
