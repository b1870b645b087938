//! Node placement for every structure kind plus start/end interpolation.
//!
//! Layouts are plain position maps keyed by [`NodeKey`]. The renderer and
//! the choreographies never hold model references, only keys.

mod forest;
mod linear;
mod morph;
mod tree;

use std::fmt;

use glam::Vec2;
use rustc_hash::FxHashMap;

pub use forest::layout_forest;
pub use linear::{layout_linked, layout_sequence, layout_stack, row_slot, stack_slot};
pub use morph::Morph;
pub use tree::layout_tree;

use crate::model::NodeId;

/// Identity of a drawable node, stable across layouts of the same model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    /// Pointer-tree node.
    Tree(NodeId),
    /// Huffman arena entry.
    Forest(usize),
    /// Cell of a linear structure (position for arrays, slot for the
    /// linked list).
    Slot(usize),
    /// Element that is animating in but not yet part of the model.
    Pending,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(id) => write!(f, "tree{id}"),
            Self::Forest(i) => write!(f, "forest#{i}"),
            Self::Slot(i) => write!(f, "slot#{i}"),
            Self::Pending => f.write_str("pending"),
        }
    }
}

/// Position of every placed node.
pub type PositionMap = FxHashMap<NodeKey, Vec2>;

/// What went wrong while laying out a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A node was reached a second time.
    Cycle,
    /// The subtree is deeper than `max_depth`.
    DepthExceeded,
}

/// A structural fault found during layout; the subtree below `node` was
/// skipped and should be drawn with an error marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutFault {
    /// Node at which layout stopped.
    pub node: NodeKey,
    /// Kind of fault.
    pub kind: FaultKind,
}

/// Positions, labels and edges for one frame.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Node positions.
    pub positions: PositionMap,
    /// Text drawn inside each node.
    pub labels: FxHashMap<NodeKey, String>,
    /// Parent-to-child (or predecessor-to-successor) edges.
    pub edges: Vec<(NodeKey, NodeKey)>,
    /// Faults found while placing nodes.
    pub faults: Vec<LayoutFault>,
}

impl Layout {
    /// Place a node.
    pub fn place(&mut self, key: NodeKey, position: Vec2, label: String) {
        let _ = self.positions.insert(key, position);
        let _ = self.labels.insert(key, label);
    }

    /// Position of `key`.
    #[must_use]
    pub fn position(&self, key: NodeKey) -> Option<Vec2> {
        self.positions.get(&key).copied()
    }

    /// Move an already placed node.
    pub fn move_to(&mut self, key: NodeKey, position: Vec2) {
        if let Some(p) = self.positions.get_mut(&key) {
            *p = position;
        }
    }

    /// Remove a node and every edge touching it.
    pub fn remove(&mut self, key: NodeKey) {
        let _ = self.positions.remove(&key);
        let _ = self.labels.remove(&key);
        self.edges.retain(|(a, b)| *a != key && *b != key);
    }
}
