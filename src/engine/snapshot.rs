//! Read-only frame state handed to renderers.

use glam::Vec2;

use super::RunState;
use crate::animation::OpView;
use crate::layout::{Layout, LayoutFault, NodeKey};

/// One drawable node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    /// Node identity.
    pub key: NodeKey,
    /// Canvas position for this frame.
    pub position: Vec2,
    /// Text inside the node.
    pub label: String,
}

/// Everything a renderer needs for one frame. Owns its data; holding a
/// snapshot never blocks the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Nodes sorted by key, so output is stable across frames.
    pub nodes: Vec<NodeView>,
    /// Edges between nodes.
    pub edges: Vec<(NodeKey, NodeKey)>,
    /// State of the in-flight operation.
    pub op: Option<OpView>,
    /// Logical size of the committed model.
    pub size: usize,
    /// Subtrees that could not be laid out.
    pub faults: Vec<LayoutFault>,
    /// Engine lifecycle state.
    pub state: RunState,
    /// Current generation token.
    pub generation: u64,
}

impl Snapshot {
    pub(crate) fn capture(
        layout: Layout,
        op: Option<OpView>,
        size: usize,
        state: RunState,
        generation: u64,
    ) -> Self {
        let Layout {
            positions,
            mut labels,
            edges,
            faults,
        } = layout;
        let mut nodes: Vec<NodeView> = positions
            .into_iter()
            .map(|(key, position)| NodeView {
                key,
                position,
                label: labels.remove(&key).unwrap_or_default(),
            })
            .collect();
        nodes.sort_by_key(|n| n.key);
        Self {
            nodes,
            edges,
            op,
            size,
            faults,
            state,
            generation,
        }
    }

    /// Node drawn for `key`.
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Labels in key order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.label.as_str()).collect()
    }
}
