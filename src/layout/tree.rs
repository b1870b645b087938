use glam::Vec2;
use rustc_hash::FxHashSet;

use super::{FaultKind, Layout, LayoutFault, NodeKey};
use crate::model::{NodeId, TreeArena};
use crate::options::LayoutOptions;

struct Frame {
    id: NodeId,
    position: Vec2,
    spacing: f32,
    depth: usize,
}

/// Horizontal offset of the root's children. Trees taller than the
/// canvas can fit at full spread are compressed proportionally.
fn initial_spacing(height: i32, opts: &LayoutOptions) -> f32 {
    let spread = opts.canvas_width / 4.0;
    let threshold = (opts.canvas_width / opts.node_diameter.max(1.0))
        .max(2.0)
        .log2();
    #[allow(clippy::cast_precision_loss)]
    let height = height.max(1) as f32;
    let compression = if height > threshold {
        threshold / height
    } else {
        1.0
    };
    (spread * compression).max(opts.min_spacing)
}

/// Place every node of a pointer tree: root at the top centre, each child
/// one level down and `spacing` to the side, with the spacing halved per
/// level down to `min_spacing`.
///
/// Traversal is an explicit stack. A node reached twice (a cycle or a
/// shared child) or a level beyond `max_depth` is not descended into; the
/// offending node is recorded in [`Layout::faults`] instead.
#[must_use]
pub fn layout_tree(arena: &TreeArena, opts: &LayoutOptions) -> Layout {
    let mut layout = Layout::default();
    let Some(root) = arena.root() else {
        return layout;
    };
    let spacing = initial_spacing(arena.height(Some(root)), opts);
    let mut visited = FxHashSet::default();
    let mut stack = vec![Frame {
        id: root,
        position: Vec2::new(opts.center_x(), opts.top_margin),
        spacing,
        depth: 0,
    }];
    while let Some(frame) = stack.pop() {
        let key = NodeKey::Tree(frame.id);
        if !visited.insert(frame.id) {
            log::warn!("layout: cycle through node {}", frame.id);
            layout.faults.push(LayoutFault {
                node: key,
                kind: FaultKind::Cycle,
            });
            continue;
        }
        let Some(node) = arena.get(frame.id) else {
            continue;
        };
        layout.place(key, frame.position, node.value.to_string());
        if frame.depth >= opts.max_depth {
            if node.left.is_some() || node.right.is_some() {
                log::warn!("layout: depth limit reached at node {}", frame.id);
                layout.faults.push(LayoutFault {
                    node: key,
                    kind: FaultKind::DepthExceeded,
                });
            }
            continue;
        }
        let child_spacing = (frame.spacing * 0.5).max(opts.min_spacing);
        let below = frame.position.y + opts.level_spacing;
        let children = [
            (node.right, frame.position.x + frame.spacing),
            (node.left, frame.position.x - frame.spacing),
        ];
        for (child, x) in children {
            let Some(child) = child else {
                continue;
            };
            if visited.contains(&child) {
                layout.faults.push(LayoutFault {
                    node: key,
                    kind: FaultKind::Cycle,
                });
                continue;
            }
            layout.edges.push((key, NodeKey::Tree(child)));
            stack.push(Frame {
                id: child,
                position: Vec2::new(x, below),
                spacing: child_spacing,
                depth: frame.depth + 1,
            });
        }
    }
    layout
}
