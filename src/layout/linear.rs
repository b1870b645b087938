use glam::Vec2;

use super::{Layout, NodeKey};
use crate::model::{LinkedList, SequenceList, Stack};
use crate::options::LayoutOptions;

/// Canvas position of stack cell `index` (0 = bottom).
#[must_use]
pub fn stack_slot(index: usize, opts: &LayoutOptions) -> Vec2 {
    #[allow(clippy::cast_precision_loss)]
    let rise = index as f32 * opts.slot_spacing;
    Vec2::new(opts.center_x(), opts.canvas_height - opts.top_margin - rise)
}

/// Canvas position of row cell `index` (0 = leftmost).
#[must_use]
pub fn row_slot(index: usize, opts: &LayoutOptions) -> Vec2 {
    #[allow(clippy::cast_precision_loss)]
    let run = index as f32 * opts.slot_spacing;
    Vec2::new(opts.top_margin + run, opts.canvas_height * 0.5)
}

/// Stack cells bottom to top, keyed by position.
#[must_use]
pub fn layout_stack(stack: &Stack, opts: &LayoutOptions) -> Layout {
    let mut layout = Layout::default();
    for (i, value) in stack.items().iter().enumerate() {
        layout.place(NodeKey::Slot(i), stack_slot(i, opts), value.to_string());
    }
    layout
}

/// Sequence cells left to right, keyed by position.
#[must_use]
pub fn layout_sequence(list: &SequenceList, opts: &LayoutOptions) -> Layout {
    let mut layout = Layout::default();
    for (i, value) in list.items().iter().enumerate() {
        layout.place(NodeKey::Slot(i), row_slot(i, opts), value.to_string());
    }
    layout
}

/// Linked nodes in traversal order, keyed by arena slot so a node keeps its
/// key while its list position changes. Each adjacent pair gets a forward
/// and a backward edge.
#[must_use]
pub fn layout_linked(list: &LinkedList, opts: &LayoutOptions) -> Layout {
    let mut layout = Layout::default();
    let slots = list.slots_in_order();
    for (i, &slot) in slots.iter().enumerate() {
        let label = list.node(slot).map(|n| n.value.to_string()).unwrap_or_default();
        layout.place(NodeKey::Slot(slot), row_slot(i, opts), label);
    }
    for pair in slots.windows(2) {
        let (a, b) = (NodeKey::Slot(pair[0]), NodeKey::Slot(pair[1]));
        layout.edges.push((a, b));
        layout.edges.push((b, a));
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_grows_upward() {
        let opts = LayoutOptions::default();
        let layout = layout_stack(&Stack::from_items(vec![1, 2]), &opts);
        let bottom = layout.position(NodeKey::Slot(0)).unwrap();
        let top = layout.position(NodeKey::Slot(1)).unwrap();
        assert_eq!(bottom.y - top.y, opts.slot_spacing);
        assert_eq!(bottom.x, top.x);
    }

    #[test]
    fn linked_keys_follow_slots_not_positions() {
        let mut list = LinkedList::from_values(&[1, 2, 3]);
        let _ = list.remove(0);
        let opts = LayoutOptions::default();
        let layout = layout_linked(&list, &opts);
        assert_eq!(layout.position(NodeKey::Slot(1)), Some(row_slot(0, &opts)));
        assert_eq!(layout.position(NodeKey::Slot(0)), None);
        assert_eq!(layout.edges.len(), 2);
        assert_eq!(layout.labels.get(&NodeKey::Slot(2)).map(String::as_str), Some("3"));
    }

    #[test]
    fn sequence_cells_are_evenly_spaced() {
        let opts = LayoutOptions::default();
        let layout = layout_sequence(&SequenceList::from_items(vec![5, 6, 7]), &opts);
        let a = layout.position(NodeKey::Slot(0)).unwrap();
        let c = layout.position(NodeKey::Slot(2)).unwrap();
        assert_eq!(c.x - a.x, 2.0 * opts.slot_spacing);
    }
}
