use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{FaultKind, Layout, LayoutFault, NodeKey};
use crate::model::HuffmanForest;
use crate::options::LayoutOptions;

/// Leaves under each node reachable from `root`, plus the nodes in
/// pre-order. Revisited indices are reported as faults and skipped.
fn leaf_counts(
    forest: &HuffmanForest,
    root: usize,
    faults: &mut Vec<LayoutFault>,
) -> (FxHashMap<usize, usize>, Vec<(usize, usize)>) {
    let mut order = Vec::new();
    let mut seen = FxHashSet::default();
    let mut stack = vec![(root, 0_usize)];
    while let Some((index, depth)) = stack.pop() {
        if !seen.insert(index) {
            faults.push(LayoutFault {
                node: NodeKey::Forest(index),
                kind: FaultKind::Cycle,
            });
            continue;
        }
        let Some(node) = forest.node(index) else {
            continue;
        };
        order.push((index, depth));
        stack.extend(node.right.map(|r| (r, depth + 1)));
        stack.extend(node.left.map(|l| (l, depth + 1)));
    }
    let mut counts = FxHashMap::default();
    for &(index, _) in order.iter().rev() {
        let count = forest.node(index).map_or(1, |node| {
            let below: usize = [node.left, node.right]
                .into_iter()
                .flatten()
                .filter_map(|c| counts.get(&c).copied())
                .sum();
            below.max(1)
        });
        let _ = counts.insert(index, count);
    }
    (counts, order)
}

/// Lay out one subtree whose leftmost leaf slot starts at `left` and whose
/// root sits at height `top`. Leaves take one `unit_width` each; a parent
/// sits midway between its children.
fn place_subtree(
    forest: &HuffmanForest,
    root: usize,
    left: f32,
    top: f32,
    opts: &LayoutOptions,
    layout: &mut Layout,
) -> f32 {
    let (counts, order) = leaf_counts(forest, root, &mut layout.faults);
    let count_of = |i: usize| counts.get(&i).copied().unwrap_or(1);
    let mut extent: FxHashMap<usize, f32> = FxHashMap::default();
    let _ = extent.insert(root, left);
    for &(index, _) in &order {
        let Some(node) = forest.node(index) else {
            continue;
        };
        let start = extent.get(&index).copied().unwrap_or(left);
        if let Some(l) = node.left {
            let _ = extent.insert(l, start);
        }
        if let Some(r) = node.right {
            #[allow(clippy::cast_precision_loss)]
            let shift = node.left.map_or(0, count_of) as f32 * opts.unit_width;
            let _ = extent.insert(r, start + shift);
        }
    }
    let mut xs: FxHashMap<usize, f32> = FxHashMap::default();
    for &(index, depth) in order.iter().rev() {
        let Some(node) = forest.node(index) else {
            continue;
        };
        let children: Vec<f32> = [node.left, node.right]
            .into_iter()
            .flatten()
            .filter_map(|c| xs.get(&c).copied())
            .collect();
        let x = match children.as_slice() {
            [a, b] => (a + b) * 0.5,
            [only] => *only,
            _ => extent.get(&index).copied().unwrap_or(left) + opts.unit_width * 0.5,
        };
        let _ = xs.insert(index, x);
        #[allow(clippy::cast_precision_loss)]
        let y = top + depth as f32 * opts.level_spacing;
        let label = node.symbol.as_ref().map_or_else(
            || node.weight.to_string(),
            |s| format!("{s}:{}", node.weight),
        );
        layout.place(NodeKey::Forest(index), Vec2::new(x, y), label);
        for child in [node.left, node.right].into_iter().flatten() {
            layout.edges.push((NodeKey::Forest(index), NodeKey::Forest(child)));
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let leaves = count_of(root) as f32;
    leaves * opts.unit_width
}

/// Place every tree of the forest. Roots listed in `staged` are drawn as a
/// group lifted by `staging_height` and centred on the canvas; the rest form
/// a row, left to right in the forest's current root order.
#[must_use]
pub fn layout_forest(
    forest: &HuffmanForest,
    staged: &[usize],
    opts: &LayoutOptions,
) -> Layout {
    let mut layout = Layout::default();
    let row_top = opts.top_margin + opts.staging_height;
    let (lifted, row): (Vec<usize>, Vec<usize>) =
        forest.roots().iter().copied().partition(|r| staged.contains(r));
    for (group, top) in [(row, row_top), (lifted, opts.top_margin)] {
        let total: usize = group
            .iter()
            .map(|&r| leaf_total(forest, r))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let mut left = opts.center_x() - total as f32 * opts.unit_width * 0.5;
        for root in group {
            left += place_subtree(forest, root, left, top, opts, &mut layout);
        }
    }
    layout
}

fn leaf_total(forest: &HuffmanForest, root: usize) -> usize {
    let mut scratch = Vec::new();
    let (counts, _) = leaf_counts(forest, root, &mut scratch);
    counts.get(&root).copied().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest(pairs: &[(&str, u64)]) -> HuffmanForest {
        let weights: Vec<(String, u64)> =
            pairs.iter().map(|(s, w)| ((*s).to_owned(), *w)).collect();
        HuffmanForest::from_weights(&weights).unwrap()
    }

    #[test]
    fn leaves_form_a_centred_row() {
        let f = forest(&[("a", 1), ("b", 2), ("c", 3)]);
        let opts = LayoutOptions::default();
        let layout = layout_forest(&f, &[], &opts);
        let xs: Vec<f32> = (0..3)
            .map(|i| layout.position(NodeKey::Forest(i)).unwrap().x)
            .collect();
        assert_eq!(xs, vec![450.0, 500.0, 550.0]);
        let y = layout.position(NodeKey::Forest(0)).unwrap().y;
        assert_eq!(y, opts.top_margin + opts.staging_height);
    }

    #[test]
    fn parent_sits_between_children() {
        let mut f = forest(&[("a", 1), ("b", 2), ("c", 3)]);
        let _ = f.reduce();
        let layout = layout_forest(&f, &[], &LayoutOptions::default());
        for node in 3..f.len() {
            let entry = f.node(node).unwrap();
            let px = layout.position(NodeKey::Forest(node)).unwrap().x;
            let lx = layout.position(NodeKey::Forest(entry.left.unwrap())).unwrap().x;
            let rx = layout.position(NodeKey::Forest(entry.right.unwrap())).unwrap().x;
            assert!((px - (lx + rx) * 0.5).abs() < 1e-3);
            assert!(lx < rx);
        }
        assert_eq!(layout.edges.len(), 4);
    }

    #[test]
    fn staged_roots_are_lifted() {
        let f = forest(&[("a", 1), ("b", 2), ("c", 3)]);
        let opts = LayoutOptions::default();
        let layout = layout_forest(&f, &[0, 1], &opts);
        assert_eq!(layout.position(NodeKey::Forest(0)).unwrap().y, opts.top_margin);
        assert_eq!(
            layout.position(NodeKey::Forest(2)).unwrap().y,
            opts.top_margin + opts.staging_height
        );
    }
}
