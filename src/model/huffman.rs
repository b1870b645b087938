//! Append-only Huffman forest and the greedy reduction over it.
//!
//! Nodes are referenced by their arena index. The arena never shrinks, so
//! an index handed to the layout or to an in-flight animation stays valid
//! for as long as the forest itself lives.

use rustc_hash::FxHashSet;

use crate::error::StructvizError;

/// One arena entry: a leaf carries a symbol, an internal node does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanNode {
    /// Leaf payload.
    pub symbol: Option<String>,
    /// Weight (sum of leaf weights below an internal node).
    pub weight: u64,
    /// Parent index.
    pub parent: Option<usize>,
    /// Left child index.
    pub left: Option<usize>,
    /// Right child index.
    pub right: Option<usize>,
}

impl HuffmanNode {
    /// Whether this node carries a symbol.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.symbol.is_some()
    }
}

/// Record of a single merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    /// Lighter (or earlier) child.
    pub left: usize,
    /// Heavier (or later) child.
    pub right: usize,
    /// Newly appended parent.
    pub parent: usize,
}

/// Arena of Huffman nodes plus the set of indices that are still roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanForest {
    nodes: Vec<HuffmanNode>,
    roots: Vec<usize>,
}

impl HuffmanForest {
    /// Empty forest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One leaf per `(symbol, weight)` entry, in the given order.
    pub fn from_weights(
        weights: &[(String, u64)],
    ) -> Result<Self, StructvizError> {
        if weights.is_empty() {
            return Err(StructvizError::EmptyStructure);
        }
        let mut seen = FxHashSet::default();
        let mut forest = Self::new();
        let mut total: u64 = 0;
        for (symbol, weight) in weights {
            total = total.checked_add(*weight).ok_or_else(|| {
                StructvizError::InvalidArgument(format!(
                    "total weight exceeds {}",
                    u64::MAX
                ))
            })?;
            if !seen.insert(symbol.as_str()) {
                return Err(StructvizError::InvalidArgument(format!(
                    "duplicate symbol '{symbol}'"
                )));
            }
            forest.roots.push(forest.nodes.len());
            forest.nodes.push(HuffmanNode {
                symbol: Some(symbol.clone()),
                weight: *weight,
                parent: None,
                left: None,
                right: None,
            });
        }
        Ok(forest)
    }

    /// Adopt a complete tree given as an arena whose root is at `root`.
    pub(crate) fn from_tree(nodes: Vec<HuffmanNode>, root: Option<usize>) -> Self {
        Self {
            nodes,
            roots: root.into_iter().collect(),
        }
    }

    /// All arena entries.
    #[must_use]
    pub fn nodes(&self) -> &[HuffmanNode] {
        &self.nodes
    }

    /// Entry at `index`.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&HuffmanNode> {
        self.nodes.get(index)
    }

    /// Indices of current roots, in their present order.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Number of arena entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Single remaining root, once reduction has finished.
    #[must_use]
    pub fn root(&self) -> Option<usize> {
        match self.roots.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Whether no further merge is possible.
    #[must_use]
    pub fn is_reduced(&self) -> bool {
        self.roots.len() <= 1
    }

    /// Sum of the weights of all current roots.
    #[must_use]
    pub fn root_weight(&self) -> u64 {
        self.roots
            .iter()
            .filter_map(|&i| self.nodes.get(i))
            .fold(0, |acc: u64, n| acc.saturating_add(n.weight))
    }

    /// Order roots by weight, ties by arena index.
    pub fn sort_roots(&mut self) {
        let nodes = &self.nodes;
        self.roots
            .sort_by_key(|&i| (nodes.get(i).map_or(u64::MAX, |n| n.weight), i));
    }

    /// The two roots the next merge will combine.
    #[must_use]
    pub fn next_pair(&self) -> Option<(usize, usize)> {
        let mut sorted = self.clone();
        sorted.sort_roots();
        match sorted.roots.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }

    /// Combine the two lightest roots under a new parent appended to the
    /// arena.
    pub fn merge_smallest(&mut self) -> Option<Merge> {
        self.sort_roots();
        let (left, right) = match self.roots.as_slice() {
            [a, b, ..] => (*a, *b),
            _ => return None,
        };
        // Bounded by the leaf total checked in `from_weights`.
        let weight = self
            .nodes
            .get(left)?
            .weight
            .saturating_add(self.nodes.get(right)?.weight);
        let parent = self.nodes.len();
        self.nodes.push(HuffmanNode {
            symbol: None,
            weight,
            parent: None,
            left: Some(left),
            right: Some(right),
        });
        for child in [left, right] {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = Some(parent);
            }
        }
        self.roots.retain(|&r| r != left && r != right);
        self.roots.push(parent);
        Some(Merge {
            left,
            right,
            parent,
        })
    }

    /// Merge until a single root remains.
    pub fn reduce(&mut self) -> Vec<Merge> {
        let mut merges = Vec::with_capacity(self.roots.len());
        while let Some(merge) = self.merge_smallest() {
            merges.push(merge);
        }
        merges
    }

    /// Prefix codes for every leaf of the reduced tree, in depth-first
    /// (left before right) order. A lone leaf gets the code `"0"`.
    #[must_use]
    pub fn codes(&self) -> Vec<(String, String)> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(self.leaf_count());
        let mut seen = FxHashSet::default();
        let mut stack = vec![(root, String::new())];
        while let Some((index, code)) = stack.pop() {
            if !seen.insert(index) {
                continue;
            }
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if let Some(symbol) = &node.symbol {
                let code = if code.is_empty() { "0".to_owned() } else { code };
                out.push((symbol.clone(), code));
                continue;
            }
            if let Some(r) = node.right {
                stack.push((r, format!("{code}1")));
            }
            if let Some(l) = node.left {
                stack.push((l, format!("{code}0")));
            }
        }
        out
    }

    /// `sum(weight * code length)` over all leaves.
    #[must_use]
    pub fn weighted_path_length(&self) -> u64 {
        let by_symbol: Vec<(&str, u64)> = self
            .nodes
            .iter()
            .filter_map(|n| n.symbol.as_deref().map(|s| (s, n.weight)))
            .collect();
        self.codes()
            .iter()
            .filter_map(|(symbol, code)| {
                by_symbol
                    .iter()
                    .find(|(s, _)| s == symbol)
                    .map(|(_, w)| w.saturating_mul(code.len() as u64))
            })
            .fold(0, u64::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
        pairs.iter().map(|(s, w)| ((*s).to_owned(), *w)).collect()
    }

    #[test]
    fn merge_takes_two_lightest_with_index_tiebreak() {
        let mut forest =
            HuffmanForest::from_weights(&weights(&[("a", 3), ("b", 1), ("c", 1)]))
                .unwrap_or_default();
        let merge = forest.merge_smallest();
        assert_eq!(
            merge,
            Some(Merge {
                left: 1,
                right: 2,
                parent: 3
            })
        );
        assert_eq!(forest.nodes()[3].weight, 2);
        assert_eq!(forest.nodes()[1].parent, Some(3));
        assert_eq!(forest.roots(), &[0, 3]);
    }

    #[test]
    fn reduction_preserves_total_weight() {
        let mut forest = HuffmanForest::from_weights(&weights(&[
            ("a", 5),
            ("b", 9),
            ("c", 12),
            ("d", 13),
            ("e", 16),
            ("f", 45),
        ]))
        .unwrap_or_default();
        let before = forest.root_weight();
        let merges = forest.reduce();
        assert_eq!(merges.len(), 5);
        assert_eq!(forest.len(), 11);
        let root = forest.root().and_then(|r| forest.node(r));
        assert_eq!(root.map(|n| n.weight), Some(before));
        assert_eq!(forest.weighted_path_length(), 224);
    }

    #[test]
    fn codes_are_prefix_free() {
        let mut forest = HuffmanForest::from_weights(&weights(&[
            ("x", 1),
            ("y", 1),
            ("z", 2),
            ("w", 4),
        ]))
        .unwrap_or_default();
        let _ = forest.reduce();
        let codes = forest.codes();
        assert_eq!(codes.len(), 4);
        for (i, (_, a)) in codes.iter().enumerate() {
            for (j, (_, b)) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_str()), "{a} prefixes {b}");
                }
            }
        }
    }

    #[test]
    fn lone_leaf_gets_single_bit() {
        let mut forest =
            HuffmanForest::from_weights(&weights(&[("only", 7)])).unwrap_or_default();
        assert!(forest.reduce().is_empty());
        assert_eq!(forest.codes(), vec![("only".to_owned(), "0".to_owned())]);
    }

    #[test]
    fn rejects_weights_whose_total_overflows() {
        let result = HuffmanForest::from_weights(&weights(&[("a", u64::MAX), ("b", 1)]));
        assert!(matches!(result, Err(StructvizError::InvalidArgument(_))));

        let mut forest =
            HuffmanForest::from_weights(&weights(&[("a", u64::MAX - 1), ("b", 1)])).unwrap();
        let _ = forest.reduce();
        assert_eq!(forest.root_weight(), u64::MAX);
        assert_eq!(forest.weighted_path_length(), u64::MAX);
    }

    #[test]
    fn rejects_empty_and_duplicate_input() {
        assert!(matches!(
            HuffmanForest::from_weights(&[]),
            Err(StructvizError::EmptyStructure)
        ));
        assert!(HuffmanForest::from_weights(&weights(&[("a", 1), ("a", 2)]))
            .is_err());
    }
}
