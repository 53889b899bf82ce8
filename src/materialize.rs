//! Explicit tree structure recovered from the root-choice table.
//!
//! The unfolding starts at `[1, n]` and follows `R` top-down. Every node
//! remembers the range it was chosen for, which is the only authoritative
//! link back into the cost table: several ranges may store the same root
//! index, but exactly one of them lies on the unfolding path.

use crate::tables::DpTables;

/// Contiguous span of 1-based key indices `start..=end`.
///
/// `end == start - 1` denotes an empty range (a single gap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    /// First key index covered (1-based).
    pub start: usize,
    /// Last key index covered (1-based, inclusive).
    pub end: usize,
}

impl KeyRange {
    /// Range of 1-based key indices `start..=end`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end + 1 >= start, "range [{start}, {end}] is inverted");
        Self { start, end }
    }

    /// Number of keys covered.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    /// Returns true if the range covers no key.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One key of the materialised tree. Children are 0-based key positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNode {
    /// Position of the left child, if any.
    pub left: Option<usize>,
    /// Position of the right child, if any.
    pub right: Option<usize>,
    /// Range this key was chosen as root for.
    pub range: KeyRange,
}

/// Child relation over all key positions plus the root position.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStructure {
    nodes: Vec<TreeNode>,
    root: Option<usize>,
}

impl TreeStructure {
    /// Node stored for key position `pos`.
    #[inline]
    pub fn node(&self, pos: usize) -> Option<&TreeNode> {
        self.nodes.get(pos)
    }

    /// All nodes, indexed by key position.
    #[inline]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Position of the root key, `None` for an empty tree.
    #[inline]
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no key.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Unfold the root-choice table into an explicit tree.
///
/// Uses a work stack instead of recursion; a degenerate optimum can be a
/// chain `n` levels deep.
pub fn materialize(tables: &DpTables) -> TreeStructure {
    #[cfg(feature = "tracing")]
    let span = tracing::info_span!("materialize", n = tables.len());
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let n = tables.len();
    let placeholder = TreeNode {
        left: None,
        right: None,
        range: KeyRange::new(1, 0),
    };
    let mut nodes = vec![placeholder; n];
    let root = tables.root(1, n).map(|k| k - 1);

    let mut stack = Vec::with_capacity(n);
    if n > 0 {
        stack.push(KeyRange::new(1, n));
    }
    let mut placed = 0usize;

    while let Some(range) = stack.pop() {
        let Some(k) = tables.root(range.start, range.end) else {
            continue;
        };
        let left = KeyRange::new(range.start, k - 1);
        let right = KeyRange::new(k + 1, range.end);

        nodes[k - 1] = TreeNode {
            left: tables.root(left.start, left.end).map(|c| c - 1),
            right: tables.root(right.start, right.end).map(|c| c - 1),
            range,
        };
        placed += 1;

        if !right.is_empty() {
            stack.push(right);
        }
        if !left.is_empty() {
            stack.push(left);
        }
    }
    debug_assert_eq!(placed, n, "unfolding must place every key exactly once");

    TreeStructure { nodes, root }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::CostTableBuilder;

    fn build(p: &[f64], q: Option<&[f64]>) -> TreeStructure {
        materialize(&CostTableBuilder::new(p, q).unwrap().build())
    }

    #[test]
    fn range_len() {
        assert_eq!(KeyRange::new(3, 2).len(), 0);
        assert!(KeyRange::new(1, 0).is_empty());
        assert_eq!(KeyRange::new(2, 5).len(), 4);
        assert!(!KeyRange::new(4, 4).is_empty());
    }

    #[test]
    fn empty_tables_give_empty_tree() {
        let tree = build(&[], None);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn textbook_structure_and_ranges() {
        let tree = build(
            &[0.15, 0.10, 0.05, 0.10, 0.20],
            Some(&[0.05, 0.10, 0.05, 0.05, 0.05, 0.10][..]),
        );
        assert_eq!(tree.root(), Some(1));

        let root = tree.node(1).unwrap();
        assert_eq!((root.left, root.right), (Some(0), Some(4)));
        assert_eq!(root.range, KeyRange::new(1, 5));

        assert_eq!(tree.node(0).unwrap().range, KeyRange::new(1, 1));
        assert_eq!(tree.node(4).unwrap().range, KeyRange::new(3, 5));
        assert_eq!(tree.node(3).unwrap().range, KeyRange::new(3, 4));
        assert_eq!(tree.node(2).unwrap().range, KeyRange::new(3, 3));
        assert_eq!(tree.node(4).unwrap().left, Some(3));
        assert_eq!(tree.node(3).unwrap().left, Some(2));
    }

    #[test]
    fn ranges_contain_their_key_and_children() {
        let tree = build(&[0.21, 0.2, 0.04, 0.06, 0.08, 0.04, 0.04, 0.11, 0.19, 0.03], None);
        for (pos, node) in tree.nodes().iter().enumerate() {
            let k = pos + 1;
            assert!(node.range.start <= k && k <= node.range.end);
            if let Some(l) = node.left {
                let child = tree.node(l).unwrap().range;
                assert_eq!((child.start, child.end), (node.range.start, k - 1));
            }
            if let Some(r) = node.right {
                let child = tree.node(r).unwrap().range;
                assert_eq!((child.start, child.end), (k + 1, node.range.end));
            }
        }
    }

    #[test]
    fn geometric_weights_unfold_into_a_right_chain() {
        let p: Vec<f64> = (1..=8).map(|i| 0.5f64.powi(i)).collect();
        let tree = build(&p, None);
        assert_eq!(tree.root(), Some(0));
        for pos in 0..8 {
            let node = tree.node(pos).unwrap();
            assert_eq!(node.left, None);
            assert_eq!(node.right, if pos < 7 { Some(pos + 1) } else { None });
            assert_eq!(node.range, KeyRange::new(pos + 1, 8));
        }
    }
}
