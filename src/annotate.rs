//! Per-node statistics derived from the materialised tree.
//!
//! Depths come from one preorder walk. Subtree costs are read from the cost
//! table through the range each node carries, never by searching `R`.

use crate::materialize::TreeStructure;
use crate::tables::DpTables;

/// Depths and subtree costs, indexed by key position.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotations {
    depths: Vec<usize>,
    costs: Vec<f64>,
    gap_depths: Vec<usize>,
    height: usize,
}

impl Annotations {
    /// Depth of the key at `pos` (root = 0).
    #[inline]
    pub fn depth(&self, pos: usize) -> Option<usize> {
        self.depths.get(pos).copied()
    }

    /// Expected search cost of the subtree rooted at `pos`.
    #[inline]
    pub fn cost(&self, pos: usize) -> Option<f64> {
        self.costs.get(pos).copied()
    }

    /// Depth of the pseudo-leaf where an unsuccessful search in gap `gap`
    /// ends.
    #[inline]
    pub fn gap_depth(&self, gap: usize) -> Option<usize> {
        self.gap_depths.get(gap).copied()
    }

    /// Largest key depth, `0` for an empty tree.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depths(&self) -> &[usize] {
        &self.depths
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn gap_depths(&self) -> &[usize] {
        &self.gap_depths
    }
}

/// Annotate every key of `structure` with its depth and subtree cost.
pub fn annotate(structure: &TreeStructure, tables: &DpTables) -> Annotations {
    #[cfg(feature = "tracing")]
    let span = tracing::info_span!("annotate", n = structure.len());
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let n = structure.len();
    let mut depths = vec![0usize; n];
    let mut costs = vec![0.0f64; n];
    // With no keys the only gap is the root of the (empty) tree.
    let mut gap_depths = vec![0usize; n + 1];
    let mut height = 0usize;

    let mut stack = Vec::new();
    if let Some(root) = structure.root() {
        stack.push((root, 0usize));
    }

    while let Some((pos, depth)) = stack.pop() {
        let Some(node) = structure.node(pos) else {
            continue;
        };
        depths[pos] = depth;
        costs[pos] = tables.cost(node.range.start, node.range.end);
        height = height.max(depth);

        // Key `pos + 1` (1-based) is flanked by gaps `pos` and `pos + 1`.
        match node.left {
            Some(l) => stack.push((l, depth + 1)),
            None => gap_depths[pos] = depth + 1,
        }
        match node.right {
            Some(r) => stack.push((r, depth + 1)),
            None => gap_depths[pos + 1] = depth + 1,
        }
    }

    Annotations {
        depths,
        costs,
        gap_depths,
        height,
    }
}
