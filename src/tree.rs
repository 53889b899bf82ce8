//! Read-only query surface over a built optimal binary search tree.
//!
//! Keys are addressed by their position in the input sequence; every map
//! (children, depth, cost) is an array parallel to that sequence. Key values
//! only need `PartialEq` so they can be located by a scan of the input, never
//! by walking the tree.

use std::fmt;
use std::ops::Index;

use crate::annotate::{annotate, Annotations};
use crate::builder::ObstBuilder;
use crate::error::ObstError;
use crate::materialize::{materialize, TreeNode, TreeStructure};
use crate::tables::{CostTableBuilder, DpTables};

/// Cost-optimal binary search tree over a static key distribution.
///
/// ```
/// use obst_dp::OptimalBst;
///
/// let keys = vec!["k1", "k2", "k3", "k4", "k5"];
/// let tree = OptimalBst::new(
///     keys,
///     vec![0.15, 0.10, 0.05, 0.10, 0.20],
///     Some(vec![0.05, 0.10, 0.05, 0.05, 0.05, 0.10]),
/// )
/// .unwrap();
///
/// assert_eq!(tree.root(), Some(&"k2"));
/// assert_eq!(tree.children(Some(&"k2")), (Some(&"k1"), Some(&"k5")));
/// assert_eq!(tree.to_string(), "((k1)k2(((k3)k4)k5))");
/// assert!((tree.total_cost() - 2.75).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct OptimalBst<K> {
    keys: Vec<K>,
    tables: DpTables,
    structure: TreeStructure,
    annotations: Annotations,
}

impl<K: PartialEq> OptimalBst<K> {
    /// Build the optimal tree.
    ///
    /// `gap_probs[g]` weights searches that fall before the first key
    /// (`g = 0`), between keys `g` and `g + 1`, or after the last key
    /// (`g = n`). `None` means every gap has probability zero.
    ///
    /// # Errors
    /// Fails if the vector lengths disagree, a probability is negative or
    /// not finite, or a key is repeated.
    pub fn new(
        keys: Vec<K>,
        key_probs: Vec<f64>,
        gap_probs: Option<Vec<f64>>,
    ) -> Result<Self, ObstError> {
        Self::from_parts(keys, &key_probs, gap_probs.as_deref())
    }

    /// Start a fluent [`ObstBuilder`].
    pub fn builder(keys: Vec<K>, key_probs: Vec<f64>) -> ObstBuilder<K> {
        ObstBuilder::new(keys, key_probs)
    }

    pub(crate) fn from_parts(
        keys: Vec<K>,
        key_probs: &[f64],
        gap_probs: Option<&[f64]>,
    ) -> Result<Self, ObstError> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("obst_build", n = keys.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        if keys.len() != key_probs.len() {
            return Err(ObstError::KeyProbabilityLength {
                keys: keys.len(),
                probabilities: key_probs.len(),
            });
        }
        check_distinct(&keys)?;

        let tables = CostTableBuilder::new(key_probs, gap_probs)?.build();
        let structure = materialize(&tables);
        let annotations = annotate(&structure, &tables);

        #[cfg(feature = "tracing")]
        {
            let cost = if keys.is_empty() {
                0.0
            } else {
                tables.cost(1, keys.len())
            };
            tracing::debug!(
                n = keys.len(),
                root = ?structure.root(),
                height = annotations.height(),
                cost,
                "optimal tree built"
            );
        }

        Ok(Self {
            keys,
            tables,
            structure,
            annotations,
        })
    }

    /// Input position of `key`.
    pub fn position(&self, key: &K) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Returns true if `key` is one of the keys the tree was built from.
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Left and right child of `key`, or of the root when `key` is `None`.
    ///
    /// An unknown key, or an empty tree, yields `(None, None)`.
    pub fn children(&self, key: Option<&K>) -> (Option<&K>, Option<&K>) {
        let pos = match key {
            Some(k) => self.position(k),
            None => self.structure.root(),
        };
        match pos.and_then(|p| self.structure.node(p)) {
            Some(node) => (self.key_at(node.left), self.key_at(node.right)),
            None => (None, None),
        }
    }

    /// Depth of `key` (root = 0), or the height of the tree when `key` is
    /// `None`. Unknown keys yield `None`.
    pub fn depth(&self, key: Option<&K>) -> Option<usize> {
        match key {
            Some(k) => self.position(k).and_then(|p| self.annotations.depth(p)),
            None => Some(self.height()),
        }
    }

    /// Expected search cost of the subtree rooted at `key`, or of the whole
    /// tree when `key` is `None`. Unknown keys yield `None`.
    pub fn expected_cost(&self, key: Option<&K>) -> Option<f64> {
        match key {
            Some(k) => self.position(k).and_then(|p| self.annotations.cost(p)),
            None => Some(self.total_cost()),
        }
    }

    /// Keys compared, root first, when searching for `key`.
    ///
    /// The path has `depth(key) + 1` entries and ends at `key`; `None` if the
    /// key is unknown.
    pub fn search_path(&self, key: &K) -> Option<Vec<&K>> {
        let target = self.position(key)?;
        let mut path = Vec::with_capacity(self.height() + 1);
        let mut cursor = self.structure.root();
        while let Some(pos) = cursor {
            path.push(&self.keys[pos]);
            let node = self.structure.node(pos)?;
            cursor = match target.cmp(&pos) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => return Some(path),
            };
        }
        None
    }
}

impl<K> OptimalBst<K> {
    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the tree holds no key.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The `index`-th key in input order, independent of tree shape.
    pub fn get(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    /// Keys in input order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Iterate the keys in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    /// Root key, `None` for an empty tree.
    pub fn root(&self) -> Option<&K> {
        self.key_at(self.structure.root())
    }

    /// Largest depth over all keys, `0` for an empty tree.
    pub fn height(&self) -> usize {
        self.annotations.height()
    }

    /// Minimum expected search cost `C[1][n]`, `0` for an empty tree.
    pub fn total_cost(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.tables.cost(1, self.len())
        }
    }

    /// Depth of the pseudo-leaf reached by an unsuccessful search in gap
    /// `gap` (`0..=len()`).
    pub fn gap_depth(&self, gap: usize) -> Option<usize> {
        self.annotations.gap_depth(gap)
    }

    /// The DP tables the tree was derived from.
    pub fn tables(&self) -> &DpTables {
        &self.tables
    }

    /// Materialised node for input position `pos`.
    pub fn node(&self, pos: usize) -> Option<&TreeNode> {
        self.structure.node(pos)
    }

    /// Keys in symmetric (in-order) tree order.
    ///
    /// For a valid search tree this reproduces the input order.
    pub fn in_order(&self) -> InOrder<'_, K> {
        InOrder {
            tree: self,
            stack: Vec::new(),
            cursor: self.structure.root(),
        }
    }

    #[inline]
    fn key_at(&self, pos: Option<usize>) -> Option<&K> {
        pos.map(|p| &self.keys[p])
    }
}

/// Reject repeated keys, reporting the first repetition found.
fn check_distinct<K: PartialEq>(keys: &[K]) -> Result<(), ObstError> {
    for (second, key) in keys.iter().enumerate() {
        if let Some(first) = keys[..second].iter().position(|k| k == key) {
            return Err(ObstError::DuplicateKey { first, second });
        }
    }
    Ok(())
}

/// In-order traversal, see [`OptimalBst::in_order`].
pub struct InOrder<'a, K> {
    tree: &'a OptimalBst<K>,
    stack: Vec<usize>,
    cursor: Option<usize>,
}

impl<'a, K> Iterator for InOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pos) = self.cursor {
            self.stack.push(pos);
            self.cursor = self.tree.structure.node(pos).and_then(|n| n.left);
        }
        let pos = self.stack.pop()?;
        self.cursor = self.tree.structure.node(pos).and_then(|n| n.right);
        Some(&self.tree.keys[pos])
    }
}

impl<K> Index<usize> for OptimalBst<K> {
    type Output = K;

    /// # Panics
    /// Panics if `index >= len()`.
    fn index(&self, index: usize) -> &K {
        &self.keys[index]
    }
}

impl<'a, K> IntoIterator for &'a OptimalBst<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

enum Render {
    Enter(usize),
    Key(usize),
    Close,
}

/// Parenthesised rendering: `"(" + left + key + right + ")"`, empty for an
/// empty tree.
impl<K: fmt::Display> fmt::Display for OptimalBst<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<Render> = self.structure.root().map(Render::Enter).into_iter().collect();
        while let Some(step) = stack.pop() {
            match step {
                Render::Enter(pos) => {
                    f.write_str("(")?;
                    stack.push(Render::Close);
                    if let Some(node) = self.structure.node(pos) {
                        if let Some(r) = node.right {
                            stack.push(Render::Enter(r));
                        }
                        stack.push(Render::Key(pos));
                        if let Some(l) = node.left {
                            stack.push(Render::Enter(l));
                        }
                    }
                }
                Render::Key(pos) => write!(f, "{}", self.keys[pos])?,
                Render::Close => f.write_str(")")?,
            }
        }
        Ok(())
    }
}
