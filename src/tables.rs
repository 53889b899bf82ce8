//! Knuth's cost-table recurrence for optimal binary search trees.
//!
//! Keys are 1-indexed inside the tables: `key[1..=n]`, gaps `q[0..=n]`.
//! A range `[i, j]` with `1 <= i <= n + 1` and `i - 1 <= j <= n` covers keys
//! `i..=j`; the empty range `[i, i - 1]` stands for the single gap `q[i - 1]`.
//!
//! ```text
//! W[i][i-1] = C[i][i-1] = q[i-1]
//! W[i][j]   = W[i][j-1] + p[j] + q[j]
//! C[i][j]   = W[i][j] + min_{i<=k<=j} (C[i][k-1] + C[k+1][j])
//! R[i][j]   = the smallest k attaining that minimum
//! ```
//!
//! Cells of one diagonal (`j - i` fixed) depend only on shorter ranges, which
//! lets the `parallel` feature solve a whole diagonal at once.

use std::borrow::Cow;

use crate::error::{ObstError, ProbabilityKind};
use crate::utils::validate_probabilities;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Weight, cost and root-choice tables for `n` keys.
///
/// Stored as flat row-major buffers of `(n + 2) x (n + 1)` cells. Only cells
/// with `j >= i - 1` are meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct DpTables {
    n: usize,
    weight: Vec<f64>,
    cost: Vec<f64>,
    // 1-based key index; 0 marks an empty range.
    root: Vec<usize>,
}

/// One solved `(i, j)` cell.
#[derive(Debug, Clone, Copy)]
struct Cell {
    weight: f64,
    cost: f64,
    root: usize,
}

impl DpTables {
    fn with_keys(n: usize) -> Self {
        let cells = (n + 2) * (n + 1);
        Self {
            n,
            weight: vec![0.0; cells],
            cost: vec![0.0; cells],
            root: vec![0; cells],
        }
    }

    #[inline]
    fn slot(&self, i: usize, j: usize) -> usize {
        i * (self.n + 1) + j
    }

    #[inline]
    fn store(&mut self, i: usize, j: usize, cell: Cell) {
        let s = self.slot(i, j);
        self.weight[s] = cell.weight;
        self.cost[s] = cell.cost;
        self.root[s] = cell.root;
    }

    fn check_range(&self, i: usize, j: usize) {
        assert!(
            i >= 1 && i <= self.n + 1 && j + 1 >= i && j <= self.n,
            "range ({i}, {j}) is outside the tables for {} keys",
            self.n
        );
    }

    /// Number of keys the tables were built for.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns true if the tables were built for zero keys.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Total probability of keys `i..=j` and the gaps `q[i-1..=j]`.
    ///
    /// # Panics
    /// Panics if `(i, j)` is not a valid range (see the module docs).
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.check_range(i, j);
        self.weight[self.slot(i, j)]
    }

    /// Minimum expected search cost of a tree over keys `i..=j`.
    ///
    /// # Panics
    /// Panics if `(i, j)` is not a valid range.
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        self.check_range(i, j);
        self.cost[self.slot(i, j)]
    }

    /// 1-based index of the key chosen as root for keys `i..=j`, or `None`
    /// for an empty range.
    ///
    /// # Panics
    /// Panics if `(i, j)` is not a valid range.
    pub fn root(&self, i: usize, j: usize) -> Option<usize> {
        self.check_range(i, j);
        match self.root[self.slot(i, j)] {
            0 => None,
            k => Some(k),
        }
    }
}

/// Fills [`DpTables`] from validated probability vectors.
#[derive(Debug, Clone)]
pub struct CostTableBuilder<'a> {
    key_probs: &'a [f64],
    gap_probs: Cow<'a, [f64]>,
}

impl<'a> CostTableBuilder<'a> {
    /// Validate the probability vectors.
    ///
    /// Missing gap probabilities default to zero.
    pub fn new(key_probs: &'a [f64], gap_probs: Option<&'a [f64]>) -> Result<Self, ObstError> {
        let n = key_probs.len();
        let gap_probs = match gap_probs {
            Some(gaps) if gaps.len() != n + 1 => {
                return Err(ObstError::GapProbabilityLength {
                    expected: n + 1,
                    actual: gaps.len(),
                });
            }
            Some(gaps) => Cow::Borrowed(gaps),
            None => Cow::Owned(vec![0.0; n + 1]),
        };
        validate_probabilities(key_probs, ProbabilityKind::Key)?;
        validate_probabilities(&gap_probs, ProbabilityKind::Gap)?;
        Ok(Self {
            key_probs,
            gap_probs,
        })
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.key_probs.len()
    }

    /// Returns true if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.key_probs.is_empty()
    }

    /// Gap probabilities, zero-filled if none were supplied.
    pub fn gap_probs(&self) -> &[f64] {
        &self.gap_probs
    }

    /// Fill the tables, diagonal by diagonal.
    ///
    /// With the `parallel` feature each diagonal is solved on the rayon pool;
    /// the result is identical to [`build_serial`](Self::build_serial).
    pub fn build(&self) -> DpTables {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("fill_tables", n = self.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        #[cfg(feature = "parallel")]
        let tables = self.build_parallel();
        #[cfg(not(feature = "parallel"))]
        let tables = self.build_serial();
        tables
    }

    /// Single-threaded fill.
    pub fn build_serial(&self) -> DpTables {
        let n = self.len();
        let mut tables = self.seed();
        for len in 1..=n {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("fill_diagonal", len);
            #[cfg(feature = "tracing")]
            let _enter = span.enter();
            for i in 1..=(n - len + 1) {
                let j = i + len - 1;
                let cell = self.solve_cell(&tables, i, j);
                tables.store(i, j, cell);
            }
        }
        tables
    }

    /// Fill with every diagonal solved concurrently.
    #[cfg(feature = "parallel")]
    pub fn build_parallel(&self) -> DpTables {
        let n = self.len();
        let mut tables = self.seed();
        for len in 1..=n {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("fill_diagonal", len);
            #[cfg(feature = "tracing")]
            let _enter = span.enter();
            let cells: Vec<Cell> = (1..=(n - len + 1))
                .into_par_iter()
                .map(|i| self.solve_cell(&tables, i, i + len - 1))
                .collect();
            for (offset, cell) in cells.into_iter().enumerate() {
                let i = offset + 1;
                tables.store(i, i + len - 1, cell);
            }
        }
        tables
    }

    /// Tables holding only the empty ranges `[i, i - 1]`.
    fn seed(&self) -> DpTables {
        let n = self.len();
        let mut tables = DpTables::with_keys(n);
        for i in 1..=(n + 1) {
            let q = self.gap_probs[i - 1];
            tables.store(
                i,
                i - 1,
                Cell {
                    weight: q,
                    cost: q,
                    root: 0,
                },
            );
        }
        tables
    }

    /// Solve `[i, j]` from the strictly shorter ranges already in `t`.
    ///
    /// Candidates are scanned with ascending `k` and replaced only on a strict
    /// improvement, so the smallest minimising root wins ties.
    fn solve_cell(&self, t: &DpTables, i: usize, j: usize) -> Cell {
        let weight = t.weight[t.slot(i, j - 1)] + self.key_probs[j - 1] + self.gap_probs[j];

        let mut best_cost = t.cost[t.slot(i, i - 1)] + t.cost[t.slot(i + 1, j)] + weight;
        let mut best_root = i;
        for k in (i + 1)..=j {
            let candidate = t.cost[t.slot(i, k - 1)] + t.cost[t.slot(k + 1, j)] + weight;
            if candidate < best_cost {
                best_cost = candidate;
                best_root = k;
            }
        }

        Cell {
            weight,
            cost: best_cost,
            root: best_root,
        }
    }
}
