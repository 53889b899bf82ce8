//! Optimal binary search trees (OBST)
//!
//! Given keys in their sorted layout, the probability of searching for each
//! key, and optionally the probability of unsuccessful searches landing in
//! each gap between keys, this crate builds the binary search tree with the
//! minimum expected number of comparisons (Knuth's recurrence).
//!
//! ## Pipeline
//! 1. [`tables::CostTableBuilder`] fills the weight, cost and root-choice
//!    tables in O(n³) time and O(n²) space.
//! 2. [`materialize::materialize`] unfolds the root table into explicit
//!    left/right children, attaching to every node the range it roots.
//! 3. [`annotate::annotate`] derives depths and subtree costs from those
//!    ranges.
//! 4. [`OptimalBst`] answers read-only queries over the result.
//!
//! Construction either succeeds completely or returns an [`ObstError`];
//! afterwards nothing is mutated.
//!
//! ## Quick start
//! ```
//! use obst_dp::OptimalBst;
//!
//! let tree = OptimalBst::new(
//!     vec!["k1", "k2", "k3", "k4", "k5"],
//!     vec![0.15, 0.10, 0.05, 0.10, 0.20],
//!     Some(vec![0.05, 0.10, 0.05, 0.05, 0.05, 0.10]),
//! )
//! .unwrap();
//! assert_eq!(tree.root(), Some(&"k2"));
//! assert_eq!(tree.depth(None), Some(3));
//! assert_eq!(tree.to_string(), "((k1)k2(((k3)k4)k5))");
//! ```
//!
//! ## Features
//! - `parallel`: solve each diagonal of the cost table on the rayon pool.
//! - `tracing`: spans around the build phases.

pub mod annotate;
pub mod builder;
pub mod error;
pub mod materialize;
pub mod tables;
pub mod tree;
pub mod utils;

pub use crate::builder::ObstBuilder;
pub use crate::error::{ObstError, ProbabilityKind};
pub use crate::tables::DpTables;
pub use crate::tree::OptimalBst;
