use crate::error::ObstError;
use crate::OptimalBst;

/// Fluent constructor for [`OptimalBst`].
///
/// ```
/// use obst_dp::ObstBuilder;
///
/// let tree = ObstBuilder::new(vec!['a', 'b', 'c'], vec![0.2, 0.5, 0.1])
///     .with_gap_probabilities(vec![0.05, 0.05, 0.05, 0.05])
///     .build()
///     .unwrap();
/// assert_eq!(tree.root(), Some(&'b'));
/// ```
pub struct ObstBuilder<K> {
    keys: Vec<K>,
    key_probs: Vec<f64>,
    gap_probs: Option<Vec<f64>>,
}

impl<K: PartialEq> ObstBuilder<K> {
    pub fn new(keys: Vec<K>, key_probs: Vec<f64>) -> Self {
        Self {
            keys,
            key_probs,
            gap_probs: None,
        }
    }
    pub fn with_gap_probabilities(mut self, gap_probs: Vec<f64>) -> Self {
        self.gap_probs = Some(gap_probs);
        self
    }
    pub fn build(self) -> Result<OptimalBst<K>, ObstError> {
        OptimalBst::from_parts(self.keys, &self.key_probs, self.gap_probs.as_deref())
    }
}
