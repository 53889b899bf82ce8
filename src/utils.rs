//! Assorted utilities and helpers.
//!
//! Validation of probability vectors and the tolerance used when comparing
//! costs that were accumulated in different orders.

use crate::error::{ObstError, ProbabilityKind};

/// Absolute tolerance for comparing expected costs computed along different
/// summation orders (DP recurrence vs. depth-weighted sums).
pub const COST_TOLERANCE: f64 = 1e-9;

/// Check that every entry is finite and non-negative.
///
/// Reports the first offending entry.
pub fn validate_probabilities(values: &[f64], kind: ProbabilityKind) -> Result<(), ObstError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        Some((index, &value)) => Err(ObstError::InvalidProbability { kind, index, value }),
        None => Ok(()),
    }
}

/// Compare two costs with a tolerance scaled to their magnitude.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= COST_TOLERANCE * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zeros_and_positive_values() {
        assert!(validate_probabilities(&[], ProbabilityKind::Key).is_ok());
        assert!(validate_probabilities(&[0.0, 0.25, 3.0], ProbabilityKind::Gap).is_ok());
    }

    #[test]
    fn rejects_first_bad_entry() {
        let err = validate_probabilities(&[0.1, -1.0, f64::NAN], ProbabilityKind::Key)
            .unwrap_err();
        assert_eq!(
            err,
            ObstError::InvalidProbability {
                kind: ProbabilityKind::Key,
                index: 1,
                value: -1.0
            }
        );

        let err = validate_probabilities(&[f64::INFINITY], ProbabilityKind::Gap).unwrap_err();
        assert!(matches!(
            err,
            ObstError::InvalidProbability {
                kind: ProbabilityKind::Gap,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn nan_is_rejected() {
        assert!(validate_probabilities(&[f64::NAN], ProbabilityKind::Key).is_err());
    }

    #[test]
    fn approx_eq_scales_with_magnitude() {
        assert!(approx_eq(2.75, 2.75 + 1e-12));
        assert!(!approx_eq(2.75, 2.76));
        assert!(approx_eq(1e12, 1e12 + 1e-1));
    }
}
