//! Pareto dominance over vector returns.
//!
//! This module provides the dominance relation at the center of archive
//! admission: pairwise checks under per-objective optimization senses and
//! non-dominated-front extraction over point sets.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::types::VectorReturn;

/// Optimization direction for a single objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ObjectiveSense {
    /// Larger values are better.
    #[default]
    Maximize,
    /// Smaller values are better.
    Minimize,
}

impl ObjectiveSense {
    /// True iff `a` is at least as good as `b` under this sense.
    fn at_least(self, a: f64, b: f64) -> bool {
        match self {
            ObjectiveSense::Maximize => a >= b,
            ObjectiveSense::Minimize => a <= b,
        }
    }

    /// True iff `a` is strictly better than `b` under this sense.
    fn strictly_better(self, a: f64, b: f64) -> bool {
        match self {
            ObjectiveSense::Maximize => a > b,
            ObjectiveSense::Minimize => a < b,
        }
    }

    /// Signed improvement of `value` over `baseline` under this sense.
    ///
    /// Positive when `value` is on the better side of `baseline`. Used by the
    /// indicators to fold minimization objectives into the maximization
    /// convention.
    pub(crate) fn gain(self, value: f64, baseline: f64) -> f64 {
        match self {
            ObjectiveSense::Maximize => value - baseline,
            ObjectiveSense::Minimize => baseline - value,
        }
    }
}

impl fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObjectiveSense::Maximize => "maximize",
            ObjectiveSense::Minimize => "minimize",
        };
        f.write_str(label)
    }
}

impl FromStr for ObjectiveSense {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maximize" | "max" => Ok(ObjectiveSense::Maximize),
            "minimize" | "min" => Ok(ObjectiveSense::Minimize),
            _ => Err(crate::Error::ParseSense {
                input: s.to_string(),
                expected: "maximize/max, minimize/min".to_string(),
            }),
        }
    }
}

/// Dominance checks and front extraction under fixed per-objective senses.
///
/// # Examples
///
/// ```
/// use morl::dominance::DominanceEngine;
/// use morl::types::VectorReturn;
///
/// let engine = DominanceEngine::maximizing(2);
/// let a = VectorReturn::new(vec![2.0, 2.0])?;
/// let b = VectorReturn::new(vec![1.0, 2.0])?;
/// assert!(engine.dominates(&a, &b)?);
/// assert!(!engine.dominates(&b, &a)?);
/// # Ok::<(), morl::Error>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DominanceEngine {
    senses: Vec<ObjectiveSense>,
}

impl DominanceEngine {
    /// Create an engine with an explicit sense per objective.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `senses` is empty.
    pub fn new(senses: Vec<ObjectiveSense>) -> Result<Self, crate::Error> {
        if senses.is_empty() {
            return Err(crate::Error::InvalidConfiguration {
                message: "dominance engine requires at least one objective sense".to_string(),
            });
        }
        Ok(Self { senses })
    }

    /// All-maximizing engine over `dim` objectives, the common case.
    pub fn maximizing(dim: usize) -> Self {
        Self {
            senses: vec![ObjectiveSense::Maximize; dim],
        }
    }

    /// Number of objectives this engine compares.
    pub fn dim(&self) -> usize {
        self.senses.len()
    }

    /// The configured per-objective senses.
    pub fn senses(&self) -> &[ObjectiveSense] {
        &self.senses
    }

    /// Pareto dominance: `a` dominates `b` iff `a` is at least as good in
    /// every objective and strictly better in at least one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if either vector's
    /// dimensionality disagrees with the engine's.
    pub fn dominates(&self, a: &VectorReturn, b: &VectorReturn) -> Result<bool, crate::Error> {
        self.check_dim(a)?;
        self.check_dim(b)?;

        let mut any_strict = false;
        for ((sense, a_i), b_i) in self.senses.iter().zip(a.iter()).zip(b.iter()) {
            if !sense.at_least(a_i, b_i) {
                return Ok(false);
            }
            if sense.strictly_better(a_i, b_i) {
                any_strict = true;
            }
        }
        Ok(any_strict)
    }

    /// Indices of the non-dominated members of `points`.
    ///
    /// Deterministic given the input order: mutually non-dominating points
    /// are all retained, except exact duplicates (component-wise equality),
    /// of which only the first occurrence survives.
    ///
    /// Pairwise comparison is O(n²·d), acceptable for archive sizes in the
    /// hundreds typical of MORL.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if any point's
    /// dimensionality disagrees with the engine's.
    pub fn non_dominated_indices(&self, points: &[VectorReturn]) -> Result<Vec<usize>, crate::Error> {
        for point in points {
            self.check_dim(point)?;
        }

        let mut front = Vec::new();
        'candidates: for (i, candidate) in points.iter().enumerate() {
            for (j, other) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                if self.dominates(other, candidate)? {
                    continue 'candidates;
                }
                // Duplicates collapse to the earliest occurrence.
                if j < i && other == candidate {
                    continue 'candidates;
                }
            }
            front.push(i);
        }
        Ok(front)
    }

    /// The non-dominated subset of `points`, preserving input order.
    ///
    /// # Errors
    ///
    /// Same as [`DominanceEngine::non_dominated_indices`].
    pub fn non_dominated_front(&self, points: &[VectorReturn]) -> Result<Vec<VectorReturn>, crate::Error> {
        let indices = self.non_dominated_indices(points)?;
        Ok(indices.into_iter().map(|i| points[i].clone()).collect())
    }

    fn check_dim(&self, point: &VectorReturn) -> Result<(), crate::Error> {
        if point.dim() != self.senses.len() {
            return Err(crate::Error::DimensionMismatch {
                expected: self.senses.len(),
                got: point.dim(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vr(values: &[f64]) -> VectorReturn {
        VectorReturn::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_dominates_basic() {
        let engine = DominanceEngine::maximizing(2);
        assert!(engine.dominates(&vr(&[2.0, 2.0]), &vr(&[1.0, 1.0])).unwrap());
        assert!(engine.dominates(&vr(&[2.0, 1.0]), &vr(&[1.0, 1.0])).unwrap());
        assert!(!engine.dominates(&vr(&[1.0, 1.0]), &vr(&[1.0, 1.0])).unwrap());
        assert!(!engine.dominates(&vr(&[2.0, 0.0]), &vr(&[1.0, 1.0])).unwrap());
    }

    #[test]
    fn test_dominance_is_asymmetric() {
        let engine = DominanceEngine::maximizing(2);
        let points = [vr(&[3.0, 1.0]), vr(&[1.0, 3.0]), vr(&[2.0, 2.0]), vr(&[4.0, 4.0])];
        for a in &points {
            for b in &points {
                if a == b {
                    continue;
                }
                let forward = engine.dominates(a, b).unwrap();
                let backward = engine.dominates(b, a).unwrap();
                assert!(!(forward && backward), "dominance must be asymmetric for {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_minimization_sense() {
        let engine =
            DominanceEngine::new(vec![ObjectiveSense::Minimize, ObjectiveSense::Maximize]).unwrap();
        // Lower cost and higher reward dominates.
        assert!(engine.dominates(&vr(&[1.0, 5.0]), &vr(&[2.0, 4.0])).unwrap());
        assert!(!engine.dominates(&vr(&[2.0, 4.0]), &vr(&[1.0, 5.0])).unwrap());
    }

    #[test]
    fn test_dimension_mismatch() {
        let engine = DominanceEngine::maximizing(2);
        let result = engine.dominates(&vr(&[1.0]), &vr(&[1.0, 2.0]));
        assert!(matches!(result, Err(crate::Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_non_dominated_front() {
        let engine = DominanceEngine::maximizing(2);
        let points = vec![
            vr(&[3.0, 1.0]),
            vr(&[1.0, 3.0]),
            vr(&[2.0, 2.0]),
            vr(&[0.5, 0.5]), // dominated by (2, 2)
        ];
        let front = engine.non_dominated_front(&points).unwrap();
        assert_eq!(front.len(), 3);
        assert!(!front.contains(&vr(&[0.5, 0.5])));
    }

    #[test]
    fn test_front_is_idempotent() {
        let engine = DominanceEngine::maximizing(2);
        let points = vec![vr(&[3.0, 1.0]), vr(&[1.0, 3.0]), vr(&[2.0, 2.0]), vr(&[1.0, 1.0])];
        let front = engine.non_dominated_front(&points).unwrap();
        let again = engine.non_dominated_front(&front).unwrap();
        assert_eq!(front, again);
    }

    #[test]
    fn test_duplicates_collapse() {
        let engine = DominanceEngine::maximizing(2);
        let points = vec![vr(&[1.0, 2.0]), vr(&[1.0, 2.0]), vr(&[2.0, 1.0])];
        let front = engine.non_dominated_front(&points).unwrap();
        assert_eq!(front.len(), 2);
    }

    #[test]
    fn test_sense_parsing() {
        assert_eq!("max".parse::<ObjectiveSense>().unwrap(), ObjectiveSense::Maximize);
        assert_eq!("Minimize".parse::<ObjectiveSense>().unwrap(), ObjectiveSense::Minimize);
        assert!("upward".parse::<ObjectiveSense>().is_err());
    }
}
