//! Newtype wrappers for objective-space values.
//!
//! The two core value types of the crate live here:
//! - `VectorReturn`: an immutable vector-valued expected return, one
//!   component per objective
//! - `WeightVector`: a scalarization direction on the objective simplex

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance within which weight vector components must sum to 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// A policy's evaluated objective vector, one component per objective.
///
/// Immutable once created; equality is component-wise. The dimensionality is
/// fixed per run and every operation that combines two returns checks it.
///
/// # Examples
///
/// ```
/// use morl::types::VectorReturn;
///
/// let ret = VectorReturn::new(vec![3.0, 1.0])?;
/// assert_eq!(ret.dim(), 2);
/// assert_eq!(ret.get(0), Some(3.0));
/// # Ok::<(), morl::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorReturn(Vec<f64>);

impl VectorReturn {
    /// Create a new vector return, validating that every component is finite.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidObjectiveValue`] if any component is
    /// NaN or infinite, or [`crate::Error::InvalidConfiguration`] if the
    /// vector is empty.
    pub fn new(values: Vec<f64>) -> Result<Self, crate::Error> {
        if values.is_empty() {
            return Err(crate::Error::InvalidConfiguration {
                message: "vector return must have at least one objective".to_string(),
            });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(crate::Error::InvalidObjectiveValue { value, index });
            }
        }
        Ok(VectorReturn(values))
    }

    /// Number of objectives.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Get a single component, if in range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// View the components as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterate over the components.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Component-wise mean of several returns, used to average repeated
    /// evaluation rollouts of the same policy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyFront`] for an empty input and
    /// [`crate::Error::DimensionMismatch`] if the returns disagree on
    /// dimensionality.
    pub fn mean(returns: &[VectorReturn]) -> Result<VectorReturn, crate::Error> {
        let first = returns.first().ok_or(crate::Error::EmptyFront)?;
        let dim = first.dim();
        let mut accumulated = vec![0.0; dim];
        for ret in returns {
            if ret.dim() != dim {
                return Err(crate::Error::DimensionMismatch {
                    expected: dim,
                    got: ret.dim(),
                });
            }
            for (acc, value) in accumulated.iter_mut().zip(ret.iter()) {
                *acc += value;
            }
        }
        let count = returns.len() as f64;
        VectorReturn::new(accumulated.into_iter().map(|v| v / count).collect())
    }
}

impl fmt::Display for VectorReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value:.4}")?;
        }
        write!(f, ")")
    }
}

impl AsRef<[f64]> for VectorReturn {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// A scalarization direction: non-negative components summing to 1.
///
/// Weight vectors direct individual policy-training episodes toward specific
/// regions of objective space via linear scalarization.
///
/// # Examples
///
/// ```
/// use morl::types::{VectorReturn, WeightVector};
///
/// let weights = WeightVector::new(vec![0.25, 0.75])?;
/// let ret = VectorReturn::new(vec![4.0, 2.0])?;
/// assert!((weights.scalarize(&ret)? - 2.5).abs() < 1e-12);
/// # Ok::<(), morl::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    /// Create a new weight vector, validating non-negativity and that the
    /// components sum to 1 within [`WEIGHT_SUM_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidWeightVector`] on any violation.
    pub fn new(values: Vec<f64>) -> Result<Self, crate::Error> {
        if values.is_empty() {
            return Err(crate::Error::InvalidWeightVector {
                reason: "weight vector must have at least one component".to_string(),
            });
        }
        for &value in &values {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::Error::InvalidWeightVector {
                    reason: format!("component {value} must be finite and non-negative"),
                });
            }
        }
        let total: f64 = values.iter().sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(crate::Error::InvalidWeightVector {
                reason: format!("components sum to {total}, expected 1"),
            });
        }
        Ok(WeightVector(values))
    }

    /// Normalize arbitrary non-negative values onto the simplex.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidWeightVector`] if the total is zero,
    /// negative, or non-finite, or if any component is negative.
    pub fn from_unnormalized(values: Vec<f64>) -> Result<Self, crate::Error> {
        let total: f64 = values.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(crate::Error::InvalidWeightVector {
                reason: format!("cannot normalize components with total {total}"),
            });
        }
        let normalized: Vec<f64> = values.into_iter().map(|v| v / total).collect();
        WeightVector::new(normalized)
    }

    /// Uniform weights over `dim` objectives.
    pub fn uniform(dim: usize) -> Result<Self, crate::Error> {
        if dim == 0 {
            return Err(crate::Error::InvalidWeightVector {
                reason: "weight vector must have at least one component".to_string(),
            });
        }
        WeightVector::new(vec![1.0 / dim as f64; dim])
    }

    /// Number of objectives.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// View the components as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Linear scalarization: the weighted sum of a return's components.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if dimensions disagree.
    pub fn scalarize(&self, ret: &VectorReturn) -> Result<f64, crate::Error> {
        if ret.dim() != self.dim() {
            return Err(crate::Error::DimensionMismatch {
                expected: self.dim(),
                got: ret.dim(),
            });
        }
        Ok(self.0.iter().zip(ret.iter()).map(|(w, v)| w * v).sum())
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value:.4}")?;
        }
        write!(f, "]")
    }
}

impl AsRef<[f64]> for WeightVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
