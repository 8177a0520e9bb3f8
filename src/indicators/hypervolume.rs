//! Hypervolume indicator: the Lebesgue measure of objective space dominated
//! by a front relative to a reference point.
//!
//! Two objectives use the closed-form sorted sweep (O(n log n)); higher
//! dimensions use recursive slicing along the last objective. The exact
//! exponential worst case is acceptable because archive fronts stay small.

use serde::{Deserialize, Serialize};

use crate::{
    dominance::ObjectiveSense,
    types::VectorReturn,
};

/// Hypervolume computation against a fixed reference point.
///
/// All values are folded into the maximization convention internally: a
/// point's per-objective *gain* is its signed improvement over the reference
/// under that objective's sense, and only points with strictly positive gain
/// in every objective (i.e. points that dominate the reference) contribute
/// volume.
///
/// # Examples
///
/// ```
/// use morl::indicators::HypervolumeIndicator;
/// use morl::types::VectorReturn;
///
/// let reference = VectorReturn::new(vec![0.0, 0.0])?;
/// let indicator = HypervolumeIndicator::maximizing(reference);
///
/// let front = vec![
///     VectorReturn::new(vec![3.0, 1.0])?,
///     VectorReturn::new(vec![1.0, 3.0])?,
///     VectorReturn::new(vec![2.0, 2.0])?,
/// ];
/// // 3x1 strip + 2x1 strip + 1x1 strip
/// assert!((indicator.hypervolume(&front)? - 6.0).abs() < 1e-12);
/// # Ok::<(), morl::Error>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypervolumeIndicator {
    reference: VectorReturn,
    senses: Vec<ObjectiveSense>,
}

impl HypervolumeIndicator {
    /// Create an indicator with an explicit sense per objective.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if `senses` and the
    /// reference point disagree on dimensionality.
    pub fn new(reference: VectorReturn, senses: Vec<ObjectiveSense>) -> Result<Self, crate::Error> {
        if senses.len() != reference.dim() {
            return Err(crate::Error::DimensionMismatch {
                expected: reference.dim(),
                got: senses.len(),
            });
        }
        Ok(Self { reference, senses })
    }

    /// All-maximizing indicator, the common case.
    pub fn maximizing(reference: VectorReturn) -> Self {
        let senses = vec![ObjectiveSense::Maximize; reference.dim()];
        Self { reference, senses }
    }

    /// The configured reference point.
    pub fn reference(&self) -> &VectorReturn {
        &self.reference
    }

    /// The configured per-objective senses.
    pub fn senses(&self) -> &[ObjectiveSense] {
        &self.senses
    }

    /// Number of objectives.
    pub fn dim(&self) -> usize {
        self.reference.dim()
    }

    /// Hypervolume dominated by `front` relative to the reference point.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidReference`] if any front point does not
    /// strictly dominate the reference point, and
    /// [`crate::Error::DimensionMismatch`] on dimensionality disagreement.
    pub fn hypervolume(&self, front: &[VectorReturn]) -> Result<f64, crate::Error> {
        let mut gains = Vec::with_capacity(front.len());
        for point in front {
            match self.gains_of(point)? {
                Some(g) => gains.push(g),
                None => {
                    return Err(crate::Error::InvalidReference {
                        point: point.to_string(),
                        reference: self.reference.to_string(),
                    });
                }
            }
        }
        Ok(dominated_volume(&mut gains))
    }

    /// Hypervolume with points that fail to dominate the reference excluded
    /// from accounting rather than rejected.
    ///
    /// This is the archive's working view: an entry with an undefined
    /// indicator value stays archived but contributes no volume.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] on dimensionality
    /// disagreement.
    pub fn hypervolume_excluding_invalid(&self, front: &[VectorReturn]) -> Result<f64, crate::Error> {
        let mut gains = Vec::with_capacity(front.len());
        for point in front {
            if let Some(g) = self.gains_of(point)? {
                gains.push(g);
            }
        }
        Ok(dominated_volume(&mut gains))
    }

    /// Exclusive hypervolume contribution of `point` with respect to `front`.
    ///
    /// Computed as the difference between the front's hypervolume with and
    /// without one occurrence of `point` (the point is added first when not
    /// already a member). Clamped at zero so cancellation noise never yields
    /// a negative epsilon. Points that fail to dominate the reference are
    /// excluded from accounting, so their contribution is zero.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] on dimensionality
    /// disagreement.
    pub fn contribution(
        &self,
        point: &VectorReturn,
        front: &[VectorReturn],
    ) -> Result<f64, crate::Error> {
        let mut removed = false;
        let mut rest: Vec<VectorReturn> = Vec::with_capacity(front.len());
        for member in front {
            if !removed && member == point {
                removed = true;
            } else {
                rest.push(member.clone());
            }
        }

        let without = self.hypervolume_excluding_invalid(&rest)?;
        let with = if removed {
            self.hypervolume_excluding_invalid(front)?
        } else {
            rest.push(point.clone());
            self.hypervolume_excluding_invalid(&rest)?
        };

        Ok((with - without).max(0.0))
    }

    /// Per-objective gains of `point` over the reference, or `None` if the
    /// point does not strictly dominate the reference.
    fn gains_of(&self, point: &VectorReturn) -> Result<Option<Vec<f64>>, crate::Error> {
        if point.dim() != self.reference.dim() {
            return Err(crate::Error::DimensionMismatch {
                expected: self.reference.dim(),
                got: point.dim(),
            });
        }
        let mut gains = Vec::with_capacity(point.dim());
        for ((sense, value), baseline) in self.senses.iter().zip(point.iter()).zip(self.reference.iter()) {
            let gain = sense.gain(value, baseline);
            if gain <= 0.0 {
                return Ok(None);
            }
            gains.push(gain);
        }
        Ok(Some(gains))
    }
}

/// Volume of the union of axis-aligned boxes `[0, g]` for gain vectors `g`.
///
/// Dispatches on dimensionality: closed forms for one and two objectives,
/// recursive slicing along the last objective above that.
fn dominated_volume(gains: &mut [Vec<f64>]) -> f64 {
    if gains.is_empty() {
        return 0.0;
    }
    match gains[0].len() {
        0 => 0.0,
        1 => gains.iter().map(|g| g[0]).fold(0.0, f64::max),
        2 => sweep_2d(gains),
        _ => slice_recursive(gains),
    }
}

/// Sorted sweep for two objectives: sort descending by the first gain and
/// accumulate the exclusive strip each point adds above the running maximum
/// of the second gain.
fn sweep_2d(gains: &mut [Vec<f64>]) -> f64 {
    gains.sort_by(|a, b| b[0].partial_cmp(&a[0]).unwrap_or(std::cmp::Ordering::Equal));

    let mut volume = 0.0;
    let mut covered_height = 0.0;
    for g in gains.iter() {
        if g[1] > covered_height {
            volume += g[0] * (g[1] - covered_height);
            covered_height = g[1];
        }
    }
    volume
}

/// Recursive slicing along the last objective for three or more objectives.
///
/// Points are sorted descending on the last gain; each slice between
/// consecutive levels multiplies its depth by the (d-1)-dimensional volume of
/// the points reaching that level.
fn slice_recursive(gains: &mut [Vec<f64>]) -> f64 {
    let last = gains[0].len() - 1;
    gains.sort_by(|a, b| b[last].partial_cmp(&a[last]).unwrap_or(std::cmp::Ordering::Equal));

    let mut volume = 0.0;
    for i in 0..gains.len() {
        let level = gains[i][last];
        let next_level = gains.get(i + 1).map(|g| g[last]).unwrap_or(0.0);
        let depth = level - next_level;
        if depth <= 0.0 {
            continue;
        }
        let mut projected: Vec<Vec<f64>> = gains[..=i].iter().map(|g| g[..last].to_vec()).collect();
        volume += depth * dominated_volume(&mut projected);
    }
    volume
}
