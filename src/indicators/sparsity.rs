//! Sparsity indicators: crowding distances for per-point tie-breaking and a
//! whole-front diversity metric logged alongside hypervolume.

use crate::types::VectorReturn;

/// Crowding distance of every front member: the sum over objectives of the
/// gaps to the nearest neighbors on each side after sorting the front along
/// that objective.
///
/// Boundary points receive `f64::INFINITY` so they are always preferred for
/// retention. Lower values mean a denser neighborhood and therefore lower
/// priority to keep.
///
/// # Errors
///
/// Returns [`crate::Error::DimensionMismatch`] if the front members disagree
/// on dimensionality.
///
/// # Examples
///
/// ```
/// use morl::indicators::crowding_distances;
/// use morl::types::VectorReturn;
///
/// let front = vec![
///     VectorReturn::new(vec![3.0, 1.0])?,
///     VectorReturn::new(vec![2.0, 2.0])?,
///     VectorReturn::new(vec![1.0, 3.0])?,
/// ];
/// let distances = crowding_distances(&front)?;
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!((distances[1] - 4.0).abs() < 1e-12);
/// # Ok::<(), morl::Error>(())
/// ```
pub fn crowding_distances(front: &[VectorReturn]) -> Result<Vec<f64>, crate::Error> {
    if front.is_empty() {
        return Ok(Vec::new());
    }
    let dim = front[0].dim();
    for point in front {
        if point.dim() != dim {
            return Err(crate::Error::DimensionMismatch {
                expected: dim,
                got: point.dim(),
            });
        }
    }
    if front.len() <= 2 {
        return Ok(vec![f64::INFINITY; front.len()]);
    }

    let mut distances = vec![0.0_f64; front.len()];
    let mut order: Vec<usize> = (0..front.len()).collect();

    for objective in 0..dim {
        order.sort_by(|&a, &b| {
            let va = front[a].get(objective).unwrap_or(0.0);
            let vb = front[b].get(objective).unwrap_or(0.0);
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        });

        distances[order[0]] = f64::INFINITY;
        distances[order[front.len() - 1]] = f64::INFINITY;

        for window in order.windows(3) {
            let below = front[window[0]].get(objective).unwrap_or(0.0);
            let above = front[window[2]].get(objective).unwrap_or(0.0);
            let middle = window[1];
            if distances[middle].is_finite() {
                distances[middle] += above - below;
            }
        }
    }

    Ok(distances)
}

/// Whole-front sparsity: the mean squared gap between consecutive members
/// after sorting along each objective, averaged over objectives.
///
/// Higher values mean a more spread-out (sparser) front. Fronts with fewer
/// than two members have zero sparsity. Reported next to hypervolume after
/// every evaluation round.
///
/// # Errors
///
/// Returns [`crate::Error::DimensionMismatch`] if the front members disagree
/// on dimensionality.
pub fn front_sparsity(front: &[VectorReturn]) -> Result<f64, crate::Error> {
    if front.len() < 2 {
        return Ok(0.0);
    }
    let dim = front[0].dim();
    for point in front {
        if point.dim() != dim {
            return Err(crate::Error::DimensionMismatch {
                expected: dim,
                got: point.dim(),
            });
        }
    }

    let mut total = 0.0;
    let mut values: Vec<f64> = Vec::with_capacity(front.len());
    for objective in 0..dim {
        values.clear();
        values.extend(front.iter().map(|p| p.get(objective).unwrap_or(0.0)));
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        for pair in values.windows(2) {
            let gap = pair[1] - pair[0];
            total += gap * gap;
        }
    }

    Ok(total / (front.len() - 1) as f64)
}
