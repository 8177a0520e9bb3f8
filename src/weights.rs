//! Weight vector generation and adaptation.
//!
//! Scalarization weight vectors steer individual policy-training episodes
//! toward specific regions of objective space. Initial coverage is a
//! deterministic simplex lattice; afterwards, new vectors target the
//! sparsest region of the current front, scored with the hypervolume-minus-
//! sparsity mixture criterion.

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    indicators::{HypervolumeIndicator, front_sparsity},
    types::{VectorReturn, WeightVector},
    utils::{coefficient_of_variation, uniform_simplex_sample},
};

/// Contributions whose coefficient of variation falls below this are treated
/// as statistically indistinguishable.
const STALL_CV_EPSILON: f64 = 1e-3;

/// Generates and adapts scalarization weight vectors from archive feedback.
///
/// Regions of objective space already well covered receive lower sampling
/// density; sparse regions are targeted directly. When the archive has
/// converged (no hypervolume improvement and indistinguishable
/// contributions), a stall counter caps further adaptation and
/// [`WeightVectorManager::is_stalled`] signals convergence to the caller.
pub struct WeightVectorManager {
    indicator: HypervolumeIndicator,
    max_stall: usize,
    improvement_epsilon: f64,
    stall_count: usize,
    best_hypervolume: Option<f64>,
    rng: StdRng,
}

impl WeightVectorManager {
    /// Create a manager.
    ///
    /// `max_stall` is the number of non-improving feedback rounds tolerated
    /// before [`WeightVectorManager::is_stalled`] reports convergence; zero
    /// disables stall detection. `improvement_epsilon` is the minimum
    /// hypervolume gain that counts as improvement.
    pub fn new(indicator: HypervolumeIndicator, max_stall: usize, improvement_epsilon: f64) -> Self {
        Self {
            indicator,
            max_stall,
            improvement_epsilon,
            stall_count: 0,
            best_hypervolume: None,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seed the manager's internal random number generator for
    /// reproducible fallback sampling.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Builder-style seeding.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    /// Number of objectives.
    pub fn dim(&self) -> usize {
        self.indicator.dim()
    }

    /// Deterministic, evenly-spaced initial coverage of the objective
    /// simplex: `n` weight vectors from the smallest simplex lattice with at
    /// least `n` members, thinned evenly when the lattice is larger.
    ///
    /// For two objectives this reproduces the linspace sweep from one
    /// extreme to the other.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `n` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use morl::indicators::HypervolumeIndicator;
    /// use morl::types::VectorReturn;
    /// use morl::weights::WeightVectorManager;
    ///
    /// let indicator = HypervolumeIndicator::maximizing(VectorReturn::new(vec![0.0, 0.0])?);
    /// let manager = WeightVectorManager::new(indicator, 10, 1e-6);
    /// let initial = manager.initial(5)?;
    /// assert_eq!(initial.len(), 5);
    /// assert_eq!(initial[2].as_slice(), &[0.5, 0.5]);
    /// # Ok::<(), morl::Error>(())
    /// ```
    pub fn initial(&self, n: usize) -> Result<Vec<WeightVector>, crate::Error> {
        if n == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "initial weight coverage requires at least one vector".to_string(),
            });
        }
        let dim = self.dim();
        if dim == 1 {
            return Ok(vec![WeightVector::new(vec![1.0])?; n]);
        }

        let mut divisions = 1;
        while lattice_size(divisions, dim) < n {
            divisions += 1;
        }

        let lattice = simplex_lattice(divisions, dim);
        let step = lattice.len() as f64 / n as f64;

        let mut vectors = Vec::with_capacity(n);
        for i in 0..n {
            let index = ((i as f64 * step) as usize).min(lattice.len() - 1);
            vectors.push(WeightVector::new(lattice[index].clone())?);
        }
        Ok(vectors)
    }

    /// Adaptive selection: a weight vector whose scalarization optimum is
    /// expected to land in the sparsest region of `front`.
    ///
    /// Candidate targets are the midpoints of neighboring front points;
    /// each is scored with the hypervolume-minus-sparsity mixture criterion
    /// and the winner's gains over the reference point are normalized onto
    /// the simplex. Falls back to uniform random simplex sampling when the
    /// front has fewer than two points (insufficient signal) or no candidate
    /// target dominates the reference.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if front members disagree
    /// with the configured dimensionality.
    pub fn next(&mut self, front: &[VectorReturn]) -> Result<WeightVector, crate::Error> {
        let dim = self.dim();
        if front.len() < 2 {
            return WeightVector::new(uniform_simplex_sample(&mut self.rng, dim));
        }

        let mut order: Vec<usize> = (0..front.len()).collect();
        order.sort_by(|&a, &b| {
            let va = front[a].get(0).unwrap_or(0.0);
            let vb = front[b].get(0).unwrap_or(0.0);
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut best: Option<(f64, VectorReturn)> = None;
        let mut extended = front.to_vec();
        for pair in order.windows(2) {
            let a = &front[pair[0]];
            let b = &front[pair[1]];
            let midpoint = VectorReturn::new(
                a.iter().zip(b.iter()).map(|(x, y)| 0.5 * (x + y)).collect(),
            )?;

            extended.push(midpoint.clone());
            let score = self.indicator.hypervolume_excluding_invalid(&extended)?
                - front_sparsity(&extended)?;
            extended.pop();

            if best.as_ref().is_none_or(|(s, _)| score > *s) {
                best = Some((score, midpoint));
            }
        }

        if let Some((_, target)) = best {
            let gains: Vec<f64> = self
                .indicator
                .senses()
                .iter()
                .zip(target.iter())
                .zip(self.indicator.reference().iter())
                .map(|((sense, value), baseline)| sense.gain(value, baseline).max(0.0))
                .collect();
            if gains.iter().sum::<f64>() > 0.0 {
                return WeightVector::from_unnormalized(gains);
            }
        }

        WeightVector::new(uniform_simplex_sample(&mut self.rng, dim))
    }

    /// Record archive feedback after a submission round.
    ///
    /// A hypervolume improvement beyond the configured epsilon resets the
    /// stall counter. A non-improving round counts toward the stall cap only
    /// once the front's contributions have become statistically
    /// indistinguishable; while they still differ, the front is re-shaping
    /// and adaptation continues.
    pub fn observe_front(&mut self, front: &[VectorReturn]) -> Result<(), crate::Error> {
        let hypervolume = self.indicator.hypervolume_excluding_invalid(front)?;

        let improved = match self.best_hypervolume {
            None => true,
            Some(best) => hypervolume > best + self.improvement_epsilon,
        };
        if improved {
            self.best_hypervolume = Some(hypervolume);
            self.stall_count = 0;
            return Ok(());
        }

        let mut contributions = Vec::with_capacity(front.len());
        for point in front {
            contributions.push(self.indicator.contribution(point, front)?);
        }
        match coefficient_of_variation(&contributions) {
            Some(cv) if cv > STALL_CV_EPSILON => {}
            _ => self.stall_count += 1,
        }
        Ok(())
    }

    /// True iff the configured number of non-improving rounds has been
    /// reached.
    pub fn is_stalled(&self) -> bool {
        self.max_stall > 0 && self.stall_count >= self.max_stall
    }

    /// Current consecutive non-improving round count.
    pub fn stall_count(&self) -> usize {
        self.stall_count
    }
}

/// Number of lattice points for `divisions` subdivisions in `dim`
/// dimensions: C(divisions + dim - 1, dim - 1).
fn lattice_size(divisions: usize, dim: usize) -> usize {
    let mut size: u128 = 1;
    for i in 0..(dim - 1) {
        size = size.saturating_mul((divisions + i + 1) as u128) / (i + 1) as u128;
    }
    size.min(usize::MAX as u128) as usize
}

/// All compositions of `divisions` into `dim` non-negative parts, scaled to
/// the simplex, ordered by descending first component.
fn simplex_lattice(divisions: usize, dim: usize) -> Vec<Vec<f64>> {
    let mut lattice = Vec::new();
    let mut parts = vec![0usize; dim];
    fill_compositions(divisions, 0, &mut parts, &mut lattice);
    for point in lattice.iter_mut() {
        for value in point.iter_mut() {
            *value /= divisions as f64;
        }
    }
    lattice
}

fn fill_compositions(
    remaining: usize,
    index: usize,
    parts: &mut Vec<usize>,
    out: &mut Vec<Vec<f64>>,
) {
    if index == parts.len() - 1 {
        parts[index] = remaining;
        out.push(parts.iter().map(|&p| p as f64).collect());
        return;
    }
    for value in (0..=remaining).rev() {
        parts[index] = value;
        fill_compositions(remaining - value, index + 1, parts, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vr(values: &[f64]) -> VectorReturn {
        VectorReturn::new(values.to_vec()).unwrap()
    }

    fn manager(max_stall: usize) -> WeightVectorManager {
        let indicator = HypervolumeIndicator::maximizing(vr(&[0.0, 0.0]));
        WeightVectorManager::new(indicator, max_stall, 1e-9).with_seed(42)
    }

    #[test]
    fn test_initial_is_valid_simplex_coverage() {
        let manager = manager(10);
        for n in [1, 2, 5, 7, 11] {
            let vectors = manager.initial(n).unwrap();
            assert_eq!(vectors.len(), n);
            for weights in &vectors {
                let total: f64 = weights.as_slice().iter().sum();
                assert!((total - 1.0).abs() < 1e-9, "sum was {total}");
                assert!(weights.as_slice().iter().all(|&w| w >= 0.0));
            }
        }
    }

    #[test]
    fn test_initial_two_objectives_is_linspace() {
        let manager = manager(10);
        let vectors = manager.initial(5).unwrap();
        let firsts: Vec<f64> = vectors.iter().map(|w| w.as_slice()[0]).collect();
        assert_eq!(firsts, vec![1.0, 0.75, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_initial_three_objectives() {
        let indicator = HypervolumeIndicator::maximizing(vr(&[0.0, 0.0, 0.0]));
        let manager = WeightVectorManager::new(indicator, 10, 1e-9);
        let vectors = manager.initial(6).unwrap();
        assert_eq!(vectors.len(), 6);
        assert!(vectors.iter().all(|w| w.dim() == 3));
    }

    #[test]
    fn test_initial_zero_is_invalid() {
        assert!(manager(10).initial(0).is_err());
    }

    #[test]
    fn test_next_falls_back_to_random_on_small_front() {
        let mut manager = manager(10);
        let weights = manager.next(&[]).unwrap();
        assert_eq!(weights.dim(), 2);
        let weights = manager.next(&[vr(&[1.0, 1.0])]).unwrap();
        assert_eq!(weights.dim(), 2);
    }

    #[test]
    fn test_next_targets_widest_gap() {
        let mut manager = manager(10);
        // One wide gap between (8, 1) and (1, 8), plus a crowded pair near
        // the first extreme. The midpoint of the wide gap is (4.5, 4.5),
        // giving equal weights.
        let front = vec![vr(&[8.0, 1.0]), vr(&[7.8, 1.1]), vr(&[1.0, 8.0])];
        let weights = manager.next(&front).unwrap();
        let slice = weights.as_slice();
        assert!((slice[0] - 0.5).abs() < 0.05, "weights were {weights}");
    }

    #[test]
    fn test_stall_detection() {
        let mut manager = manager(3);
        let front = vec![vr(&[3.0, 1.0]), vr(&[1.0, 3.0])];

        // First observation establishes the baseline.
        manager.observe_front(&front).unwrap();
        assert!(!manager.is_stalled());

        for _ in 0..3 {
            manager.observe_front(&front).unwrap();
        }
        assert!(manager.is_stalled());
    }

    #[test]
    fn test_improvement_resets_stall() {
        let mut manager = manager(3);
        let front = vec![vr(&[3.0, 1.0]), vr(&[1.0, 3.0])];
        manager.observe_front(&front).unwrap();
        manager.observe_front(&front).unwrap();
        assert_eq!(manager.stall_count(), 1);

        let improved = vec![vr(&[3.0, 1.0]), vr(&[1.0, 3.0]), vr(&[2.5, 2.5])];
        manager.observe_front(&improved).unwrap();
        assert_eq!(manager.stall_count(), 0);
    }

    #[test]
    fn test_zero_max_stall_disables_detection() {
        let mut manager = manager(0);
        let front = vec![vr(&[3.0, 1.0]), vr(&[1.0, 3.0])];
        for _ in 0..10 {
            manager.observe_front(&front).unwrap();
        }
        assert!(!manager.is_stalled());
    }

    #[test]
    fn test_lattice_size() {
        assert_eq!(lattice_size(4, 2), 5);
        assert_eq!(lattice_size(2, 3), 6);
        assert_eq!(lattice_size(1, 4), 4);
    }
}
