//! Utility functions for the MORL core crate

use rand::Rng;
use statrs::statistics::Statistics;

/// Draw a uniform sample from the probability simplex of dimension `dim`.
///
/// Uses the standard exponential-spacings construction: `dim` independent
/// exponential draws normalized by their sum are uniformly distributed over
/// the simplex.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use morl::utils::uniform_simplex_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let sample = uniform_simplex_sample(&mut rng, 3);
/// let total: f64 = sample.iter().sum();
/// assert!((total - 1.0).abs() < 1e-9);
/// assert!(sample.iter().all(|&w| w >= 0.0));
/// ```
pub fn uniform_simplex_sample<R: Rng>(rng: &mut R, dim: usize) -> Vec<f64> {
    if dim == 0 {
        return Vec::new();
    }
    if dim == 1 {
        return vec![1.0];
    }

    let mut draws: Vec<f64> = (0..dim)
        .map(|_| {
            // Guard against ln(0); the open interval keeps draws positive.
            let u: f64 = rng.random_range(f64::MIN_POSITIVE..1.0);
            -u.ln()
        })
        .collect();

    let total: f64 = draws.iter().sum();
    for draw in draws.iter_mut() {
        *draw /= total;
    }
    draws
}

/// Coefficient of variation (std dev over mean) of a sample.
///
/// Returns `None` for samples with fewer than two finite values or a
/// non-positive mean, where the ratio carries no signal. Used to decide
/// whether front contributions are statistically indistinguishable.
///
/// # Examples
///
/// ```
/// use morl::utils::coefficient_of_variation;
///
/// let spread = coefficient_of_variation(&[1.0, 2.0, 3.0]).unwrap();
/// let tight = coefficient_of_variation(&[2.0, 2.0, 2.0]).unwrap();
/// assert!(spread > tight);
/// assert_eq!(coefficient_of_variation(&[1.0]), None);
/// ```
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    let mean = (&finite).mean();
    if !mean.is_finite() || mean <= 0.0 {
        return None;
    }
    let std_dev = (&finite).std_dev();
    Some(std_dev / mean)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_simplex_sample_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for dim in 1..6 {
            let sample = uniform_simplex_sample(&mut rng, dim);
            assert_eq!(sample.len(), dim);
            let total: f64 = sample.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "sum was {total}");
            assert!(sample.iter().all(|&w| w >= 0.0 && w <= 1.0));
        }
    }

    #[test]
    fn test_simplex_sample_deterministic_under_seed() {
        let mut rng1 = StdRng::seed_from_u64(12345);
        let mut rng2 = StdRng::seed_from_u64(12345);
        assert_eq!(
            uniform_simplex_sample(&mut rng1, 4),
            uniform_simplex_sample(&mut rng2, 4)
        );
    }

    #[test]
    fn test_cv_ignores_non_finite_values() {
        let cv = coefficient_of_variation(&[1.0, f64::INFINITY, 2.0, 3.0]).unwrap();
        let reference = coefficient_of_variation(&[1.0, 2.0, 3.0]).unwrap();
        assert!((cv - reference).abs() < 1e-12);
    }

    #[test]
    fn test_cv_requires_positive_mean() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
        assert_eq!(coefficient_of_variation(&[-1.0, 1.0]), None);
    }
}
