//! Property tests for dominance and the quality indicators

use morl::{
    dominance::{DominanceEngine, ObjectiveSense},
    indicators::HypervolumeIndicator,
    types::VectorReturn,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn vr(values: &[f64]) -> VectorReturn {
    VectorReturn::new(values.to_vec()).unwrap()
}

fn random_point<R: Rng>(rng: &mut R, dim: usize) -> VectorReturn {
    VectorReturn::new((0..dim).map(|_| rng.random_range(0.1..10.0)).collect()).unwrap()
}

/// For all pairs of distinct returns, dominance is never symmetric.
#[test]
fn dominance_is_asymmetric_over_random_pairs() {
    let mut rng = StdRng::seed_from_u64(42);
    for dim in 2..5 {
        let engine = DominanceEngine::maximizing(dim);
        for _ in 0..200 {
            let a = random_point(&mut rng, dim);
            let b = random_point(&mut rng, dim);
            if a == b {
                continue;
            }
            let forward = engine.dominates(&a, &b).unwrap();
            let backward = engine.dominates(&b, &a).unwrap();
            assert!(!(forward && backward), "both {a} and {b} dominate each other");
        }
    }
}

/// Extracting the front from its own output changes nothing.
#[test]
fn non_dominated_front_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let points: Vec<VectorReturn> = (0..20).map(|_| random_point(&mut rng, 3)).collect();
        let engine = DominanceEngine::maximizing(3);

        let front = engine.non_dominated_front(&points).unwrap();
        let again = engine.non_dominated_front(&front).unwrap();
        assert_eq!(front, again);
    }
}

/// No front member is dominated by another front member.
#[test]
fn front_members_are_mutually_non_dominating() {
    let mut rng = StdRng::seed_from_u64(11);
    let points: Vec<VectorReturn> = (0..40).map(|_| random_point(&mut rng, 2)).collect();
    let engine = DominanceEngine::maximizing(2);

    let front = engine.non_dominated_front(&points).unwrap();
    for a in &front {
        for b in &front {
            if a == b {
                continue;
            }
            assert!(!engine.dominates(a, b).unwrap());
        }
    }
}

/// Adding a point to a front never decreases hypervolume.
#[test]
fn hypervolume_is_monotonic_under_extension() {
    let mut rng = StdRng::seed_from_u64(23);
    let indicator = HypervolumeIndicator::maximizing(vr(&[0.0, 0.0, 0.0]));

    for _ in 0..50 {
        let front: Vec<VectorReturn> = (0..8).map(|_| random_point(&mut rng, 3)).collect();
        let before = indicator.hypervolume(&front).unwrap();

        let mut extended = front.clone();
        extended.push(random_point(&mut rng, 3));
        let after = indicator.hypervolume(&extended).unwrap();

        assert!(
            after >= before - 1e-12,
            "hypervolume shrank from {before} to {after}"
        );
    }
}

/// Every member of a non-dominated front has non-negative contribution.
#[test]
fn contributions_are_non_negative_on_fronts() {
    let mut rng = StdRng::seed_from_u64(31);
    let engine = DominanceEngine::maximizing(2);
    let indicator = HypervolumeIndicator::maximizing(vr(&[0.0, 0.0]));

    for _ in 0..50 {
        let points: Vec<VectorReturn> = (0..15).map(|_| random_point(&mut rng, 2)).collect();
        let front = engine.non_dominated_front(&points).unwrap();
        for point in &front {
            let contribution = indicator.contribution(point, &front).unwrap();
            assert!(
                contribution >= 0.0,
                "negative contribution {contribution} for {point}"
            );
        }
    }
}

/// The 2-D sweep and the recursive slicer agree on embedded fronts.
#[test]
fn two_dimensional_sweep_agrees_with_slicing() {
    let mut rng = StdRng::seed_from_u64(47);
    let flat = HypervolumeIndicator::maximizing(vr(&[0.0, 0.0]));
    let lifted = HypervolumeIndicator::maximizing(vr(&[0.0, 0.0, 0.0]));

    for _ in 0..25 {
        let points: Vec<VectorReturn> = (0..10).map(|_| random_point(&mut rng, 2)).collect();
        // Embed each 2-D point at height 1 so the 3-D volume equals the
        // 2-D area.
        let embedded: Vec<VectorReturn> = points
            .iter()
            .map(|p| {
                let mut values = p.as_slice().to_vec();
                values.push(1.0);
                VectorReturn::new(values).unwrap()
            })
            .collect();

        let area = flat.hypervolume(&points).unwrap();
        let volume = lifted.hypervolume(&embedded).unwrap();
        assert!(
            (area - volume).abs() < 1e-9,
            "sweep gave {area}, slicing gave {volume}"
        );
    }
}

/// Minimization senses mirror maximization results.
#[test]
fn minimization_mirrors_maximization() {
    let max_engine = DominanceEngine::maximizing(2);
    let min_engine =
        DominanceEngine::new(vec![ObjectiveSense::Minimize, ObjectiveSense::Minimize]).unwrap();

    let a = vr(&[2.0, 3.0]);
    let b = vr(&[1.0, 1.0]);
    assert!(max_engine.dominates(&a, &b).unwrap());
    assert!(min_engine.dominates(&b, &a).unwrap());
}
