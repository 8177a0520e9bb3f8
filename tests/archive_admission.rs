//! Admission and eviction scenarios for the policy archive

use morl::{
    archive::{AdmissionResult, ArchiveConfig, PolicyArchive, RejectionReason},
    dominance::DominanceEngine,
    identifiers::PolicyId,
    types::VectorReturn,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn vr(values: &[f64]) -> VectorReturn {
    VectorReturn::new(values.to_vec()).unwrap()
}

fn archive(capacity: usize) -> PolicyArchive {
    PolicyArchive::new(ArchiveConfig::new(capacity, vr(&[0.0, 0.0]))).unwrap()
}

/// Two-objective archive, capacity 3, reference (0, 0), maximization.
/// Three mutually non-dominating submissions all enter; a dominated
/// late-comer is rejected and the archive stays unchanged.
#[test]
fn scenario_dominated_candidate_is_rejected() {
    let mut archive = archive(3);

    for (name, point) in [("a", [3.0, 1.0]), ("b", [1.0, 3.0]), ("c", [2.0, 2.0])] {
        let result = archive.submit(PolicyId::new(name), vr(&point)).unwrap();
        assert!(result.is_admitted(), "{name} should be admitted");
    }
    assert_eq!(archive.current_front().len(), 3);

    let before = archive.snapshot();
    let result = archive.submit(PolicyId::new("d"), vr(&[0.5, 0.5])).unwrap();
    assert_eq!(
        result,
        AdmissionResult::Rejected {
            reason: RejectionReason::Dominated
        }
    );
    assert_eq!(archive.snapshot(), before, "archive must stay unchanged");
}

/// Same setup; a candidate dominating everything is admitted, the front
/// collapses onto it, and the remaining dominated entries are flushed out
/// by subsequent capacity-driven evictions.
#[test]
fn scenario_dominating_candidate_takes_over_front() {
    let mut archive = archive(3);
    archive.submit(PolicyId::new("a"), vr(&[3.0, 1.0])).unwrap();
    archive.submit(PolicyId::new("b"), vr(&[1.0, 3.0])).unwrap();
    archive.submit(PolicyId::new("c"), vr(&[2.0, 2.0])).unwrap();

    let result = archive.submit(PolicyId::new("d"), vr(&[4.0, 4.0])).unwrap();
    assert!(result.is_admitted());

    let front = archive.current_front();
    assert_eq!(front.len(), 1);
    assert_eq!(front[0].evaluation, vr(&[4.0, 4.0]));

    // Dominated leftovers have zero contribution, so further admissions
    // evict them first.
    archive.submit(PolicyId::new("e"), vr(&[5.0, 3.0])).unwrap();
    archive.submit(PolicyId::new("f"), vr(&[3.0, 5.0])).unwrap();

    let engine = DominanceEngine::maximizing(2);
    let front = archive.current_front();
    assert_eq!(front.len(), 3);
    for a in &front {
        for b in &front {
            if a.generation == b.generation {
                continue;
            }
            assert!(!engine.dominates(&a.evaluation, &b.evaluation).unwrap());
        }
    }
    assert!(front.iter().any(|e| e.evaluation == vr(&[4.0, 4.0])));
}

/// The archive never exceeds its capacity and its front never contains a
/// dominated pair, whatever the submission sequence.
#[test]
fn archive_invariants_hold_under_random_submissions() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut archive = archive(8);
    let engine = DominanceEngine::maximizing(2);

    for i in 0..300 {
        let point = vr(&[rng.random_range(0.1..10.0), rng.random_range(0.1..10.0)]);
        let _ = archive.submit(PolicyId::new(format!("p{i}")), point).unwrap();

        assert!(archive.size() <= 8, "capacity exceeded at step {i}");

        let front = archive.current_front();
        for a in &front {
            for b in &front {
                if a.generation == b.generation {
                    continue;
                }
                assert!(
                    !engine.dominates(&a.evaluation, &b.evaluation).unwrap(),
                    "front contains dominated pair at step {i}"
                );
            }
        }
    }
}

/// Admissions at capacity must strictly improve hypervolume.
#[test]
fn hypervolume_never_decreases_at_capacity() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut archive = archive(5);
    let mut last_hv = 0.0;

    for i in 0..200 {
        let point = vr(&[rng.random_range(0.1..10.0), rng.random_range(0.1..10.0)]);
        let result = archive.submit(PolicyId::new(format!("p{i}")), point).unwrap();

        let hv = archive.front_hypervolume().unwrap();
        if archive.size() == 5 && !result.is_admitted() {
            assert_eq!(hv, last_hv, "rejected submission changed hypervolume");
        }
        assert!(
            hv >= last_hv - 1e-12 || archive.size() < 5,
            "hypervolume dropped from {last_hv} to {hv} at step {i}"
        );
        last_hv = hv;
    }
}

/// Generations increase monotonically across admissions.
#[test]
fn generations_are_monotone() {
    let mut archive = archive(2);
    let g0 = match archive.submit(PolicyId::new("a"), vr(&[1.0, 2.0])).unwrap() {
        AdmissionResult::Admitted { generation, .. } => generation,
        other => panic!("expected admission, got {other:?}"),
    };
    let g1 = match archive.submit(PolicyId::new("b"), vr(&[2.0, 1.0])).unwrap() {
        AdmissionResult::Admitted { generation, .. } => generation,
        other => panic!("expected admission, got {other:?}"),
    };
    assert!(g1 > g0);
}
