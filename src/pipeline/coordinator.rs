//! Training coordinator: the outer loop over weight vectors, the training
//! delegate, and the archive.
//!
//! Each iteration asks the weight manager for a scalarization direction,
//! delegates policy improvement to the external collaborator, re-scores the
//! result, and submits it to the archive. Up to `parallelism` delegate calls
//! run concurrently on worker threads; archive mutation stays serialized in
//! the coordinator thread, applied in completion order.

use std::{
    collections::VecDeque,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    archive::{ArchiveConfig, ArchiveEntry, EvictionCriterion, PolicyArchive},
    dominance::ObjectiveSense,
    identifiers::PolicyId,
    indicators::{HypervolumeIndicator, front_sparsity},
    ports::{CancellationToken, Observer, PolicyEvaluator, TrainingDelegate},
    types::{VectorReturn, WeightVector},
    weights::WeightVectorManager,
};

/// Configuration surface consumed by the coordination core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of objectives (`d`), fixed per run.
    pub objective_count: usize,
    /// Hypervolume reference point.
    pub reference_point: VectorReturn,
    /// Optimization sense per objective.
    pub senses: Vec<ObjectiveSense>,
    /// Archive capacity (`K`).
    pub archive_capacity: usize,
    /// Retain dominated archive entries for diversity.
    pub retain_dominated: bool,
    /// Eviction tie-break order.
    pub eviction_order: Vec<EvictionCriterion>,
    /// Near-equality epsilon for contribution comparisons.
    pub contribution_epsilon: f64,
    /// Degree of parallelism (`P`): concurrent delegate calls.
    pub parallelism: usize,
    /// Iteration budget.
    pub iteration_budget: usize,
    /// Optional wall-clock budget.
    pub time_budget: Option<Duration>,
    /// Hypervolume-plateau window (`p` iterations).
    pub plateau_patience: usize,
    /// Minimum hypervolume gain over the plateau window.
    pub plateau_epsilon: f64,
    /// Delegate retries per iteration before the iteration is skipped.
    pub training_retries: usize,
    /// Base backoff between retries (grows linearly per attempt).
    pub retry_backoff: Duration,
    /// Evaluation rollouts averaged per candidate; zero trusts the
    /// delegate's own evaluation and skips re-scoring.
    pub evaluation_rollouts: usize,
    /// Number of evenly-spaced initial weight vectors dispatched before
    /// adaptive selection takes over.
    pub initial_coverage: usize,
    /// Non-improving rounds tolerated by the weight manager before it
    /// signals convergence; zero disables stall detection.
    pub max_stall_iterations: usize,
    /// Random seed for reproducible weight sampling.
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Create a maximizing configuration with defaults sized for small
    /// research runs. The objective count is taken from the reference
    /// point's dimensionality.
    pub fn new(reference_point: VectorReturn) -> Self {
        let objective_count = reference_point.dim();
        Self {
            objective_count,
            senses: vec![ObjectiveSense::Maximize; objective_count],
            reference_point,
            archive_capacity: 100,
            retain_dominated: true,
            eviction_order: EvictionCriterion::default_order(),
            contribution_epsilon: 1e-9,
            parallelism: 1,
            iteration_budget: 100,
            time_budget: None,
            plateau_patience: 10,
            plateau_epsilon: 1e-6,
            training_retries: 2,
            retry_backoff: Duration::from_millis(100),
            evaluation_rollouts: 1,
            initial_coverage: 5,
            max_stall_iterations: 10,
            seed: None,
        }
    }

    /// Set the archive capacity.
    pub fn with_archive_capacity(mut self, capacity: usize) -> Self {
        self.archive_capacity = capacity;
        self
    }

    /// Set the per-objective optimization senses.
    pub fn with_senses(mut self, senses: Vec<ObjectiveSense>) -> Self {
        self.senses = senses;
        self
    }

    /// Set whether dominated entries are retained.
    pub fn with_retain_dominated(mut self, retain: bool) -> Self {
        self.retain_dominated = retain;
        self
    }

    /// Set the eviction tie-break order.
    pub fn with_eviction_order(mut self, order: Vec<EvictionCriterion>) -> Self {
        self.eviction_order = order;
        self
    }

    /// Set the degree of parallelism.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Set the iteration budget.
    pub fn with_iteration_budget(mut self, budget: usize) -> Self {
        self.iteration_budget = budget;
        self
    }

    /// Set the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Set plateau detection: patience window and minimum gain.
    pub fn with_plateau(mut self, patience: usize, epsilon: f64) -> Self {
        self.plateau_patience = patience;
        self.plateau_epsilon = epsilon;
        self
    }

    /// Set retry behavior for delegate failures.
    pub fn with_retries(mut self, retries: usize, backoff: Duration) -> Self {
        self.training_retries = retries;
        self.retry_backoff = backoff;
        self
    }

    /// Set the number of evaluation rollouts averaged per candidate.
    pub fn with_evaluation_rollouts(mut self, rollouts: usize) -> Self {
        self.evaluation_rollouts = rollouts;
        self
    }

    /// Set the number of initial lattice weight vectors.
    pub fn with_initial_coverage(mut self, coverage: usize) -> Self {
        self.initial_coverage = coverage;
        self
    }

    /// Set the weight manager's stall cap.
    pub fn with_max_stall_iterations(mut self, max_stall: usize) -> Self {
        self.max_stall_iterations = max_stall;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] on any cross-field
    /// disagreement or out-of-range value.
    pub fn validate(&self) -> Result<()> {
        if self.objective_count == 0 {
            return Err(Error::InvalidConfiguration {
                message: "objective count must be at least 1".to_string(),
            });
        }
        if self.reference_point.dim() != self.objective_count {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "reference point has {} components for {} objectives",
                    self.reference_point.dim(),
                    self.objective_count
                ),
            });
        }
        if self.senses.len() != self.objective_count {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "{} senses configured for {} objectives",
                    self.senses.len(),
                    self.objective_count
                ),
            });
        }
        if self.parallelism == 0 {
            return Err(Error::InvalidConfiguration {
                message: "parallelism must be at least 1".to_string(),
            });
        }
        if self.iteration_budget == 0 {
            return Err(Error::InvalidConfiguration {
                message: "iteration budget must be at least 1".to_string(),
            });
        }
        if self.plateau_patience == 0 {
            return Err(Error::InvalidConfiguration {
                message: "plateau patience must be at least 1".to_string(),
            });
        }
        if self.initial_coverage == 0 {
            return Err(Error::InvalidConfiguration {
                message: "initial coverage must be at least 1".to_string(),
            });
        }
        if !self.plateau_epsilon.is_finite() || self.plateau_epsilon < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "plateau epsilon {} must be finite and non-negative",
                    self.plateau_epsilon
                ),
            });
        }
        self.archive_config().validate()
    }

    pub(crate) fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig::new(self.archive_capacity, self.reference_point.clone())
            .with_senses(self.senses.clone())
            .with_retain_dominated(self.retain_dominated)
            .with_eviction_order(self.eviction_order.clone())
            .with_contribution_epsilon(self.contribution_epsilon)
    }

    pub(crate) fn indicator(&self) -> Result<HypervolumeIndicator> {
        HypervolumeIndicator::new(self.reference_point.clone(), self.senses.clone())
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The iteration or wall-clock budget was exhausted.
    Completed,
    /// A hypervolume plateau or weight-adaptation stall was detected.
    Converged,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Converged => "converged",
        };
        f.write_str(label)
    }
}

/// Result of a coordination run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Iterations whose results were processed (including failures).
    pub iterations: usize,
    /// Candidates admitted to the archive.
    pub admitted: usize,
    /// Candidates rejected by the archive.
    pub rejected: usize,
    /// Iterations skipped after exhausting delegate retries.
    pub failed: usize,
    /// Results discarded because cancellation fired first.
    pub discarded: usize,
    /// Terminal state.
    pub outcome: RunOutcome,
    /// Final front hypervolume.
    pub final_hypervolume: f64,
    /// Final whole-front sparsity.
    pub final_sparsity: f64,
    /// The final front: the system's output artifact.
    pub front: Vec<ArchiveEntry>,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl RunReport {
    /// Save the report to a JSON file.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

/// One in-flight unit of work: an iteration index, its weight vector, and
/// the warm-start policy chosen at dispatch time.
struct Dispatch {
    iteration: usize,
    weights: WeightVector,
    seed_policy: Option<PolicyId>,
}

/// Mutable bookkeeping for a run in progress.
#[derive(Default)]
struct RunState {
    processed: usize,
    admitted: usize,
    rejected: usize,
    failed: usize,
    discarded: usize,
    hv_history: Vec<f64>,
    outcome: Option<RunOutcome>,
}

/// Orchestrates the outer MORL loop.
///
/// The coordinator owns the archive and the weight manager; the training
/// delegate and evaluator are injected per run. Observers attach with
/// [`TrainingCoordinator::with_observer`].
///
/// # Examples
///
/// ```no_run
/// use morl::identifiers::PolicyId;
/// use morl::pipeline::{RunConfig, TrainingCoordinator};
/// use morl::ports::{CancellationToken, Improvement, PolicyEvaluator, TrainingDelegate};
/// use morl::types::{VectorReturn, WeightVector};
///
/// struct MyAlgorithm;
///
/// impl TrainingDelegate for MyAlgorithm {
///     fn improve(
///         &self,
///         _policy: Option<&PolicyId>,
///         _weights: &WeightVector,
///         _cancel: &CancellationToken,
///     ) -> morl::Result<Improvement> {
///         // Train a policy under the given weights and return its handle
///         // and evaluation.
///         todo!()
///     }
///
///     fn name(&self) -> &str {
///         "my-algorithm"
///     }
/// }
///
/// impl PolicyEvaluator for MyAlgorithm {
///     fn evaluate(&self, _policy: &PolicyId) -> morl::Result<VectorReturn> {
///         todo!()
///     }
/// }
///
/// let config = RunConfig::new(VectorReturn::new(vec![0.0, 0.0])?)
///     .with_iteration_budget(200)
///     .with_parallelism(4)
///     .with_seed(42);
///
/// let mut coordinator = TrainingCoordinator::new(config)?;
/// let report = coordinator.run(&MyAlgorithm, &MyAlgorithm)?;
/// println!("{} front points, outcome {}", report.front.len(), report.outcome);
/// # Ok::<(), morl::Error>(())
/// ```
pub struct TrainingCoordinator {
    config: RunConfig,
    archive: PolicyArchive,
    manager: WeightVectorManager,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingCoordinator {
    /// Create a coordinator with an empty archive.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration
    /// fails validation.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let archive = PolicyArchive::new(config.archive_config())?;
        Self::assemble(config, archive)
    }

    /// Create a coordinator resuming from a checkpointed archive.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration
    /// fails validation or [`crate::Error::DimensionMismatch`] if the
    /// archive disagrees with the configured objective count.
    pub fn from_archive(config: RunConfig, archive: PolicyArchive) -> Result<Self> {
        config.validate()?;
        if archive.config().reference_point.dim() != config.objective_count {
            return Err(Error::DimensionMismatch {
                expected: config.objective_count,
                got: archive.config().reference_point.dim(),
            });
        }
        Self::assemble(config, archive)
    }

    fn assemble(config: RunConfig, archive: PolicyArchive) -> Result<Self> {
        let mut manager = WeightVectorManager::new(
            config.indicator()?,
            config.max_stall_iterations,
            config.plateau_epsilon,
        );
        if let Some(seed) = config.seed {
            manager.set_rng_seed(seed);
        }
        Ok(Self {
            config,
            archive,
            manager,
            observers: Vec::new(),
        })
    }

    /// Attach an observer to the run lifecycle.
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// The coordinator's archive.
    pub fn archive(&self) -> &PolicyArchive {
        &self.archive
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Drive the outer loop until a terminal state is reached.
    ///
    /// Terminates with [`RunOutcome::Completed`] when the iteration or
    /// wall-clock budget is exhausted, or [`RunOutcome::Converged`] when the
    /// front hypervolume has not improved by more than `plateau_epsilon`
    /// over the last `plateau_patience` processed iterations (or the weight
    /// manager reports a stall).
    ///
    /// # Errors
    ///
    /// Delegate failures are recoverable and consume iterations; anything
    /// else (dimension mismatches, observer I/O errors) is fatal and
    /// surfaces immediately.
    pub fn run(
        &mut self,
        delegate: &dyn TrainingDelegate,
        evaluator: &dyn PolicyEvaluator,
    ) -> Result<RunReport> {
        let start = Instant::now();
        let total = self.config.iteration_budget;

        for observer in &mut self.observers {
            observer.on_run_start(total)?;
        }

        let cancel = CancellationToken::new();
        let mut planned: VecDeque<WeightVector> = self
            .manager
            .initial(self.config.initial_coverage.min(total))?
            .into();

        let mut state = RunState::default();
        let mut dispatched = 0usize;

        while dispatched < total && state.outcome.is_none() {
            if self.time_budget_expired(start) {
                state.outcome = Some(RunOutcome::Completed);
                break;
            }

            let wave = self.config.parallelism.min(total - dispatched);
            let mut batch = Vec::with_capacity(wave);
            for _ in 0..wave {
                let weights = match planned.pop_front() {
                    Some(weights) => weights,
                    None => self.manager.next(&self.archive.front_evaluations())?,
                };
                let seed_policy = self.warm_start(&weights)?;
                let iteration = dispatched;
                dispatched += 1;

                for observer in &mut self.observers {
                    observer.on_iteration_start(iteration, &weights)?;
                }
                batch.push(Dispatch {
                    iteration,
                    weights,
                    seed_policy,
                });
            }

            self.run_wave(batch, delegate, evaluator, &cancel, start, &mut state)?;
        }

        let outcome = state.outcome.unwrap_or(RunOutcome::Completed);
        for observer in &mut self.observers {
            observer.on_run_end(&outcome)?;
        }

        let front_evaluations = self.archive.front_evaluations();
        Ok(RunReport {
            iterations: state.processed,
            admitted: state.admitted,
            rejected: state.rejected,
            failed: state.failed,
            discarded: state.discarded,
            outcome,
            final_hypervolume: self.archive.front_hypervolume()?,
            final_sparsity: front_sparsity(&front_evaluations)?,
            front: self.archive.current_front().into_iter().cloned().collect(),
            elapsed: start.elapsed(),
        })
    }

    /// Dispatch one wave of delegate calls and fold the results into the
    /// archive in completion order.
    fn run_wave(
        &mut self,
        batch: Vec<Dispatch>,
        delegate: &dyn TrainingDelegate,
        evaluator: &dyn PolicyEvaluator,
        cancel: &CancellationToken,
        start: Instant,
        state: &mut RunState,
    ) -> Result<()> {
        let retries = self.config.training_retries;
        let backoff = self.config.retry_backoff;
        let rollouts = self.config.evaluation_rollouts;

        let (tx, rx) = mpsc::channel();
        thread::scope(|scope| -> Result<()> {
            for dispatch in batch {
                let tx = tx.clone();
                let worker_cancel = cancel.clone();
                scope.spawn(move || {
                    let result = execute_task(
                        delegate,
                        evaluator,
                        &dispatch,
                        &worker_cancel,
                        retries,
                        backoff,
                        rollouts,
                    );
                    let _ = tx.send((dispatch, result));
                });
            }
            drop(tx);

            while let Ok((dispatch, result)) = rx.recv() {
                if state.outcome.is_none() && self.time_budget_expired(start) {
                    state.outcome = Some(RunOutcome::Completed);
                    cancel.cancel();
                }
                if cancel.is_cancelled() {
                    state.processed += 1;
                    state.discarded += 1;
                    continue;
                }
                self.process_result(dispatch, result, state)?;
            }
            Ok(())
        })
    }

    fn process_result(
        &mut self,
        dispatch: Dispatch,
        result: Result<(PolicyId, VectorReturn)>,
        state: &mut RunState,
    ) -> Result<()> {
        state.processed += 1;
        match result {
            Ok((policy, evaluation)) => {
                let admission = self.archive.submit(policy, evaluation.clone())?;
                if admission.is_admitted() {
                    state.admitted += 1;
                } else {
                    state.rejected += 1;
                }
                for observer in &mut self.observers {
                    observer.on_candidate(dispatch.iteration, &evaluation, &admission)?;
                }

                let front = self.archive.front_evaluations();
                let hypervolume = self.archive.front_hypervolume()?;
                let sparsity = front_sparsity(&front)?;
                for observer in &mut self.observers {
                    observer.on_front_update(dispatch.iteration, hypervolume, sparsity, front.len())?;
                }

                self.manager.observe_front(&front)?;
                state.hv_history.push(hypervolume);

                if state.outcome.is_none()
                    && (self.plateau_detected(&state.hv_history) || self.manager.is_stalled())
                {
                    state.outcome = Some(RunOutcome::Converged);
                }
            }
            Err(Error::TrainingFailure { attempts, message }) => {
                state.failed += 1;
                for observer in &mut self.observers {
                    observer.on_training_failure(dispatch.iteration, attempts, &message)?;
                }
            }
            Err(other) => return Err(other),
        }
        Ok(())
    }

    /// Archived policy whose evaluation scores best under `weights`, used to
    /// warm-start the delegate.
    fn warm_start(&self, weights: &WeightVector) -> Result<Option<PolicyId>> {
        let mut best: Option<(f64, PolicyId)> = None;
        for entry in self.archive.current_front() {
            let score = weights.scalarize(&entry.evaluation)?;
            if best.as_ref().is_none_or(|(s, _)| score > *s) {
                best = Some((score, entry.policy.clone()));
            }
        }
        Ok(best.map(|(_, policy)| policy))
    }

    fn plateau_detected(&self, history: &[f64]) -> bool {
        let patience = self.config.plateau_patience;
        if history.len() <= patience {
            return false;
        }
        let latest = history[history.len() - 1];
        let baseline = history[history.len() - 1 - patience];
        latest - baseline <= self.config.plateau_epsilon
    }

    fn time_budget_expired(&self, start: Instant) -> bool {
        self.config
            .time_budget
            .is_some_and(|budget| start.elapsed() >= budget)
    }
}

/// Run one iteration's improve-and-evaluate cycle on a worker thread, with
/// retries and linear backoff. All failure paths fold into
/// [`Error::TrainingFailure`] so the coordinator can skip the iteration.
fn execute_task(
    delegate: &dyn TrainingDelegate,
    evaluator: &dyn PolicyEvaluator,
    dispatch: &Dispatch,
    cancel: &CancellationToken,
    retries: usize,
    backoff: Duration,
    rollouts: usize,
) -> Result<(PolicyId, VectorReturn)> {
    let attempts_allowed = retries + 1;
    let mut last_message = String::new();

    for attempt in 1..=attempts_allowed {
        if cancel.is_cancelled() {
            return Err(Error::TrainingFailure {
                attempts: attempt - 1,
                message: "cancelled before attempt".to_string(),
            });
        }

        match improve_and_evaluate(delegate, evaluator, dispatch, cancel, rollouts) {
            Ok(result) => return Ok(result),
            Err(error) => {
                last_message = error.to_string();
                if attempt < attempts_allowed {
                    thread::sleep(backoff.saturating_mul(attempt as u32));
                }
            }
        }
    }

    Err(Error::TrainingFailure {
        attempts: attempts_allowed,
        message: last_message,
    })
}

fn improve_and_evaluate(
    delegate: &dyn TrainingDelegate,
    evaluator: &dyn PolicyEvaluator,
    dispatch: &Dispatch,
    cancel: &CancellationToken,
    rollouts: usize,
) -> Result<(PolicyId, VectorReturn)> {
    let improvement = delegate.improve(dispatch.seed_policy.as_ref(), &dispatch.weights, cancel)?;
    if rollouts == 0 {
        return Ok((improvement.policy, improvement.evaluation));
    }

    let mut evaluations = Vec::with_capacity(rollouts);
    for _ in 0..rollouts {
        evaluations.push(evaluator.evaluate(&improvement.policy)?);
    }
    Ok((improvement.policy, VectorReturn::mean(&evaluations)?))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ports::Improvement;

    /// Delegate whose policies land exactly where the weight vector points,
    /// scaled onto a fixed budget of return magnitude.
    struct LinearDelegate {
        scale: f64,
        counter: AtomicUsize,
    }

    impl LinearDelegate {
        fn new(scale: f64) -> Self {
            Self {
                scale,
                counter: AtomicUsize::new(0),
            }
        }
    }

    impl TrainingDelegate for LinearDelegate {
        fn improve(
            &self,
            _policy: Option<&PolicyId>,
            weights: &WeightVector,
            _cancel: &CancellationToken,
        ) -> Result<Improvement> {
            let id = self.counter.fetch_add(1, Ordering::SeqCst);
            let evaluation = VectorReturn::new(
                weights.as_slice().iter().map(|w| 0.5 + w * self.scale).collect(),
            )?;
            Ok(Improvement {
                policy: PolicyId::new(format!("linear-{id}")),
                evaluation,
            })
        }

        fn name(&self) -> &str {
            "linear"
        }
    }

    /// Evaluator that trusts nothing and returns a fixed vector.
    struct ConstantEvaluator(Vec<f64>);

    impl PolicyEvaluator for ConstantEvaluator {
        fn evaluate(&self, _policy: &PolicyId) -> Result<VectorReturn> {
            VectorReturn::new(self.0.clone())
        }
    }

    /// Evaluator passthrough used when the delegate's evaluation is final.
    struct NoopEvaluator;

    impl PolicyEvaluator for NoopEvaluator {
        fn evaluate(&self, _policy: &PolicyId) -> Result<VectorReturn> {
            unreachable!("zero-rollout runs never call the evaluator")
        }
    }

    /// Delegate that always fails, for retry accounting.
    struct FailingDelegate;

    impl TrainingDelegate for FailingDelegate {
        fn improve(
            &self,
            _policy: Option<&PolicyId>,
            _weights: &WeightVector,
            _cancel: &CancellationToken,
        ) -> Result<Improvement> {
            Err(Error::TrainingFailure {
                attempts: 1,
                message: "simulated crash".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn base_config() -> RunConfig {
        RunConfig::new(VectorReturn::new(vec![0.0, 0.0]).unwrap())
            .with_iteration_budget(12)
            .with_archive_capacity(6)
            .with_seed(42)
            .with_retries(0, Duration::from_millis(1))
            .with_evaluation_rollouts(0)
            .with_max_stall_iterations(0)
    }

    #[test]
    fn test_run_completes_budget() {
        let config = base_config().with_plateau(50, 0.0);
        let mut coordinator = TrainingCoordinator::new(config).unwrap();
        let delegate = LinearDelegate::new(2.0);

        let report = coordinator
            .run(&delegate, &NoopEvaluator)
            .unwrap();

        assert_eq!(report.iterations, 12);
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert!(report.admitted + report.rejected == 12);
        assert!(!report.front.is_empty());
        assert!(report.final_hypervolume > 0.0);
    }

    #[test]
    fn test_rollout_averaging_rescoring() {
        let config = base_config()
            .with_plateau(50, 0.0)
            .with_iteration_budget(3)
            .with_evaluation_rollouts(2);
        let mut coordinator = TrainingCoordinator::new(config).unwrap();
        let delegate = LinearDelegate::new(2.0);
        let evaluator = ConstantEvaluator(vec![1.5, 0.5]);

        let report = coordinator.run(&delegate, &evaluator).unwrap();

        assert!(report.admitted >= 1);
        let expected = VectorReturn::new(vec![1.5, 0.5]).unwrap();
        for entry in coordinator.archive().snapshot() {
            assert_eq!(entry.evaluation, expected);
        }
    }

    #[test]
    fn test_plateau_converges() {
        // Every candidate evaluates to the same point, so hypervolume is
        // flat from the second processed iteration onward.
        let config = base_config()
            .with_iteration_budget(50)
            .with_plateau(3, 1e-9)
            .with_evaluation_rollouts(1);
        let mut coordinator = TrainingCoordinator::new(config).unwrap();
        let delegate = LinearDelegate::new(2.0);
        let evaluator = ConstantEvaluator(vec![1.0, 1.0]);

        let report = coordinator.run(&delegate, &evaluator).unwrap();

        assert_eq!(report.outcome, RunOutcome::Converged);
        assert!(report.iterations < 50);
    }

    #[test]
    fn test_failures_are_skipped_and_counted() {
        let config = base_config().with_plateau(50, 0.0).with_iteration_budget(5);
        let mut coordinator = TrainingCoordinator::new(config).unwrap();

        let report = coordinator.run(&FailingDelegate, &NoopEvaluator).unwrap();

        assert_eq!(report.iterations, 5);
        assert_eq!(report.failed, 5);
        assert_eq!(report.admitted, 0);
        assert!(report.front.is_empty());
    }

    #[test]
    fn test_parallel_run_respects_capacity() {
        let config = base_config()
            .with_plateau(100, 0.0)
            .with_iteration_budget(24)
            .with_parallelism(4)
            .with_archive_capacity(4);
        let mut coordinator = TrainingCoordinator::new(config).unwrap();
        let delegate = LinearDelegate::new(2.0);

        let report = coordinator.run(&delegate, &NoopEvaluator).unwrap();

        assert_eq!(report.iterations, 24);
        assert!(coordinator.archive().size() <= 4);
        assert!(report.front.len() <= 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = base_config();
        config.parallelism = 0;
        assert!(TrainingCoordinator::new(config).is_err());

        let mut config = base_config();
        config.senses.pop();
        assert!(TrainingCoordinator::new(config).is_err());
    }
}
