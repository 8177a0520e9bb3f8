//! Evaluation delegate port - abstraction over policy scoring.

use crate::{Result, identifiers::PolicyId, types::VectorReturn};

/// Port for (re-)scoring a policy against the environment.
///
/// Evaluation is assumed deterministic up to rollout noise; the coordinator
/// calls `evaluate` a configured number of times per candidate and averages
/// the returned vectors component-wise, so implementations should perform a
/// single rollout (or their own fixed batch) per call.
///
/// Like [`crate::ports::TrainingDelegate`], evaluation may run on worker
/// threads, so implementations must be `Send + Sync`.
pub trait PolicyEvaluator: Send + Sync {
    /// Evaluate a policy, returning its vector-valued expected return.
    ///
    /// # Errors
    ///
    /// Any error is treated by the coordinator like a training failure for
    /// the surrounding iteration: retried, then skipped.
    fn evaluate(&self, policy: &PolicyId) -> Result<VectorReturn>;
}
