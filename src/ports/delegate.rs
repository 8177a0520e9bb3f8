//! Training delegate port - abstraction over policy improvement.
//!
//! The coordination core never trains policies itself. Each MORL algorithm
//! variant supplies one implementation of this port; the coordinator directs
//! it with scalarization weight vectors and archives the evaluated results.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    Result,
    identifiers::PolicyId,
    types::{VectorReturn, WeightVector},
};

/// Cooperative cancellation signal propagated into long-running delegate
/// calls.
///
/// The coordinator flips the token when a global time or iteration budget
/// expires; a well-behaved delegate checks it periodically and returns
/// early. Results arriving after cancellation are discarded, not submitted.
///
/// Clones share the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True iff cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome of one policy-improvement step.
#[derive(Debug, Clone)]
pub struct Improvement {
    /// Handle to the improved (possibly new) policy, owned by the delegate.
    pub policy: PolicyId,
    /// The delegate's own evaluation of the improved policy.
    pub evaluation: VectorReturn,
}

/// Training delegate trait - Unified interface for policy improvement
///
/// This abstraction is the boundary to the excluded RL machinery: function
/// approximators, gradient optimizers, and environment interaction all live
/// behind it. Different MORL training strategies (one per algorithm variant)
/// are injected into the coordinator rather than inherited.
///
/// # Concurrency
///
/// The coordinator may call `improve` from several worker threads at once,
/// one call per weight vector, so implementations must be `Send + Sync`.
/// Interior state (replay buffers, optimizer state) must be synchronized by
/// the implementation.
///
/// # Examples
///
/// ```no_run
/// use morl::ports::{CancellationToken, Improvement, TrainingDelegate};
/// use morl::identifiers::PolicyId;
/// use morl::types::{VectorReturn, WeightVector};
///
/// struct StubDelegate;
///
/// impl TrainingDelegate for StubDelegate {
///     fn improve(
///         &self,
///         _policy: Option<&PolicyId>,
///         weights: &WeightVector,
///         _cancel: &CancellationToken,
///     ) -> morl::Result<Improvement> {
///         Ok(Improvement {
///             policy: PolicyId::new("stub"),
///             evaluation: VectorReturn::new(weights.as_slice().to_vec())?,
///         })
///     }
///
///     fn name(&self) -> &str {
///         "stub"
///     }
/// }
/// ```
pub trait TrainingDelegate: Send + Sync {
    /// Improve a policy under the given scalarization weights.
    ///
    /// # Parameters
    ///
    /// * `policy` - Warm-start policy handle, or `None` to train from
    ///   scratch. The coordinator passes the archived policy whose
    ///   evaluation scores best under `weights`.
    /// * `weights` - Scalarization direction for this training episode.
    /// * `cancel` - Cooperative cancellation signal; check it periodically
    ///   during long-running training.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TrainingFailure`] (or any other error) on
    /// failure; the coordinator treats failures as non-fatal, retrying up to
    /// its configured limit before skipping the iteration.
    fn improve(
        &self,
        policy: Option<&PolicyId>,
        weights: &WeightVector,
        cancel: &CancellationToken,
    ) -> Result<Improvement>;

    /// Get the delegate's name.
    ///
    /// Used for identification in logs and reports.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_shares_state_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }
}
