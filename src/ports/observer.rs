//! Observer port - abstraction for run observation and data collection
//!
//! This port defines the interface for observing coordination events,
//! allowing composable data collection without coupling the outer training
//! loop to specific output formats or metrics.

use crate::{
    Result,
    archive::AdmissionResult,
    pipeline::RunOutcome,
    types::{VectorReturn, WeightVector},
};

/// Observer trait for monitoring a coordination run
///
/// Observers can be composed to collect different types of data during a
/// run. Examples include:
/// - Progress bars for user feedback
/// - JSONL export for analysis
/// - Metrics tracking for evaluation
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_run_start(total_iterations)` - Once at the beginning
/// 2. For each iteration:
///    - `on_iteration_start(iteration, weights)` - When the iteration is
///      dispatched
///    - `on_candidate(...)` or `on_training_failure(...)` - When the result
///      arrives (completion order, not dispatch order, under parallelism)
///    - `on_front_update(...)` - After an archive submission
/// 3. `on_run_end(outcome)` - Once at the end
pub trait Observer: Send {
    /// Called when the run starts.
    ///
    /// # Parameters
    ///
    /// * `total_iterations` - The iteration budget for this run
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_run_start(&mut self, _total_iterations: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an iteration is dispatched to the training delegate.
    ///
    /// # Parameters
    ///
    /// * `iteration` - Index of the iteration (0-based, dispatch order)
    /// * `weights` - Scalarization weights directing this iteration
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_iteration_start(&mut self, _iteration: usize, _weights: &WeightVector) -> Result<()> {
        Ok(())
    }

    /// Called when a trained candidate has been evaluated and submitted.
    ///
    /// # Parameters
    ///
    /// * `iteration` - Index of the originating iteration
    /// * `evaluation` - The candidate's averaged vector return
    /// * `admission` - The archive's admission decision
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to record admissions and rejections.
    fn on_candidate(
        &mut self,
        _iteration: usize,
        _evaluation: &VectorReturn,
        _admission: &AdmissionResult,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after each archive submission with fresh front indicators.
    ///
    /// # Parameters
    ///
    /// * `iteration` - Index of the originating iteration
    /// * `hypervolume` - Current front hypervolume
    /// * `sparsity` - Current whole-front sparsity metric
    /// * `front_size` - Number of entries on the current front
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to track front quality over time.
    fn on_front_update(
        &mut self,
        _iteration: usize,
        _hypervolume: f64,
        _sparsity: f64,
        _front_size: usize,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an iteration is skipped after exhausting its retries.
    ///
    /// # Parameters
    ///
    /// * `iteration` - Index of the failed iteration
    /// * `attempts` - Number of delegate attempts made
    /// * `message` - The final failure message
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to log or count failures.
    fn on_training_failure(
        &mut self,
        _iteration: usize,
        _attempts: usize,
        _message: &str,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when the run completes.
    ///
    /// This is the last method called in the observation lifecycle.
    /// Use this to finalize outputs, close files, or display summaries.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to perform cleanup or final reporting.
    fn on_run_end(&mut self, _outcome: &RunOutcome) -> Result<()> {
        Ok(())
    }
}
