//! Observer implementations for coordination runs
//!
//! Observers allow composable data collection during a run without coupling
//! coordination logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    archive::{AdmissionResult, RejectionReason},
    pipeline::RunOutcome,
    ports::Observer,
    types::{VectorReturn, WeightVector},
};

/// Progress bar observer - Shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    admitted: usize,
    rejected: usize,
    failed: usize,
    hypervolume: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            admitted: 0,
            rejected: 0,
            failed: 0,
            hypervolume: 0.0,
        }
    }

    fn message(&self) -> String {
        format!(
            "{} R:{} F:{} hv:{:.4}",
            self.admitted, self.rejected, self.failed, self.hypervolume
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_iterations: usize) -> Result<()> {
        let pb = ProgressBar::new(total_iterations as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} iterations (A:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_candidate(
        &mut self,
        _iteration: usize,
        _evaluation: &VectorReturn,
        admission: &AdmissionResult,
    ) -> Result<()> {
        if admission.is_admitted() {
            self.admitted += 1;
        } else {
            self.rejected += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_front_update(
        &mut self,
        _iteration: usize,
        hypervolume: f64,
        _sparsity: f64,
        _front_size: usize,
    ) -> Result<()> {
        self.hypervolume = hypervolume;
        if let Some(pb) = &self.progress_bar {
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_failure(
        &mut self,
        _iteration: usize,
        _attempts: usize,
        _message: &str,
    ) -> Result<()> {
        self.failed += 1;
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_run_end(&mut self, _outcome: &RunOutcome) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks run metrics
pub struct MetricsObserver {
    admitted: usize,
    rejected: usize,
    failed: usize,
    iterations: usize,
    hypervolume_history: Vec<f64>,
    sparsity_history: Vec<f64>,
    front_sizes: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            admitted: 0,
            rejected: 0,
            failed: 0,
            iterations: 0,
            hypervolume_history: Vec::new(),
            sparsity_history: Vec::new(),
            front_sizes: Vec::new(),
        }
    }

    /// Fraction of processed iterations whose candidate was admitted
    pub fn admission_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.admitted as f64 / self.iterations as f64
        }
    }

    /// Hypervolume after each submission, in completion order
    pub fn hypervolume_history(&self) -> &[f64] {
        &self.hypervolume_history
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            iterations: self.iterations,
            admitted: self.admitted,
            rejected: self.rejected,
            failed: self.failed,
            admission_rate: self.admission_rate(),
            final_hypervolume: self.hypervolume_history.last().copied().unwrap_or(0.0),
            final_sparsity: self.sparsity_history.last().copied().unwrap_or(0.0),
            final_front_size: self.front_sizes.last().copied().unwrap_or(0),
        }
    }
}

/// Summary of run metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub iterations: usize,
    pub admitted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub admission_rate: f64,
    pub final_hypervolume: f64,
    pub final_sparsity: f64,
    pub final_front_size: usize,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_candidate(
        &mut self,
        _iteration: usize,
        _evaluation: &VectorReturn,
        admission: &AdmissionResult,
    ) -> Result<()> {
        self.iterations += 1;
        if admission.is_admitted() {
            self.admitted += 1;
        } else {
            self.rejected += 1;
        }
        Ok(())
    }

    fn on_front_update(
        &mut self,
        _iteration: usize,
        hypervolume: f64,
        sparsity: f64,
        front_size: usize,
    ) -> Result<()> {
        self.hypervolume_history.push(hypervolume);
        self.sparsity_history.push(sparsity);
        self.front_sizes.push(front_size);
        Ok(())
    }

    fn on_training_failure(
        &mut self,
        _iteration: usize,
        _attempts: usize,
        _message: &str,
    ) -> Result<()> {
        self.iterations += 1;
        self.failed += 1;
        Ok(())
    }
}

/// One JSONL record per processed iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Iteration index (dispatch order)
    pub iteration: usize,
    /// Scalarization weights that directed the iteration
    pub weights: Option<Vec<f64>>,
    /// The candidate's averaged evaluation, if training succeeded
    pub evaluation: Option<Vec<f64>>,
    /// Whether the candidate was admitted
    pub admitted: bool,
    /// Rejection reason or failure message, when applicable
    pub note: Option<String>,
    /// Front hypervolume after the submission
    pub hypervolume: Option<f64>,
    /// Whole-front sparsity after the submission
    pub sparsity: Option<f64>,
    /// Front size after the submission
    pub front_size: Option<usize>,
}

/// JSONL observer - Exports one record per iteration for offline analysis
pub struct JsonlObserver {
    writer: BufWriter<File>,
    weights_by_iteration: Vec<(usize, Vec<f64>)>,
    pending: Option<IterationRecord>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            weights_by_iteration: Vec::new(),
            pending: None,
        })
    }

    fn weights_for(&mut self, iteration: usize) -> Option<Vec<f64>> {
        let position = self
            .weights_by_iteration
            .iter()
            .position(|(i, _)| *i == iteration)?;
        Some(self.weights_by_iteration.swap_remove(position).1)
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(record) = self.pending.take() {
            serde_json::to_writer(&mut self.writer, &record)?;
            writeln!(&mut self.writer)?;
        }
        Ok(())
    }
}

impl Observer for JsonlObserver {
    fn on_iteration_start(&mut self, iteration: usize, weights: &WeightVector) -> Result<()> {
        self.weights_by_iteration
            .push((iteration, weights.as_slice().to_vec()));
        Ok(())
    }

    fn on_candidate(
        &mut self,
        iteration: usize,
        evaluation: &VectorReturn,
        admission: &AdmissionResult,
    ) -> Result<()> {
        self.flush_pending()?;
        let note = match admission {
            AdmissionResult::Admitted { .. } => None,
            AdmissionResult::Rejected { reason } => Some(
                match reason {
                    RejectionReason::Dominated => "dominated",
                    RejectionReason::NoImprovement => "no-improvement",
                }
                .to_string(),
            ),
        };
        self.pending = Some(IterationRecord {
            iteration,
            weights: self.weights_for(iteration),
            evaluation: Some(evaluation.as_slice().to_vec()),
            admitted: admission.is_admitted(),
            note,
            hypervolume: None,
            sparsity: None,
            front_size: None,
        });
        Ok(())
    }

    fn on_front_update(
        &mut self,
        iteration: usize,
        hypervolume: f64,
        sparsity: f64,
        front_size: usize,
    ) -> Result<()> {
        if let Some(record) = self.pending.as_mut()
            && record.iteration == iteration
        {
            record.hypervolume = Some(hypervolume);
            record.sparsity = Some(sparsity);
            record.front_size = Some(front_size);
        }
        self.flush_pending()
    }

    fn on_training_failure(
        &mut self,
        iteration: usize,
        attempts: usize,
        message: &str,
    ) -> Result<()> {
        self.flush_pending()?;
        let weights = self.weights_for(iteration);
        let record = IterationRecord {
            iteration,
            weights,
            evaluation: None,
            admitted: false,
            note: Some(format!("failed after {attempts} attempt(s): {message}")),
            hypervolume: None,
            sparsity: None,
            front_size: None,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_run_end(&mut self, _outcome: &RunOutcome) -> Result<()> {
        self.flush_pending()?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::AdmissionResult;

    fn vr(values: &[f64]) -> VectorReturn {
        VectorReturn::new(values.to_vec()).unwrap()
    }

    fn admitted() -> AdmissionResult {
        AdmissionResult::Admitted {
            generation: 0,
            evicted: Vec::new(),
        }
    }

    fn rejected() -> AdmissionResult {
        AdmissionResult::Rejected {
            reason: RejectionReason::Dominated,
        }
    }

    #[test]
    fn test_metrics_observer() {
        let mut observer = MetricsObserver::new();
        assert_eq!(observer.admission_rate(), 0.0);

        observer.on_candidate(0, &vr(&[1.0, 2.0]), &admitted()).unwrap();
        observer.on_front_update(0, 2.0, 0.0, 1).unwrap();
        observer.on_candidate(1, &vr(&[0.5, 0.5]), &rejected()).unwrap();
        observer.on_training_failure(2, 3, "crash").unwrap();

        let summary = observer.summary();
        assert_eq!(summary.iterations, 3);
        assert_eq!(summary.admitted, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.failed, 1);
        assert!((summary.admission_rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.final_hypervolume, 2.0);
        assert_eq!(summary.final_front_size, 1);
    }

    #[test]
    fn test_jsonl_observer_writes_records() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_path_buf();

        let mut observer = JsonlObserver::new(&path).unwrap();
        let weights = WeightVector::new(vec![0.5, 0.5]).unwrap();

        observer.on_run_start(2).unwrap();
        observer.on_iteration_start(0, &weights).unwrap();
        observer.on_candidate(0, &vr(&[1.0, 1.0]), &admitted()).unwrap();
        observer.on_front_update(0, 1.0, 0.0, 1).unwrap();
        observer.on_iteration_start(1, &weights).unwrap();
        observer.on_training_failure(1, 2, "crash").unwrap();
        observer.on_run_end(&RunOutcome::Completed).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: IterationRecord = serde_json::from_str(lines[0]).unwrap();
        assert!(first.admitted);
        assert_eq!(first.hypervolume, Some(1.0));
        assert_eq!(first.weights, Some(vec![0.5, 0.5]));

        let second: IterationRecord = serde_json::from_str(lines[1]).unwrap();
        assert!(!second.admitted);
        assert!(second.note.as_deref().unwrap_or("").contains("crash"));
    }
}
