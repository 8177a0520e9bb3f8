//! Training coordination pipeline
//!
//! The coordinator drives the outer MORL loop: weight vectors out, trained
//! and evaluated candidates in, archive and weight adaptation updated after
//! every submission. Observers attach to the loop for progress display,
//! metrics, and structured export.

pub mod coordinator;
pub mod observers;

pub use coordinator::{RunConfig, RunOutcome, RunReport, TrainingCoordinator};
pub use observers::{JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver};
