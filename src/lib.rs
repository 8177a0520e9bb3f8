//! Multi-objective reinforcement learning core
//!
//! This crate provides:
//! - Pareto dominance checks and non-dominated-front extraction over
//!   vector-valued policy returns
//! - Hypervolume and sparsity quality indicators
//! - A bounded Pareto archive with contribution-driven admission/eviction
//! - Scalarization weight-vector generation and adaptation
//! - A training coordinator orchestrating external policy-improvement
//!   delegates, with parallel dispatch and checkpointing

pub mod adapters;
pub mod app;
pub mod archive;
pub mod dominance;
pub mod error;
pub mod export;
pub mod identifiers;
pub mod indicators;
pub mod pipeline;
pub mod ports;
pub mod types;
pub mod utils;
pub mod weights;

pub use archive::{
    AdmissionResult, ArchiveConfig, ArchiveEntry, EvictionCriterion, PolicyArchive,
    RejectionReason, SavedArchive,
};
pub use dominance::{DominanceEngine, ObjectiveSense};
pub use error::{Error, Result};
pub use identifiers::PolicyId;
pub use indicators::{HypervolumeIndicator, crowding_distances, front_sparsity};
pub use pipeline::{RunConfig, RunOutcome, RunReport, TrainingCoordinator};
pub use types::{VectorReturn, WeightVector};
pub use weights::WeightVectorManager;
