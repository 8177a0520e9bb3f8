//! Bounded Pareto archive of evaluated policies
//!
//! This module provides the archive at the center of multi-policy training:
//! admission and eviction of candidate policies by hypervolume contribution,
//! plus checkpoint serialization.

pub mod serialization;
pub mod store;

// Re-export main types
pub use serialization::{CheckpointMetadata, SavedArchive, SavedEntry};
pub use store::{
    AdmissionResult, ArchiveConfig, ArchiveEntry, EvictionCriterion, PolicyArchive,
    RejectionReason,
};
