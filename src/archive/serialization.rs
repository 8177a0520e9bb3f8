//! Archive checkpoint serialization
//!
//! Provides a versioned, flat-record representation of a trained archive for
//! checkpoint/resume: one record per entry holding the policy handle, the
//! return vector, and the admission generation.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use super::store::{ArchiveConfig, ArchiveEntry, EvictionCriterion, PolicyArchive};
use crate::{dominance::ObjectiveSense, identifiers::PolicyId, types::VectorReturn};

/// Serializable representation of an archive checkpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedArchive {
    /// Version of the save format (for future compatibility)
    pub version: u32,
    /// Flat entry records, ordered by admission generation
    pub entries: Vec<SavedEntry>,
    /// Archive capacity (`K`)
    pub capacity: usize,
    /// Hypervolume reference point components
    pub reference_point: Vec<f64>,
    /// Per-objective optimization senses
    pub senses: Vec<ObjectiveSense>,
    /// Whether dominated entries were retained for diversity
    pub retain_dominated: bool,
    /// Eviction tie-break order in effect
    pub eviction_order: Vec<EvictionCriterion>,
    /// Near-equality epsilon for contribution comparisons
    pub contribution_epsilon: f64,
    /// Checkpoint metadata
    pub metadata: CheckpointMetadata,
}

/// One flat archive record: `(handle id, return vector, generation)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub policy: String,
    pub evaluation: Vec<f64>,
    pub generation: u64,
}

/// Metadata about the run that produced the checkpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Iterations completed when the checkpoint was taken
    pub iterations: Option<usize>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Timestamp when saved
    pub saved_at: Option<String>,
}

impl SavedArchive {
    /// Current save format version
    pub const VERSION: u32 = 1;

    /// Create from a live archive
    pub fn from_archive(archive: &PolicyArchive, metadata: CheckpointMetadata) -> Self {
        let config = archive.config();
        let entries = archive
            .snapshot()
            .into_iter()
            .map(|entry| SavedEntry {
                policy: entry.policy.into_inner(),
                evaluation: entry.evaluation.as_slice().to_vec(),
                generation: entry.generation,
            })
            .collect();

        Self {
            version: Self::VERSION,
            entries,
            capacity: config.capacity,
            reference_point: config.reference_point.as_slice().to_vec(),
            senses: config.senses.clone(),
            retain_dominated: config.retain_dominated,
            eviction_order: config.eviction_order.clone(),
            contribution_epsilon: config.contribution_epsilon,
            metadata,
        }
    }

    /// Reconstruct an archive from saved data
    ///
    /// The restored archive has the same entries, front, and generation
    /// counter progression as the one that was saved.
    pub fn to_archive(&self) -> Result<PolicyArchive> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }

        let reference_point = VectorReturn::new(self.reference_point.clone())?;
        let config = ArchiveConfig::new(self.capacity, reference_point)
            .with_senses(self.senses.clone())
            .with_retain_dominated(self.retain_dominated)
            .with_eviction_order(self.eviction_order.clone())
            .with_contribution_epsilon(self.contribution_epsilon);

        let mut entries = Vec::with_capacity(self.entries.len());
        for record in &self.entries {
            entries.push(ArchiveEntry {
                policy: PolicyId::new(record.policy.clone()),
                evaluation: VectorReturn::new(record.evaluation.clone())?,
                generation: record.generation,
            });
        }

        Ok(PolicyArchive::from_entries(config, entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vr(values: &[f64]) -> VectorReturn {
        VectorReturn::new(values.to_vec()).unwrap()
    }

    fn trained_archive() -> PolicyArchive {
        let config = ArchiveConfig::new(3, vr(&[0.0, 0.0]));
        let mut archive = PolicyArchive::new(config).unwrap();
        archive.submit(PolicyId::new("p0"), vr(&[3.0, 1.0])).unwrap();
        archive.submit(PolicyId::new("p1"), vr(&[1.0, 3.0])).unwrap();
        archive.submit(PolicyId::new("p2"), vr(&[2.0, 2.0])).unwrap();
        archive
    }

    #[test]
    fn test_save_load_roundtrip() -> Result<()> {
        let archive = trained_archive();
        let metadata = CheckpointMetadata {
            iterations: Some(3),
            seed: Some(42),
            saved_at: None,
        };

        let saved = SavedArchive::from_archive(&archive, metadata);
        let bytes = rmp_serde::to_vec(&saved)?;
        let loaded: SavedArchive = rmp_serde::from_slice(&bytes)?;
        let restored = loaded.to_archive()?;

        assert_eq!(restored.size(), archive.size());
        assert_eq!(restored.front_evaluations(), archive.front_evaluations());
        assert_eq!(restored.capacity(), archive.capacity());
        Ok(())
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let archive = trained_archive();
        let mut saved = SavedArchive::from_archive(&archive, CheckpointMetadata::default());
        saved.version = 99;
        assert!(saved.to_archive().is_err());
    }

    #[test]
    fn test_flat_records_preserve_generations() {
        let archive = trained_archive();
        let saved = SavedArchive::from_archive(&archive, CheckpointMetadata::default());
        let generations: Vec<u64> = saved.entries.iter().map(|e| e.generation).collect();
        assert_eq!(generations, vec![0, 1, 2]);
    }
}
