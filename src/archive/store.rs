//! Archive storage, admission, and eviction.
//!
//! The archive is the single mutable structure of a run. It holds up to
//! `capacity` entries, each pairing an opaque policy handle with its
//! evaluated vector return and an admission generation counter. Admission
//! and eviction decisions are driven by Pareto dominance and hypervolume
//! contribution, with a configurable tie-break order.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    dominance::{DominanceEngine, ObjectiveSense},
    identifiers::PolicyId,
    indicators::{HypervolumeIndicator, crowding_distances},
    types::VectorReturn,
};

/// Quality signal consulted during eviction candidate selection.
///
/// The default order is contribution, then sparsity, then generation; the
/// order is configurable because archive practice varies between algorithm
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EvictionCriterion {
    /// Exclusive hypervolume contribution; lowest is evicted first.
    Contribution,
    /// Crowding distance; densest neighborhood is evicted first.
    Sparsity,
    /// Admission generation; oldest is evicted first.
    Generation,
}

impl EvictionCriterion {
    /// The inferred standard order: contribution, sparsity, generation.
    pub fn default_order() -> Vec<EvictionCriterion> {
        vec![
            EvictionCriterion::Contribution,
            EvictionCriterion::Sparsity,
            EvictionCriterion::Generation,
        ]
    }
}

impl fmt::Display for EvictionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EvictionCriterion::Contribution => "contribution",
            EvictionCriterion::Sparsity => "sparsity",
            EvictionCriterion::Generation => "generation",
        };
        f.write_str(label)
    }
}

impl FromStr for EvictionCriterion {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contribution" | "hypervolume" => Ok(EvictionCriterion::Contribution),
            "sparsity" | "crowding" => Ok(EvictionCriterion::Sparsity),
            "generation" | "age" => Ok(EvictionCriterion::Generation),
            _ => Err(crate::Error::ParseEvictionCriterion {
                input: s.to_string(),
                expected: "contribution/hypervolume, sparsity/crowding, generation/age".to_string(),
            }),
        }
    }
}

/// An archived policy: opaque handle, evaluation, and admission generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Handle owned by the external training collaborator.
    pub policy: PolicyId,
    /// The policy's evaluated vector return.
    pub evaluation: VectorReturn,
    /// Monotone admission counter, for tie-breaking and provenance.
    pub generation: u64,
}

/// Why a submission was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Dominated by an archived entry.
    Dominated,
    /// Swapping the candidate in would not improve front hypervolume.
    NoImprovement,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RejectionReason::Dominated => "dominated",
            RejectionReason::NoImprovement => "no-improvement",
        };
        f.write_str(label)
    }
}

/// Outcome of a `submit` call.
///
/// Rejections are an expected, frequent outcome of training and are reported
/// through this value, never as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdmissionResult {
    /// The candidate was archived, possibly evicting an existing entry.
    Admitted {
        /// Generation assigned to the new entry.
        generation: u64,
        /// Entries removed to make room (capacity eviction and, with
        /// `retain_dominated` off, dominated-entry pruning).
        evicted: Vec<ArchiveEntry>,
    },
    /// The candidate was turned away; the archive is unchanged.
    Rejected { reason: RejectionReason },
}

impl AdmissionResult {
    /// True iff the candidate entered the archive.
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionResult::Admitted { .. })
    }
}

/// Configuration for a [`PolicyArchive`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Maximum number of entries (`K`).
    pub capacity: usize,
    /// Hypervolume reference point; fixed per run.
    pub reference_point: VectorReturn,
    /// Optimization sense per objective.
    pub senses: Vec<ObjectiveSense>,
    /// Keep entries that become dominated until capacity pressure evicts
    /// them (true, default) or prune them on admission of a dominating
    /// candidate (false).
    pub retain_dominated: bool,
    /// Ordered tie-break criteria for eviction candidate selection.
    pub eviction_order: Vec<EvictionCriterion>,
    /// Contributions closer than this are treated as equal during eviction.
    pub contribution_epsilon: f64,
}

impl ArchiveConfig {
    /// Create a maximizing configuration with default eviction behavior.
    pub fn new(capacity: usize, reference_point: VectorReturn) -> Self {
        let senses = vec![ObjectiveSense::Maximize; reference_point.dim()];
        Self {
            capacity,
            reference_point,
            senses,
            retain_dominated: true,
            eviction_order: EvictionCriterion::default_order(),
            contribution_epsilon: 1e-9,
        }
    }

    /// Set the per-objective optimization senses.
    pub fn with_senses(mut self, senses: Vec<ObjectiveSense>) -> Self {
        self.senses = senses;
        self
    }

    /// Set whether dominated entries are retained for diversity.
    pub fn with_retain_dominated(mut self, retain: bool) -> Self {
        self.retain_dominated = retain;
        self
    }

    /// Set the eviction tie-break order.
    pub fn with_eviction_order(mut self, order: Vec<EvictionCriterion>) -> Self {
        self.eviction_order = order;
        self
    }

    /// Set the near-equality epsilon for contribution comparisons.
    pub fn with_contribution_epsilon(mut self, epsilon: f64) -> Self {
        self.contribution_epsilon = epsilon;
        self
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] on a zero capacity,
    /// empty eviction order, or sense/reference dimensionality disagreement.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.capacity == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "archive capacity must be at least 1".to_string(),
            });
        }
        if self.senses.len() != self.reference_point.dim() {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "{} objective senses configured for a {}-dimensional reference point",
                    self.senses.len(),
                    self.reference_point.dim()
                ),
            });
        }
        if self.eviction_order.is_empty() {
            return Err(crate::Error::InvalidConfiguration {
                message: "eviction order must name at least one criterion".to_string(),
            });
        }
        if !self.contribution_epsilon.is_finite() || self.contribution_epsilon < 0.0 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "contribution epsilon {} must be finite and non-negative",
                    self.contribution_epsilon
                ),
            });
        }
        Ok(())
    }
}

/// Bounded store of evaluated policies.
///
/// Entry lifecycle: a submitted candidate is either archived or rejected;
/// archived entries live until evicted (capacity pressure or, with
/// `retain_dominated` off, dominance pruning). All mutation goes through
/// [`PolicyArchive::submit`]; every other operation is read-only.
///
/// # Examples
///
/// ```
/// use morl::archive::{ArchiveConfig, PolicyArchive};
/// use morl::identifiers::PolicyId;
/// use morl::types::VectorReturn;
///
/// let config = ArchiveConfig::new(3, VectorReturn::new(vec![0.0, 0.0])?);
/// let mut archive = PolicyArchive::new(config)?;
///
/// let result = archive.submit(PolicyId::new("p0"), VectorReturn::new(vec![3.0, 1.0])?)?;
/// assert!(result.is_admitted());
/// assert_eq!(archive.size(), 1);
/// # Ok::<(), morl::Error>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyArchive {
    config: ArchiveConfig,
    dominance: DominanceEngine,
    indicator: HypervolumeIndicator,
    entries: Vec<ArchiveEntry>,
    next_generation: u64,
}

impl PolicyArchive {
    /// Create an empty archive.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration
    /// fails validation.
    pub fn new(config: ArchiveConfig) -> Result<Self, crate::Error> {
        config.validate()?;
        let dominance = DominanceEngine::new(config.senses.clone())?;
        let indicator =
            HypervolumeIndicator::new(config.reference_point.clone(), config.senses.clone())?;
        Ok(Self {
            config,
            dominance,
            indicator,
            entries: Vec::new(),
            next_generation: 0,
        })
    }

    /// Restore an archive from checkpointed entries.
    ///
    /// Entries are re-inserted verbatim (no re-admission logic) and the
    /// generation counter resumes above the highest restored generation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the entries exceed
    /// capacity and [`crate::Error::DimensionMismatch`] if any evaluation
    /// disagrees with the reference point's dimensionality.
    pub fn from_entries(
        config: ArchiveConfig,
        entries: Vec<ArchiveEntry>,
    ) -> Result<Self, crate::Error> {
        let mut archive = Self::new(config)?;
        if entries.len() > archive.config.capacity {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "{} checkpointed entries exceed archive capacity {}",
                    entries.len(),
                    archive.config.capacity
                ),
            });
        }
        for entry in &entries {
            if entry.evaluation.dim() != archive.config.reference_point.dim() {
                return Err(crate::Error::DimensionMismatch {
                    expected: archive.config.reference_point.dim(),
                    got: entry.evaluation.dim(),
                });
            }
        }
        archive.next_generation = entries
            .iter()
            .map(|e| e.generation + 1)
            .max()
            .unwrap_or(0);
        archive.entries = entries;
        Ok(archive)
    }

    /// The archive configuration.
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// The hypervolume indicator configured for this run.
    pub fn indicator(&self) -> &HypervolumeIndicator {
        &self.indicator
    }

    /// Number of archived entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// True iff no entries are archived.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Ordered snapshot of all entries (ascending generation) for
    /// checkpointing and inspection.
    pub fn snapshot(&self) -> Vec<ArchiveEntry> {
        self.entries.clone()
    }

    /// The live non-dominated subset of the archive.
    ///
    /// May be smaller than the whole archive when dominated entries are
    /// retained for diversity. Exact-duplicate evaluations collapse to the
    /// earliest admitted entry.
    pub fn current_front(&self) -> Vec<&ArchiveEntry> {
        let evaluations = self.evaluations();
        // Entries validated on admission, so extraction cannot fail.
        let indices = self
            .dominance
            .non_dominated_indices(&evaluations)
            .unwrap_or_default();
        indices.into_iter().map(|i| &self.entries[i]).collect()
    }

    /// Evaluations of the current front, for indicator computations.
    pub fn front_evaluations(&self) -> Vec<VectorReturn> {
        self.current_front()
            .into_iter()
            .map(|e| e.evaluation.clone())
            .collect()
    }

    /// Hypervolume of the current front, with entries that fail to dominate
    /// the reference point excluded from accounting.
    pub fn front_hypervolume(&self) -> Result<f64, crate::Error> {
        self.indicator.hypervolume_excluding_invalid(&self.evaluations())
    }

    /// Submit an evaluated candidate policy.
    ///
    /// Under capacity the candidate is always admitted. At capacity it is
    /// admitted only if no archived entry dominates it and swapping it in
    /// for the lowest-contribution entry strictly improves front
    /// hypervolume; the displaced entry is evicted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DimensionMismatch`] if the evaluation's
    /// dimensionality disagrees with the reference point's. Rejections are
    /// reported through the returned [`AdmissionResult`], not as errors.
    pub fn submit(
        &mut self,
        policy: PolicyId,
        evaluation: VectorReturn,
    ) -> Result<AdmissionResult, crate::Error> {
        if evaluation.dim() != self.config.reference_point.dim() {
            return Err(crate::Error::DimensionMismatch {
                expected: self.config.reference_point.dim(),
                got: evaluation.dim(),
            });
        }

        if self.entries.len() < self.config.capacity {
            if !self.config.retain_dominated && self.is_dominated_by_archive(&evaluation)? {
                return Ok(AdmissionResult::Rejected {
                    reason: RejectionReason::Dominated,
                });
            }
            let evicted = if self.config.retain_dominated {
                Vec::new()
            } else {
                self.prune_dominated_by(&evaluation)?
            };
            let generation = self.admit(policy, evaluation);
            return Ok(AdmissionResult::Admitted { generation, evicted });
        }

        // At capacity: dominated candidates never displace anything.
        if self.is_dominated_by_archive(&evaluation)? {
            return Ok(AdmissionResult::Rejected {
                reason: RejectionReason::Dominated,
            });
        }

        let victim_index = self.eviction_candidate()?;
        let current = self.front_hypervolume()?;

        let mut swapped: Vec<VectorReturn> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != victim_index)
            .map(|(_, e)| e.evaluation.clone())
            .collect();
        swapped.push(evaluation.clone());
        let after_swap = self.indicator.hypervolume_excluding_invalid(&swapped)?;

        if after_swap <= current {
            return Ok(AdmissionResult::Rejected {
                reason: RejectionReason::NoImprovement,
            });
        }

        let mut evicted = vec![self.entries.remove(victim_index)];
        if !self.config.retain_dominated {
            evicted.extend(self.prune_dominated_by(&evaluation)?);
        }
        let generation = self.admit(policy, evaluation);
        Ok(AdmissionResult::Admitted { generation, evicted })
    }

    fn admit(&mut self, policy: PolicyId, evaluation: VectorReturn) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.entries.push(ArchiveEntry {
            policy,
            evaluation,
            generation,
        });
        generation
    }

    fn evaluations(&self) -> Vec<VectorReturn> {
        self.entries.iter().map(|e| e.evaluation.clone()).collect()
    }

    fn is_dominated_by_archive(&self, evaluation: &VectorReturn) -> Result<bool, crate::Error> {
        for entry in &self.entries {
            if self.dominance.dominates(&entry.evaluation, evaluation)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Remove entries dominated by `evaluation`, returning them.
    fn prune_dominated_by(
        &mut self,
        evaluation: &VectorReturn,
    ) -> Result<Vec<ArchiveEntry>, crate::Error> {
        let mut dominated = Vec::new();
        for entry in &self.entries {
            if self.dominance.dominates(evaluation, &entry.evaluation)? {
                dominated.push(entry.generation);
            }
        }
        let mut removed = Vec::new();
        self.entries.retain(|entry| {
            if dominated.contains(&entry.generation) {
                removed.push(entry.clone());
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    /// Index of the entry contributing least to front quality, per the
    /// configured tie-break order.
    fn eviction_candidate(&self) -> Result<usize, crate::Error> {
        let evaluations = self.evaluations();
        let mut contributions = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            contributions.push(self.indicator.contribution(&entry.evaluation, &evaluations)?);
        }
        let crowding = crowding_distances(&evaluations)?;

        let mut victim = 0;
        for candidate in 1..self.entries.len() {
            if self.evicts_before(candidate, victim, &contributions, &crowding) {
                victim = candidate;
            }
        }
        Ok(victim)
    }

    /// True iff entry `a` should be evicted in preference to entry `b`.
    fn evicts_before(
        &self,
        a: usize,
        b: usize,
        contributions: &[f64],
        crowding: &[f64],
    ) -> bool {
        let epsilon = self.config.contribution_epsilon;
        for criterion in &self.config.eviction_order {
            let ordering = match criterion {
                EvictionCriterion::Contribution => {
                    compare_with_epsilon(contributions[a], contributions[b], epsilon)
                }
                EvictionCriterion::Sparsity => {
                    compare_with_epsilon(crowding[a], crowding[b], epsilon)
                }
                EvictionCriterion::Generation => {
                    self.entries[a].generation.cmp(&self.entries[b].generation)
                }
            };
            match ordering {
                std::cmp::Ordering::Less => return true,
                std::cmp::Ordering::Greater => return false,
                std::cmp::Ordering::Equal => continue,
            }
        }
        false
    }
}

/// Three-way comparison treating near-equal values (and equal infinities)
/// as ties so the next criterion decides.
fn compare_with_epsilon(a: f64, b: f64, epsilon: f64) -> std::cmp::Ordering {
    if a == b || (a - b).abs() <= epsilon {
        return std::cmp::Ordering::Equal;
    }
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}
