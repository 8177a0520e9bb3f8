//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the coordination core and its
//! external collaborators. Following hexagonal architecture, these traits
//! are owned by the domain and implemented by adapters: the training and
//! evaluation delegates by the RL/ML stack driving actual policy updates,
//! the repository by the persistence layer, and observers by whatever
//! reporting the experiment needs.

pub mod delegate;
pub mod evaluator;
pub mod observer;
pub mod repository;

pub use delegate::{CancellationToken, Improvement, TrainingDelegate};
pub use evaluator::PolicyEvaluator;
pub use observer::Observer;
pub use repository::ArchiveRepository;
