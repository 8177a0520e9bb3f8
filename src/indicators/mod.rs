//! Numeric quality indicators for Pareto fronts.
//!
//! Hypervolume ranks fronts and individual points for archive admission and
//! eviction; sparsity breaks ties and guides weight-vector adaptation toward
//! under-covered regions of objective space.

pub mod hypervolume;
pub mod sparsity;

pub use hypervolume::HypervolumeIndicator;
pub use sparsity::{crowding_distances, front_sparsity};
