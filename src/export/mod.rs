//! Export functionality for analysis and research
//!
//! This module provides functionality to export archive state in tabular
//! formats. Currently supports CSV export of archive snapshots with
//! per-entry quality indicators.

mod front_csv;

pub use front_csv::{FrontCsvExporter, FrontCsvRecord};
