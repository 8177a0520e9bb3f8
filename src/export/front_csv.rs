//! CSV export of archive snapshots
//!
//! Writes one row per archived entry with its objectives, hypervolume
//! contribution, crowding distance, and front membership, for analysis in
//! external tooling.

use std::path::Path;

use crate::{
    Result,
    archive::PolicyArchive,
    indicators::crowding_distances,
};

/// A single row in the archive CSV export
#[derive(Debug, Clone)]
pub struct FrontCsvRecord {
    pub policy: String,
    pub generation: u64,
    pub objectives: Vec<f64>,
    pub contribution: f64,
    pub crowding_distance: f64,
    pub on_front: bool,
}

/// CSV exporter for archive snapshots
pub struct FrontCsvExporter;

impl FrontCsvExporter {
    /// Collect one record per archived entry, in admission order.
    pub fn collect(archive: &PolicyArchive) -> Result<Vec<FrontCsvRecord>> {
        let entries = archive.snapshot();
        let evaluations: Vec<_> = entries.iter().map(|e| e.evaluation.clone()).collect();
        let crowding = crowding_distances(&evaluations)?;
        let front_generations: Vec<u64> = archive
            .current_front()
            .into_iter()
            .map(|e| e.generation)
            .collect();

        let mut records = Vec::with_capacity(entries.len());
        for (entry, crowding_distance) in entries.iter().zip(crowding) {
            let contribution = archive
                .indicator()
                .contribution(&entry.evaluation, &evaluations)?;
            records.push(FrontCsvRecord {
                policy: entry.policy.as_str().to_string(),
                generation: entry.generation,
                objectives: entry.evaluation.as_slice().to_vec(),
                contribution,
                crowding_distance,
                on_front: front_generations.contains(&entry.generation),
            });
        }
        Ok(records)
    }

    /// Export an archive snapshot to CSV
    ///
    /// # Returns
    ///
    /// Number of entries exported
    pub fn export<P: AsRef<Path>>(archive: &PolicyArchive, path: P) -> Result<usize> {
        let records = Self::collect(archive)?;
        let dim = archive.config().reference_point.dim();

        let mut writer = csv::Writer::from_path(path.as_ref())?;

        let mut header: Vec<String> =
            vec!["policy".to_string(), "generation".to_string()];
        for objective in 0..dim {
            header.push(format!("objective_{objective}"));
        }
        header.push("contribution".to_string());
        header.push("crowding_distance".to_string());
        header.push("on_front".to_string());
        writer.write_record(&header)?;

        for record in &records {
            let mut row: Vec<String> =
                vec![record.policy.clone(), record.generation.to_string()];
            for value in &record.objectives {
                row.push(value.to_string());
            }
            row.push(record.contribution.to_string());
            row.push(record.crowding_distance.to_string());
            row.push(record.on_front.to_string());
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(records.len())
    }
}
