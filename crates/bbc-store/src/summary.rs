use std::collections::{BTreeMap, BTreeSet};

use bbc_core::DistanceOutcome;
use serde::{Deserialize, Serialize};

use crate::archive::ConfigArchive;

/// Number of records sharing `[[n, k, d]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterCount {
    /// Physical qubits.
    pub n: usize,
    /// Logical qubits.
    pub k: usize,
    /// Exact distance, absent when not computed or failed.
    pub distance: Option<usize>,
    /// Records with these parameters.
    pub count: usize,
}

/// Aggregate view of an archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSummary {
    /// Pass that produced the archive.
    pub stage: String,
    /// Stored records.
    pub records: usize,
    /// Records with distinct canonical check matrices.
    pub distinct_codes: usize,
    /// Records with an exact distance.
    pub distances_exact: usize,
    /// Records whose distance solve failed.
    pub distances_failed: usize,
    /// Records not yet seen by the distance pass.
    pub distances_pending: usize,
    /// Highest encoding rate.
    pub best_rate: Option<f64>,
    /// Highest exact distance.
    pub best_distance: Option<usize>,
    /// Parameter histogram ordered by `(n, k, distance)`.
    pub parameters: Vec<ParameterCount>,
}

/// Summarises the records of `archive`.
pub fn summarize(archive: &ConfigArchive) -> ArchiveSummary {
    let configs = &archive.configs;
    let mut histogram: BTreeMap<(usize, usize, Option<usize>), usize> = BTreeMap::new();
    let mut summary = ArchiveSummary {
        stage: archive.provenance.stage.clone(),
        records: configs.len(),
        distinct_codes: configs
            .iter()
            .map(|config| config.code_hash.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
        distances_exact: 0,
        distances_failed: 0,
        distances_pending: 0,
        best_rate: None,
        best_distance: None,
        parameters: Vec::new(),
    };

    for config in configs {
        let distance = match &config.distance {
            Some(DistanceOutcome::Exact { distance }) => {
                summary.distances_exact += 1;
                Some(*distance)
            }
            Some(DistanceOutcome::Failed { .. }) => {
                summary.distances_failed += 1;
                None
            }
            None => {
                summary.distances_pending += 1;
                None
            }
        };
        summary.best_distance = summary.best_distance.max(distance);
        summary.best_rate = Some(match summary.best_rate {
            Some(best) => best.max(config.encoding_rate),
            None => config.encoding_rate,
        });
        *histogram
            .entry((config.n_phys_qubits, config.n_log_qubits, distance))
            .or_default() += 1;
    }

    summary.parameters = histogram
        .into_iter()
        .map(|((n, k, distance), count)| ParameterCount { n, k, distance, count })
        .collect();
    summary
}
