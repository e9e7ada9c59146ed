/// Merging per-ecosystem batches into one sorted result set, and the
/// snapshot the orchestrator keeps of its last completed scan.
use crate::model::ScanResult;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// The last completed scan of an orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSnapshot {
    pub results: Vec<ScanResult>,
    pub total_bytes: u64,
    pub finished_at: DateTime<Local>,
    pub duration: Duration,
}

impl ScanSnapshot {
    pub fn new(results: Vec<ScanResult>, duration: Duration) -> Self {
        let total_bytes = results.iter().map(|r| r.size_bytes).sum();
        Self {
            results,
            total_bytes,
            finished_at: Local::now(),
            duration,
        }
    }
}

/// Concatenate batches in the given order, drop repeated paths (first one
/// wins), and sort by size descending.
///
/// `sort_by` is a stable O(n log n) merge sort, so equal sizes keep
/// discovery order: batch order first, then order within the batch.
pub fn merge_results(batches: Vec<Vec<ScanResult>>) -> Vec<ScanResult> {
    let capacity = batches.iter().map(Vec::len).sum();
    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(capacity);
    let mut merged: Vec<ScanResult> = Vec::with_capacity(capacity);

    for result in batches.into_iter().flatten() {
        if seen.insert(result.path.clone()) {
            merged.push(result);
        }
    }
    merged.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    merged
}
