/// Outcome of deleting one previously-scanned item.
use serde::Serialize;
use std::path::PathBuf;

/// `error_message` is empty exactly when `success` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanResult {
    pub path: PathBuf,
    /// Bytes freed; zero for failed items.
    pub size_bytes: u64,
    pub success: bool,
    pub error_message: String,
}

impl CleanResult {
    pub fn succeeded(path: PathBuf, size_bytes: u64) -> Self {
        Self {
            path,
            size_bytes,
            success: true,
            error_message: String::new(),
        }
    }

    pub fn failed(path: PathBuf, message: impl Into<String>) -> Self {
        let mut error_message = message.into();
        if error_message.is_empty() {
            error_message.push_str("unknown error");
        }
        Self {
            path,
            size_bytes: 0,
            success: false,
            error_message,
        }
    }
}

/// Aggregate over a batch of [`CleanResult`]s, e.g. "3 of 4 items deleted, 1.2 GB freed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub freed_bytes: u64,
    pub success_count: usize,
    pub failure_count: usize,
}

impl CleanSummary {
    pub fn from_results(results: &[CleanResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            if r.success {
                acc.freed_bytes += r.size_bytes;
                acc.success_count += 1;
            } else {
                acc.failure_count += 1;
            }
            acc
        })
    }
}
