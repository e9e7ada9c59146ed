/// One discovered cleanable unit.
///
/// Produced by an ecosystem scanner during a scan pass and never mutated
/// afterwards; the next scan supersedes it with a fresh value.
use crate::ecosystem::EcosystemKind;
use crate::size::SizeSummary;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Owning ecosystem.
    pub kind: EcosystemKind,
    /// Human display label, e.g. `"Cargo registry cache"` or `"webapp/node_modules"`.
    pub name: CompactString,
    /// Absolute, fully expanded path.
    pub path: PathBuf,
    /// Sum of regular file sizes under `path` at scan time.
    pub size_bytes: u64,
    /// Number of regular files under `path`.
    pub file_count: u64,
}

impl ScanResult {
    pub fn new(
        kind: EcosystemKind,
        name: impl Into<CompactString>,
        path: PathBuf,
        summary: SizeSummary,
    ) -> Self {
        debug_assert!(path.is_absolute(), "scan result path must be absolute");
        Self {
            kind,
            name: name.into(),
            path,
            size_bytes: summary.size_bytes,
            file_count: summary.file_count,
        }
    }
}
