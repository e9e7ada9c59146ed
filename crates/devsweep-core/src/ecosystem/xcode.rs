use super::catalog::{scan_catalog, GlobalCache};
use super::{EcosystemKind, EcosystemScanner, ScanContext};
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::Environment;

// Relative to ~/Library/Developer.
const XCODE_DIRS: &[(&str, &str)] = &[
    ("Xcode/DerivedData", "Xcode derived data"),
    ("Xcode/Archives", "Xcode archives"),
    ("Xcode/iOS DeviceSupport", "iOS device support"),
    ("CoreSimulator/Caches", "Simulator caches"),
];

/// Xcode's global developer caches. Xcode builds out of tree, so no project rules.
pub struct XcodeScanner {
    globals: Vec<GlobalCache>,
}

impl XcodeScanner {
    pub fn new(env: &Environment) -> Self {
        let developer = env.resolve("~/Library/Developer");
        Self {
            globals: XCODE_DIRS
                .iter()
                .map(|(rel, name)| GlobalCache::new(developer.join(rel), *name))
                .collect(),
        }
    }
}

impl EcosystemScanner for XcodeScanner {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Xcode
    }

    fn scan(&self, ctx: &ScanContext<'_>) -> Result<Vec<ScanResult>> {
        scan_catalog(self.kind(), &self.globals, &[], ctx)
    }
}
