use super::catalog::{scan_catalog, GlobalCache, ProjectRule};
use super::{EcosystemKind, EcosystemScanner, ScanContext};
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::Environment;

const PROJECT_RULES: &[ProjectRule] = &[ProjectRule {
    markers: &["pubspec.yaml"],
    artifacts: &["build", ".dart_tool"],
}];

/// The pub package cache and Flutter/Dart project build output.
pub struct DartScanner {
    globals: Vec<GlobalCache>,
}

impl DartScanner {
    pub fn new(env: &Environment) -> Self {
        Self {
            globals: vec![GlobalCache::new(
                env.override_or("PUB_CACHE", "~/.pub-cache"),
                "pub cache",
            )],
        }
    }
}

impl EcosystemScanner for DartScanner {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Dart
    }

    fn scan(&self, ctx: &ScanContext<'_>) -> Result<Vec<ScanResult>> {
        scan_catalog(self.kind(), &self.globals, PROJECT_RULES, ctx)
    }
}
