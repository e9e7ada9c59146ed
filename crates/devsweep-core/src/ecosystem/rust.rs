use super::catalog::{scan_catalog, GlobalCache, ProjectRule};
use super::{EcosystemKind, EcosystemScanner, ScanContext};
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::Environment;
use std::path::PathBuf;

const PROJECT_RULES: &[ProjectRule] = &[ProjectRule {
    markers: &["Cargo.toml"],
    artifacts: &["target"],
}];

/// Cargo registry/git caches under `$CARGO_HOME`, plus `target/` of every crate.
pub struct RustScanner {
    cargo_home: PathBuf,
}

impl RustScanner {
    pub fn new(env: &Environment) -> Self {
        Self {
            cargo_home: env.override_or("CARGO_HOME", "~/.cargo"),
        }
    }

    fn global_caches(&self) -> Vec<GlobalCache> {
        let home = &self.cargo_home;
        vec![
            GlobalCache::new(home.join("registry").join("cache"), "Cargo registry cache"),
            GlobalCache::new(home.join("registry").join("src"), "Cargo registry sources"),
            GlobalCache::new(home.join("git").join("checkouts"), "Cargo git checkouts"),
            GlobalCache::new(home.join("git").join("db"), "Cargo git database"),
        ]
    }
}

impl EcosystemScanner for RustScanner {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Rust
    }

    fn scan(&self, ctx: &ScanContext<'_>) -> Result<Vec<ScanResult>> {
        scan_catalog(self.kind(), &self.global_caches(), PROJECT_RULES, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cargo_home_override_relocates_caches() {
        let env = Environment::with_home("/home/dev").with_override("CARGO_HOME", "/data/cargo");
        let caches = RustScanner::new(&env).global_caches();
        assert!(caches.iter().all(|c| c.path.starts_with("/data/cargo")));
    }
}
