use super::catalog::{scan_catalog, GlobalCache, ProjectRule};
use super::{EcosystemKind, EcosystemScanner, ScanContext};
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::Environment;

const PROJECT_RULES: &[ProjectRule] = &[ProjectRule {
    markers: &["package.json"],
    artifacts: &["node_modules", ".next", ".parcel-cache"],
}];

/// npm / Yarn / pnpm / Bun caches, plus per-project `node_modules` and bundler output.
pub struct NodeScanner {
    globals: Vec<GlobalCache>,
}

impl NodeScanner {
    pub fn new(env: &Environment) -> Self {
        let npm_cache = match env.override_path("npm_config_cache") {
            Some(root) => root.join("_cacache"),
            None => env.resolve("~/.npm/_cacache"),
        };
        Self {
            globals: vec![
                GlobalCache::new(npm_cache, "npm cache"),
                GlobalCache::new(env.resolve("~/.cache/yarn"), "Yarn cache"),
                GlobalCache::new(env.resolve("~/Library/Caches/Yarn"), "Yarn cache"),
                GlobalCache::new(env.resolve("~/.pnpm-store"), "pnpm store"),
                GlobalCache::new(env.resolve("~/Library/pnpm/store"), "pnpm store"),
                GlobalCache::new(env.resolve("~/.bun/install/cache"), "Bun install cache"),
            ],
        }
    }
}

impl EcosystemScanner for NodeScanner {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Node
    }

    fn scan(&self, ctx: &ScanContext<'_>) -> Result<Vec<ScanResult>> {
        scan_catalog(self.kind(), &self.globals, PROJECT_RULES, ctx)
    }
}
