use super::catalog::{scan_catalog, GlobalCache};
use super::{EcosystemKind, EcosystemScanner, ScanContext};
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::Environment;

/// Go module cache and build cache. Go has no per-project build directory.
pub struct GoScanner {
    globals: Vec<GlobalCache>,
}

impl GoScanner {
    pub fn new(env: &Environment) -> Self {
        // GOMODCACHE wins, then $GOPATH/pkg/mod, then ~/go/pkg/mod.
        let mod_cache = match (env.override_path("GOMODCACHE"), env.override_path("GOPATH")) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(gopath)) => gopath.join("pkg").join("mod"),
            (None, None) => env.resolve("~/go/pkg/mod"),
        };

        let mut globals = vec![GlobalCache::new(mod_cache, "Go module cache")];
        match env.override_path("GOCACHE") {
            Some(dir) => globals.push(GlobalCache::new(dir.to_path_buf(), "Go build cache")),
            None => {
                globals.push(GlobalCache::new(env.resolve("~/.cache/go-build"), "Go build cache"));
                globals.push(GlobalCache::new(
                    env.resolve("~/Library/Caches/go-build"),
                    "Go build cache",
                ));
            }
        }
        Self { globals }
    }
}

impl EcosystemScanner for GoScanner {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Go
    }

    fn scan(&self, ctx: &ScanContext<'_>) -> Result<Vec<ScanResult>> {
        scan_catalog(self.kind(), &self.globals, &[], ctx)
    }
}
