use super::catalog::{scan_catalog, GlobalCache, ProjectRule};
use super::{EcosystemKind, EcosystemScanner, ScanContext};
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::Environment;

const PROJECT_RULES: &[ProjectRule] = &[ProjectRule {
    markers: &["pyproject.toml", "setup.py", "requirements.txt"],
    artifacts: &[".venv", "__pycache__", ".pytest_cache", ".mypy_cache", ".tox"],
}];

/// pip / Poetry / uv caches, plus virtualenvs and tool caches inside projects.
pub struct PythonScanner {
    globals: Vec<GlobalCache>,
}

impl PythonScanner {
    pub fn new(env: &Environment) -> Self {
        let mut globals = match env.override_path("PIP_CACHE_DIR") {
            Some(dir) => vec![GlobalCache::new(dir.to_path_buf(), "pip cache")],
            None => vec![
                GlobalCache::new(env.resolve("~/.cache/pip"), "pip cache"),
                GlobalCache::new(env.resolve("~/Library/Caches/pip"), "pip cache"),
            ],
        };
        globals.push(GlobalCache::new(env.resolve("~/.cache/pypoetry"), "Poetry cache"));
        globals.push(GlobalCache::new(env.resolve("~/.cache/uv"), "uv cache"));
        Self { globals }
    }
}

impl EcosystemScanner for PythonScanner {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Python
    }

    fn scan(&self, ctx: &ScanContext<'_>) -> Result<Vec<ScanResult>> {
        scan_catalog(self.kind(), &self.globals, PROJECT_RULES, ctx)
    }
}
