/// Path resolution: home expansion and the captured process environment.
///
/// Scanners never read `std::env` themselves. The environment is captured
/// once into an [`Environment`] so tests can point every ecosystem at a
/// temporary home directory.
use crate::error::{CoreError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variables that relocate an ecosystem's global caches.
pub const OVERRIDE_VARS: &[&str] = &[
    "CARGO_HOME",
    "npm_config_cache",
    "GOMODCACHE",
    "GOPATH",
    "GOCACHE",
    "PIP_CACHE_DIR",
    "GRADLE_USER_HOME",
    "PUB_CACHE",
];

/// Override variables whose value is itself a cache directory reported as one
/// scan item, as opposed to a tool home that only contains caches.
pub const CACHE_DIR_VARS: &[&str] = &["GOMODCACHE", "GOCACHE", "PIP_CACHE_DIR", "PUB_CACHE"];

/// The user's home directory plus any cache-root overrides that were set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    home: PathBuf,
    overrides: BTreeMap<&'static str, PathBuf>,
}

impl Environment {
    /// Capture the home directory and the override variables from the process.
    pub fn from_process() -> Result<Self> {
        let home = dirs::home_dir().ok_or(CoreError::HomeDirUnavailable)?;
        let mut env = Self::with_home(home);
        for &var in OVERRIDE_VARS {
            if let Some(value) = std::env::var_os(var).filter(|v| !v.is_empty()) {
                let value = PathBuf::from(value);
                env = env.with_override(var, value);
            }
        }
        Ok(env)
    }

    /// An environment with the given home and no overrides.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Set an override. `~` in the value is expanded against this home;
    /// relative values are ignored, as the tools themselves would misbehave.
    pub fn with_override(mut self, var: &'static str, value: impl AsRef<Path>) -> Self {
        let expanded = expand_home(&value.as_ref().to_string_lossy(), &self.home);
        if expanded.is_absolute() {
            self.overrides.insert(var, expanded);
        }
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn override_path(&self, var: &str) -> Option<&Path> {
        self.overrides.get(var).map(PathBuf::as_path)
    }

    /// The override for `var` if set, otherwise `default_pattern` expanded
    /// against the home directory.
    pub fn override_or(&self, var: &str, default_pattern: &str) -> PathBuf {
        match self.override_path(var) {
            Some(path) => path.to_path_buf(),
            None => self.resolve(default_pattern),
        }
    }

    /// Expand a `~`-relative pattern against this home.
    pub fn resolve(&self, pattern: &str) -> PathBuf {
        expand_home(pattern, &self.home)
    }

    /// Every override root that is set, for use as additional safe roots.
    pub fn override_roots(&self) -> impl Iterator<Item = &Path> {
        self.overrides.values().map(PathBuf::as_path)
    }

    /// The set overrides from [`CACHE_DIR_VARS`].
    pub fn cache_dir_overrides(&self) -> impl Iterator<Item = &Path> {
        CACHE_DIR_VARS
            .iter()
            .filter_map(|var| self.override_path(var))
    }
}

/// Expand a leading `~` or `~/` against `home`. Other paths pass through.
pub fn expand_home(pattern: &str, home: &Path) -> PathBuf {
    if pattern == "~" {
        return home.to_path_buf();
    }
    match pattern
        .strip_prefix("~/")
        .or_else(|| pattern.strip_prefix("~\\"))
    {
        Some(rest) => home.join(rest),
        None => PathBuf::from(pattern),
    }
}
