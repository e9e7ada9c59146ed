/// Configuration: scan options, extra safety roots, and tree-cache limits.
///
/// Loaded from a JSON file. Every field is optional; anything missing takes
/// its default, and a missing file means "all defaults".
use crate::error::{CoreError, Result};
use crate::model::ScanOptions;
use crate::paths::{expand_home, Environment};
use crate::safety::SafetyPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default navigation depth before the tree cache asks for confirmation.
pub const DEFAULT_TREE_MAX_DEPTH: usize = 32;

/// Default number of expanded nodes kept in the tree cache.
pub const DEFAULT_TREE_CACHE_CAPACITY: usize = 4_096;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanOptions,
    pub safety: SafetyConfig,
    pub tree: TreeConfig,
}

/// Additions to the built-in safe zone and denylist. The built-ins can only
/// be extended here, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub extra_safe_roots: Vec<PathBuf>,
    pub extra_denylist: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub max_depth: usize,
    /// Maximum cached nodes; 0 disables eviction.
    pub cache_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_TREE_MAX_DEPTH,
            cache_capacity: DEFAULT_TREE_CACHE_CAPACITY,
        }
    }
}

impl Config {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CoreError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The safe zone: home, every ecosystem override root, plus the extras.
    pub fn safety_policy(&self, env: &Environment) -> SafetyPolicy {
        let mut policy = SafetyPolicy::for_environment(env);
        for root in &self.safety.extra_safe_roots {
            policy.add_safe_root(expand_home(&root.to_string_lossy(), env.home()));
        }
        for denied in &self.safety.extra_denylist {
            policy.add_denied(expand_home(&denied.to_string_lossy(), env.home()));
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(&tmp.path().join("devsweep.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devsweep.json");
        fs::write(
            &path,
            r#"{ "scan": { "go": false, "search_roots": ["~/src"] }, "tree": { "max_depth": 5 } }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.scan.go);
        assert!(config.scan.rust);
        assert_eq!(config.scan.search_roots, vec![PathBuf::from("~/src")]);
        assert_eq!(config.tree.max_depth, 5);
        assert_eq!(config.tree.cache_capacity, DEFAULT_TREE_CACHE_CAPACITY);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devsweep.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(CoreError::ConfigParse { .. })
        ));
    }

    #[test]
    fn safety_policy_adds_expanded_extras() {
        let env = Environment::with_home("/home/dev");
        let config = Config {
            safety: SafetyConfig {
                extra_safe_roots: vec![PathBuf::from("/scratch")],
                extra_denylist: vec![PathBuf::from("~/keep")],
            },
            ..Config::default()
        };
        let policy = config.safety_policy(&env);
        assert!(policy.safe_roots().contains(&PathBuf::from("/scratch")));
        assert!(policy.denylist().contains(&PathBuf::from("/home/dev/keep")));
    }
}
