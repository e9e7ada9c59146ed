/// Safety validator — the last gate before anything is deleted.
///
/// A path is deletable only if it is absolute, has no `..` components,
/// avoids every denylisted system location, lies strictly below a safe root
/// (or is an exact target, such as a relocated cache directory), and still
/// does so after the symlinks in its parent chain are resolved.
/// The cleaner calls this unconditionally; there is no flag to skip it.
use crate::paths::Environment;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// System locations that are never deleted from, whatever the safe roots say.
#[cfg(not(windows))]
const SYSTEM_DENYLIST: &[&str] = &[
    "/bin",
    "/sbin",
    "/boot",
    "/dev",
    "/etc",
    "/lib",
    "/lib64",
    "/proc",
    "/sys",
    "/usr",
    "/System",
    "/Library",
    "/Applications",
    "/private/etc",
];

#[cfg(windows)]
const SYSTEM_DENYLIST: &[&str] = &[
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
    "C:\\ProgramData",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SafetyViolation {
    #[error("refusing {}: path is not absolute", .0.display())]
    NotAbsolute(PathBuf),

    #[error("refusing {}: path contains '..'", .0.display())]
    ParentTraversal(PathBuf),

    #[error("refusing {}: inside protected location {}", .path.display(), .protected.display())]
    Denylisted { path: PathBuf, protected: PathBuf },

    #[error("refusing {}: outside the safe zone", .0.display())]
    OutsideSafeZone(PathBuf),

    #[error("refusing {}: resolves through a symlink to {}", .path.display(), .resolved.display())]
    SymlinkEscape { path: PathBuf, resolved: PathBuf },

    #[error("refusing {}: cannot resolve parent directory ({reason})", .path.display())]
    Unresolvable { path: PathBuf, reason: String },
}

/// Where deletion is allowed (safe roots) and where it never is (denylist).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyPolicy {
    safe_roots: Vec<PathBuf>,
    /// Paths deletable as a whole, though nothing above them is a safe root.
    exact_targets: Vec<PathBuf>,
    denylist: Vec<PathBuf>,
}

impl SafetyPolicy {
    /// The given safe roots plus the built-in system denylist.
    pub fn new(safe_roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            safe_roots: safe_roots.into_iter().collect(),
            exact_targets: Vec::new(),
            denylist: SYSTEM_DENYLIST.iter().map(PathBuf::from).collect(),
        }
    }

    /// Home plus every ecosystem cache root relocated by an override variable.
    ///
    /// Overrides that name a cache directory itself (`GOMODCACHE`, `PUB_CACHE`,
    /// ...) also make that directory an exact target, since the scanner
    /// reports it as one item.
    pub fn for_environment(env: &Environment) -> Self {
        let mut policy = Self::new([env.home().to_path_buf()]);
        // An override at or above home would make home itself deletable.
        let home = env.home();
        for root in env.override_roots().filter(|root| !home.starts_with(root)) {
            policy.add_safe_root(root.to_path_buf());
        }
        for cache in env.cache_dir_overrides() {
            if home.starts_with(cache) {
                warn!("Ignoring cache override {}: it contains home", cache.display());
                continue;
            }
            policy.add_exact_target(cache.to_path_buf());
        }
        policy
    }

    pub fn add_safe_root(&mut self, root: PathBuf) {
        if !self.safe_roots.contains(&root) {
            self.safe_roots.push(root);
        }
    }

    /// Allow deleting `path` itself. Ignored for a path that lies above
    /// another safe root.
    pub fn add_exact_target(&mut self, path: PathBuf) {
        if self
            .safe_roots
            .iter()
            .any(|root| strictly_under(root, &path))
        {
            warn!("Not allowing {} as a clean target: it contains a safe root", path.display());
            return;
        }
        if !self.exact_targets.contains(&path) {
            self.exact_targets.push(path);
        }
    }

    pub fn add_denied(&mut self, path: PathBuf) {
        if !self.denylist.contains(&path) {
            self.denylist.push(path);
        }
    }

    pub fn safe_roots(&self) -> &[PathBuf] {
        &self.safe_roots
    }

    pub fn exact_targets(&self) -> &[PathBuf] {
        &self.exact_targets
    }

    pub fn denylist(&self) -> &[PathBuf] {
        &self.denylist
    }
}

pub struct SafetyValidator {
    policy: SafetyPolicy,
    /// Safe roots with their own symlinks resolved, for the post-resolution check.
    canonical_roots: Vec<PathBuf>,
    canonical_targets: Vec<PathBuf>,
}

impl SafetyValidator {
    pub fn new(policy: SafetyPolicy) -> Self {
        let canonical_roots = policy
            .safe_roots
            .iter()
            .filter(|root| root.is_absolute())
            .map(|root| fs::canonicalize(root).unwrap_or_else(|_| root.clone()))
            .collect();
        let canonical_targets = policy
            .exact_targets
            .iter()
            .filter(|target| target.is_absolute())
            .map(|target| resolve_parent(target).unwrap_or_else(|_| target.clone()))
            .collect();
        Self {
            policy,
            canonical_roots,
            canonical_targets,
        }
    }

    pub fn policy(&self) -> &SafetyPolicy {
        &self.policy
    }

    /// `Ok(())` if `path` may be deleted.
    pub fn validate(&self, path: &Path) -> Result<(), SafetyViolation> {
        let verdict = self.check(path);
        if let Err(violation) = &verdict {
            warn!("{violation}");
        }
        verdict
    }

    fn check(&self, path: &Path) -> Result<(), SafetyViolation> {
        if !path.is_absolute() {
            return Err(SafetyViolation::NotAbsolute(path.to_path_buf()));
        }
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(SafetyViolation::ParentTraversal(path.to_path_buf()));
        }
        self.check_denylist(path, path)?;

        let under_safe_root = self
            .policy
            .safe_roots
            .iter()
            .any(|root| strictly_under(path, root))
            || self.policy.exact_targets.iter().any(|target| target == path);
        if !under_safe_root {
            return Err(SafetyViolation::OutsideSafeZone(path.to_path_buf()));
        }

        let resolved = resolve_parent(path).map_err(|reason| SafetyViolation::Unresolvable {
            path: path.to_path_buf(),
            reason,
        })?;
        if !self
            .canonical_roots
            .iter()
            .any(|root| strictly_under(&resolved, root))
            && !self.canonical_targets.contains(&resolved)
        {
            return Err(SafetyViolation::SymlinkEscape {
                path: path.to_path_buf(),
                resolved,
            });
        }
        self.check_denylist(path, &resolved)
    }

    fn check_denylist(&self, requested: &Path, candidate: &Path) -> Result<(), SafetyViolation> {
        match self
            .policy
            .denylist
            .iter()
            .find(|denied| candidate.starts_with(denied))
        {
            Some(denied) => Err(SafetyViolation::Denylisted {
                path: requested.to_path_buf(),
                protected: denied.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Below `root` and not `root` itself.
fn strictly_under(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}

/// Canonicalise the parent (following its symlinks) and re-attach the final
/// component, which is left unresolved: deleting a symlink removes the link.
fn resolve_parent(path: &Path) -> Result<PathBuf, String> {
    let parent = path.parent().ok_or("path has no parent")?;
    let name = path.file_name().ok_or("path has no final component")?;
    let parent = fs::canonicalize(parent).map_err(|e| e.to_string())?;
    Ok(parent.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn validator_for(root: &Path) -> SafetyValidator {
        SafetyValidator::new(SafetyPolicy::new([root.to_path_buf()]))
    }

    #[test]
    fn accepts_an_item_inside_the_safe_root() {
        let tmp = TempDir::new().unwrap();
        let item = tmp.path().join("cache");
        fs::create_dir_all(&item).unwrap();
        assert_eq!(validator_for(tmp.path()).validate(&item), Ok(()));
    }

    #[test]
    fn rejects_relative_paths() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            validator_for(tmp.path()).validate(Path::new("target")),
            Err(SafetyViolation::NotAbsolute(_))
        ));
    }

    #[test]
    fn rejects_parent_traversal() {
        let tmp = TempDir::new().unwrap();
        let sneaky = tmp.path().join("cache").join("..").join("..");
        assert!(matches!(
            validator_for(tmp.path()).validate(&sneaky),
            Err(SafetyViolation::ParentTraversal(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_system_locations_even_inside_a_safe_root() {
        let validator = SafetyValidator::new(SafetyPolicy::new([PathBuf::from("/")]));
        assert!(matches!(
            validator.validate(Path::new("/usr/bin")),
            Err(SafetyViolation::Denylisted { .. })
        ));
        assert!(matches!(
            validator.validate(Path::new("/etc")),
            Err(SafetyViolation::Denylisted { .. })
        ));
    }

    #[test]
    fn rejects_paths_outside_every_safe_root() {
        let safe = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        assert!(matches!(
            validator_for(safe.path()).validate(&other.path().join("x")),
            Err(SafetyViolation::OutsideSafeZone(_))
        ));
    }

    #[test]
    fn the_safe_root_itself_is_never_deletable() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            validator_for(tmp.path()).validate(tmp.path()),
            Err(SafetyViolation::OutsideSafeZone(_))
        ));
    }

    #[test]
    fn extra_denylist_entries_apply() {
        let tmp = TempDir::new().unwrap();
        let keep = tmp.path().join("keep");
        fs::create_dir_all(keep.join("inner")).unwrap();
        let mut policy = SafetyPolicy::new([tmp.path().to_path_buf()]);
        policy.add_denied(keep.clone());
        let validator = SafetyValidator::new(policy);
        assert!(matches!(
            validator.validate(&keep.join("inner")),
            Err(SafetyViolation::Denylisted { .. })
        ));
    }

    #[test]
    fn missing_parent_is_unresolvable() {
        let tmp = TempDir::new().unwrap();
        let ghost = tmp.path().join("no").join("such").join("dir");
        assert!(matches!(
            validator_for(tmp.path()).validate(&ghost),
            Err(SafetyViolation::Unresolvable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlinked_parent_that_escapes() {
        let safe = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::create_dir_all(outside.path().join("victim")).unwrap();
        std::os::unix::fs::symlink(outside.path(), safe.path().join("link")).unwrap();

        let via_link = safe.path().join("link").join("victim");
        assert!(matches!(
            validator_for(safe.path()).validate(&via_link),
            Err(SafetyViolation::SymlinkEscape { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn a_symlink_item_itself_is_allowed() {
        let safe = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let link = safe.path().join("link");
        std::os::unix::fs::symlink(outside.path(), &link).unwrap();
        assert_eq!(validator_for(safe.path()).validate(&link), Ok(()));
    }

    #[test]
    fn relocated_cache_directory_is_itself_deletable() {
        let home = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let pub_cache = elsewhere.path().join("pub");
        fs::create_dir_all(pub_cache.join("hosted")).unwrap();

        let env = Environment::with_home(home.path()).with_override("PUB_CACHE", &pub_cache);
        let validator = SafetyValidator::new(SafetyPolicy::for_environment(&env));
        assert_eq!(validator.validate(&pub_cache), Ok(()));
        assert_eq!(validator.validate(&pub_cache.join("hosted")), Ok(()));
        assert!(matches!(
            validator.validate(elsewhere.path()),
            Err(SafetyViolation::OutsideSafeZone(_))
        ));
    }

    #[test]
    fn tool_home_override_stays_a_root_only() {
        let home = TempDir::new().unwrap();
        let cargo = TempDir::new().unwrap();
        let env = Environment::with_home(home.path()).with_override("CARGO_HOME", cargo.path());
        let validator = SafetyValidator::new(SafetyPolicy::for_environment(&env));
        assert!(matches!(
            validator.validate(cargo.path()),
            Err(SafetyViolation::OutsideSafeZone(_))
        ));
    }

    #[test]
    fn cache_override_at_or_above_home_is_ignored() {
        let home = TempDir::new().unwrap();
        let parent = home.path().parent().unwrap();
        let env = Environment::with_home(home.path())
            .with_override("PUB_CACHE", home.path())
            .with_override("GOCACHE", parent);
        let policy = SafetyPolicy::for_environment(&env);
        assert!(policy.exact_targets().is_empty());
        assert_eq!(policy.safe_roots(), &[home.path().to_path_buf()]);

        let validator = SafetyValidator::new(policy);
        assert!(validator.validate(home.path()).is_err());
        assert!(validator.validate(&parent.join("elsewhere")).is_err());
    }

    #[test]
    fn exact_target_above_a_safe_root_is_refused() {
        let tmp = TempDir::new().unwrap();
        let mut policy = SafetyPolicy::new([tmp.path().join("home")]);
        policy.add_exact_target(tmp.path().to_path_buf());
        assert!(policy.exact_targets().is_empty());
    }

    #[test]
    fn environment_policy_includes_override_roots() {
        let env = Environment::with_home("/home/dev").with_override("CARGO_HOME", "/data/cargo");
        let policy = SafetyPolicy::for_environment(&env);
        assert_eq!(
            policy.safe_roots(),
            &[PathBuf::from("/home/dev"), PathBuf::from("/data/cargo")]
        );
    }
}
