/// Caller-specified scan configuration.
///
/// One flag per ecosystem, a depth bound for project discovery, and the
/// ordered list of roots under which projects are searched. A value with
/// every flag off is valid and yields an empty scan.
use crate::ecosystem::EcosystemKind;
use crate::paths::{expand_home, Environment};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project discovery depth used when the caller does not pick one.
pub const DEFAULT_MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub rust: bool,
    pub node: bool,
    pub go: bool,
    pub python: bool,
    pub jvm: bool,
    pub dart: bool,
    pub xcode: bool,
    /// Levels of directories examined below each search root; 0 disables
    /// project discovery entirely.
    pub max_depth: usize,
    pub search_roots: Vec<PathBuf>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            rust: true,
            node: true,
            go: true,
            python: true,
            jvm: true,
            dart: true,
            xcode: true,
            max_depth: DEFAULT_MAX_DEPTH,
            search_roots: Vec::new(),
        }
    }
}

impl ScanOptions {
    /// Every ecosystem disabled, project discovery off.
    pub fn none() -> Self {
        Self {
            rust: false,
            node: false,
            go: false,
            python: false,
            jvm: false,
            dart: false,
            xcode: false,
            max_depth: 0,
            search_roots: Vec::new(),
        }
    }

    pub fn is_enabled(&self, kind: EcosystemKind) -> bool {
        match kind {
            EcosystemKind::Rust => self.rust,
            EcosystemKind::Node => self.node,
            EcosystemKind::Go => self.go,
            EcosystemKind::Python => self.python,
            EcosystemKind::Jvm => self.jvm,
            EcosystemKind::Dart => self.dart,
            EcosystemKind::Xcode => self.xcode,
        }
    }

    pub fn set_enabled(&mut self, kind: EcosystemKind, enabled: bool) {
        let flag = match kind {
            EcosystemKind::Rust => &mut self.rust,
            EcosystemKind::Node => &mut self.node,
            EcosystemKind::Go => &mut self.go,
            EcosystemKind::Python => &mut self.python,
            EcosystemKind::Jvm => &mut self.jvm,
            EcosystemKind::Dart => &mut self.dart,
            EcosystemKind::Xcode => &mut self.xcode,
        };
        *flag = enabled;
    }

    /// Builder form of [`set_enabled`](Self::set_enabled).
    pub fn with(mut self, kind: EcosystemKind, enabled: bool) -> Self {
        self.set_enabled(kind, enabled);
        self
    }

    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn enabled_kinds(&self) -> Vec<EcosystemKind> {
        EcosystemKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }

    /// Expand `~` in every search root; an empty list becomes the home directory.
    ///
    /// Used when options come from a config file, where an empty list means
    /// "search my home".
    pub fn resolved(&self, env: &Environment) -> Self {
        let mut resolved = self.clone();
        resolved.search_roots = if self.search_roots.is_empty() {
            vec![env.home().to_path_buf()]
        } else {
            self.search_roots
                .iter()
                .map(|root| expand_home(&root.to_string_lossy(), env.home()))
                .collect()
        };
        resolved
    }
}
