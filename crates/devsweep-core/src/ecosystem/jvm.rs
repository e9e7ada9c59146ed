use super::catalog::{scan_catalog, GlobalCache, ProjectRule};
use super::{EcosystemKind, EcosystemScanner, ScanContext};
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::Environment;

const PROJECT_RULES: &[ProjectRule] = &[
    ProjectRule {
        markers: &[
            "build.gradle",
            "build.gradle.kts",
            "settings.gradle",
            "settings.gradle.kts",
        ],
        artifacts: &["build", ".gradle"],
    },
    ProjectRule {
        markers: &["pom.xml"],
        artifacts: &["target"],
    },
];

/// Gradle and Maven: the shared dependency caches and per-project build output.
pub struct JvmScanner {
    globals: Vec<GlobalCache>,
}

impl JvmScanner {
    pub fn new(env: &Environment) -> Self {
        let gradle_home = env.override_or("GRADLE_USER_HOME", "~/.gradle");
        Self {
            globals: vec![
                GlobalCache::new(gradle_home.join("caches"), "Gradle caches"),
                GlobalCache::new(env.resolve("~/.m2/repository"), "Maven repository"),
            ],
        }
    }
}

impl EcosystemScanner for JvmScanner {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Jvm
    }

    fn scan(&self, ctx: &ScanContext<'_>) -> Result<Vec<ScanResult>> {
        scan_catalog(self.kind(), &self.globals, PROJECT_RULES, ctx)
    }
}
