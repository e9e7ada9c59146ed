/// Static cache tables and the shared scan routine every ecosystem uses.
use super::discovery::discover_projects;
use super::{EcosystemKind, ScanContext};
use crate::cancel::CancelToken;
use crate::error::{CoreError, Result};
use crate::model::ScanResult;
use crate::size::{calculate_size_with_cancel, SizeSummary};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// A well-known global cache directory, already resolved against the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalCache {
    pub path: PathBuf,
    pub name: &'static str,
}

impl GlobalCache {
    pub fn new(path: PathBuf, name: &'static str) -> Self {
        Self { path, name }
    }
}

/// How an ecosystem recognises a project and which subdirectories it may clean.
///
/// A directory is a project when any of `markers` exists as a file in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectRule {
    pub markers: &'static [&'static str],
    pub artifacts: &'static [&'static str],
}

/// Run both discovery strategies for one ecosystem: global caches first,
/// then projects under the search roots.
pub fn scan_catalog(
    kind: EcosystemKind,
    globals: &[GlobalCache],
    rules: &[ProjectRule],
    ctx: &ScanContext<'_>,
) -> Result<Vec<ScanResult>> {
    let start = Instant::now();
    let mut results = scan_globals(kind, globals, ctx.cancel)?;
    let global_count = results.len();
    results.extend(discover_projects(kind, rules, ctx)?);
    debug!(
        "{kind}: {global_count} global caches, {} project artifacts in {:?}",
        results.len() - global_count,
        start.elapsed()
    );
    Ok(results)
}

/// Every existing, non-empty global cache becomes one result.
pub fn scan_globals(
    kind: EcosystemKind,
    globals: &[GlobalCache],
    cancel: &CancelToken,
) -> Result<Vec<ScanResult>> {
    let mut results = Vec::new();
    for cache in globals {
        cancel.check()?;
        if let Some(summary) = measure_candidate(&cache.path, cancel)? {
            results.push(ScanResult::new(kind, cache.name, cache.path.clone(), summary));
        }
    }
    Ok(results)
}

/// Size of a candidate directory, or `None` when it is missing, unreadable,
/// or empty. Only cancellation is propagated.
pub(crate) fn measure_candidate(path: &Path, cancel: &CancelToken) -> Result<Option<SizeSummary>> {
    if !path.is_absolute() || !path.is_dir() {
        return Ok(None);
    }
    match calculate_size_with_cancel(path, cancel) {
        Ok(summary) if summary.is_empty() => Ok(None),
        Ok(summary) => Ok(Some(summary)),
        Err(CoreError::Cancelled) => Err(CoreError::Cancelled),
        Err(err) => {
            debug!("Skipping {}: {err}", path.display());
            Ok(None)
        }
    }
}
