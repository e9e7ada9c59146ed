/// Project discovery: bounded-depth descent under the search roots.
///
/// The descent uses an explicit work stack, so stack depth does not grow
/// with `max_depth`, and polls the cancel token once per directory.
///
/// Depth levels: a search root is level 1, its children level 2, and so on.
/// Directories at levels `1..=max_depth` are examined; `max_depth == 0`
/// disables discovery.
///
/// Descent is pruned at:
/// - directories on [`SKIP_DIRS`] (VCS internals, trash, dependency trees),
/// - symlinked directories (never followed),
/// - recognised project roots (their artifacts are reported, nothing below),
/// - `max_depth`.
use super::catalog::{measure_candidate, ProjectRule};
use super::{EcosystemKind, ScanContext};
use crate::error::Result;
use crate::model::ScanResult;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory names never descended into.
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".jj",
    ".Trash",
    ".Trashes",
    "$RECYCLE.BIN",
    "node_modules",
];

/// Find projects matching any of `rules` and report their build directories.
pub fn discover_projects(
    kind: EcosystemKind,
    rules: &[ProjectRule],
    ctx: &ScanContext<'_>,
) -> Result<Vec<ScanResult>> {
    let mut results = Vec::new();
    if ctx.max_depth == 0 || rules.is_empty() {
        return Ok(results);
    }

    // Shared across roots so overlapping search roots are walked once.
    let mut visited: HashSet<PathBuf> = HashSet::new();

    for root in ctx.search_roots {
        if !root.is_absolute() {
            warn!("Ignoring relative search root {}", root.display());
            continue;
        }
        if !root.is_dir() {
            continue;
        }

        let mut stack: Vec<(PathBuf, usize)> = vec![(root.clone(), 1)];
        while let Some((dir, level)) = stack.pop() {
            ctx.cancel.check()?;
            if !visited.insert(dir.clone()) {
                continue;
            }

            if let Some(rule_artifacts) = recognise(&dir, rules) {
                report_project(kind, &dir, &rule_artifacts, ctx, &mut results)?;
                continue;
            }
            if level >= ctx.max_depth {
                continue;
            }

            let mut children = match subdirectories(&dir) {
                Ok(children) => children,
                Err(err) => {
                    debug!("Cannot list {}: {err}", dir.display());
                    continue;
                }
            };
            // Pushed in reverse so they pop in name order: discovery order is
            // deterministic for a fixed filesystem.
            children.sort();
            stack.extend(children.into_iter().rev().map(|child| (child, level + 1)));
        }
    }
    Ok(results)
}

/// The artifact names of every rule whose marker is present, deduplicated,
/// or `None` when `dir` is not a project.
fn recognise(dir: &Path, rules: &[ProjectRule]) -> Option<Vec<&'static str>> {
    let mut artifacts: Vec<&'static str> = Vec::new();
    let mut matched = false;
    for rule in rules {
        if rule.markers.iter().any(|marker| dir.join(marker).is_file()) {
            matched = true;
            for &artifact in rule.artifacts {
                if !artifacts.contains(&artifact) {
                    artifacts.push(artifact);
                }
            }
        }
    }
    matched.then_some(artifacts)
}

fn report_project(
    kind: EcosystemKind,
    project: &Path,
    artifacts: &[&'static str],
    ctx: &ScanContext<'_>,
    results: &mut Vec<ScanResult>,
) -> Result<()> {
    let project_name = project
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| project.display().to_string());

    for artifact in artifacts {
        let candidate = project.join(artifact);
        // A symlinked build dir belongs to someone else.
        if fs::symlink_metadata(&candidate).is_ok_and(|m| m.file_type().is_symlink()) {
            continue;
        }
        if let Some(summary) = measure_candidate(&candidate, ctx.cancel)? {
            let name = format!("{project_name}/{artifact}");
            results.push(ScanResult::new(kind, name, candidate, summary));
        }
    }
    Ok(())
}

/// Real (non-symlink) subdirectories of `dir` that are not on the skip-list.
fn subdirectories(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if SKIP_DIRS.iter().any(|skip| name == *skip) {
            continue;
        }
        out.push(entry.path());
    }
    Ok(out)
}
