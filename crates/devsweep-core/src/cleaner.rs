/// Deletion executor — removes previously scanned items one at a time.
///
/// Every item goes through the [`SafetyValidator`] first, unconditionally.
/// Items are independent: a rejection or a failed removal is recorded as a
/// failed [`CleanResult`] and the batch moves on. The returned list always
/// has one entry per input item, in input order. Only batch-level problems
/// (empty input, another clean already running) fail the call itself.
use crate::cancel::CancelToken;
use crate::error::{CoreError, Result};
use crate::events::{CoreEvent, EventSink};
use crate::model::{CleanResult, CleanSummary, ScanResult};
use crate::safety::SafetyValidator;
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct Cleaner {
    validator: SafetyValidator,
    busy: Mutex<bool>,
    events: EventSink,
}

/// Clears the busy flag when the clean ends, including by panic.
struct CleanGuard<'a> {
    busy: &'a Mutex<bool>,
}

impl Drop for CleanGuard<'_> {
    fn drop(&mut self) {
        *self.busy.lock() = false;
    }
}

impl Cleaner {
    pub fn new(validator: SafetyValidator) -> Self {
        Self {
            validator,
            busy: Mutex::new(false),
            events: EventSink::disabled(),
        }
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn is_cleaning(&self) -> bool {
        *self.busy.lock()
    }

    /// Delete every item, returning one outcome per item in input order.
    pub fn clean(&self, items: &[ScanResult]) -> Result<Vec<CleanResult>> {
        self.clean_with_cancel(items, &CancelToken::new())
    }

    /// [`clean`](Self::clean) with cooperative cancellation. Items not yet
    /// reached when the token fires are reported as failed with "operation cancelled".
    pub fn clean_with_cancel(
        &self,
        items: &[ScanResult],
        cancel: &CancelToken,
    ) -> Result<Vec<CleanResult>> {
        if items.is_empty() {
            return Err(self.refuse(CoreError::NothingToClean));
        }
        let _guard = self.begin_clean()?;

        let start = Instant::now();
        info!("Cleaning {} items", items.len());
        self.events.emit(CoreEvent::CleanStarted {
            item_count: items.len(),
        });

        let results: Vec<CleanResult> = items
            .iter()
            .map(|item| {
                if cancel.is_cancelled() {
                    CleanResult::failed(item.path.clone(), CoreError::Cancelled.to_string())
                } else {
                    self.clean_one(item)
                }
            })
            .collect();

        let summary = CleanSummary::from_results(&results);
        info!(
            "Clean complete: {} of {} items removed, {} bytes freed in {:?}",
            summary.success_count,
            items.len(),
            summary.freed_bytes,
            start.elapsed()
        );
        self.events.emit(CoreEvent::CleanCompleted {
            freed_bytes: summary.freed_bytes,
            success_count: summary.success_count,
            failure_count: summary.failure_count,
        });
        Ok(results)
    }

    fn clean_one(&self, item: &ScanResult) -> CleanResult {
        if let Err(violation) = self.validator.validate(&item.path) {
            return CleanResult::failed(item.path.clone(), violation.to_string());
        }
        match remove_path(&item.path) {
            Ok(()) => CleanResult::succeeded(item.path.clone(), item.size_bytes),
            Err(err) => {
                warn!("Failed to remove {}: {err}", item.path.display());
                CleanResult::failed(item.path.clone(), err.to_string())
            }
        }
    }

    fn begin_clean(&self) -> Result<CleanGuard<'_>> {
        let mut busy = self.busy.lock();
        if *busy {
            drop(busy);
            return Err(self.refuse(CoreError::CleanInProgress));
        }
        *busy = true;
        Ok(CleanGuard { busy: &self.busy })
    }

    fn refuse(&self, err: CoreError) -> CoreError {
        self.events.emit(CoreEvent::CleanError {
            message: err.to_string(),
        });
        err
    }
}

/// Remove a directory tree, or a single file / symlink (never its target).
fn remove_path(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        grant_owner_write(path);
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Make every directory under `root` writable by its owner, so entries inside
/// can be unlinked. The Go module cache, for one, is written read-only.
/// Links are not followed; failures are left for `remove_dir_all` to report.
fn grant_owner_write(root: &Path) {
    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    for entry in walker.into_iter().flatten() {
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();
        let Ok(meta) = fs::symlink_metadata(&dir) else {
            continue;
        };
        let mut perms = meta.permissions();
        if !allow_owner_write(&mut perms) {
            continue;
        }
        if let Err(err) = fs::set_permissions(&dir, perms) {
            debug!("Cannot make {} writable: {err}", dir.display());
        }
    }
}

/// `true` if `perms` changed.
#[cfg(unix)]
fn allow_owner_write(perms: &mut fs::Permissions) -> bool {
    use std::os::unix::fs::PermissionsExt;
    let mode = perms.mode();
    if mode & 0o200 != 0 {
        return false;
    }
    perms.set_mode(mode | 0o200);
    true
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn allow_owner_write(perms: &mut fs::Permissions) -> bool {
    if !perms.readonly() {
        return false;
    }
    perms.set_readonly(false);
    true
}
