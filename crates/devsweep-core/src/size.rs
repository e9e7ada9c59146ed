/// Size calculator: recursive byte and file totals under a path.
///
/// Only regular files count. Directories contribute nothing themselves and
/// symlinks are never followed, so a link pointing outside the subtree (or
/// back up into it) can neither leak scope nor create a cycle.
///
/// Failure policy: an unreadable entry somewhere below the root is skipped
/// and the walk continues. Only the root itself can fail the call.
use crate::cancel::CancelToken;
use crate::error::{CoreError, Result};
use serde::Serialize;
use std::fs;
use std::ops::AddAssign;
use std::path::Path;
use tracing::trace;

/// How often (in entries) the walk polls the cancel token.
const CANCEL_CHECK_INTERVAL: u64 = 256;

/// Byte and file totals for one subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeSummary {
    pub size_bytes: u64,
    pub file_count: u64,
}

impl SizeSummary {
    pub fn single_file(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            file_count: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size_bytes == 0
    }
}

impl AddAssign for SizeSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.size_bytes += rhs.size_bytes;
        self.file_count += rhs.file_count;
    }
}

/// Sum regular file sizes and counts under `path`.
pub fn calculate_size(path: &Path) -> Result<SizeSummary> {
    calculate_size_with_cancel(path, &CancelToken::new())
}

/// [`calculate_size`] with cooperative cancellation.
pub fn calculate_size_with_cancel(path: &Path, cancel: &CancelToken) -> Result<SizeSummary> {
    let root_meta = fs::symlink_metadata(path).map_err(|e| CoreError::root_access(path, e))?;

    if root_meta.is_file() {
        return Ok(SizeSummary::single_file(root_meta.len()));
    }
    if !root_meta.is_dir() {
        // A symlink or special file at the root: nothing regular to count.
        return Ok(SizeSummary::default());
    }
    // Surface an unreadable root directory as an error instead of an empty walk.
    fs::read_dir(path).map_err(|e| CoreError::root_access(path, e))?;

    // Serial walk: callers already fan out one thread per ecosystem or one
    // rayon task per tree child.
    let walker = jwalk::WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    let mut summary = SizeSummary::default();
    let mut visited: u64 = 0;
    let mut skipped: u64 = 0;

    for entry_result in walker {
        visited += 1;
        if visited.is_multiple_of(CANCEL_CHECK_INTERVAL) {
            cancel.check()?;
        }

        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                skipped += 1;
                trace!("Skipping unreadable entry under {}: {err}", path.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        // The walk does not follow links, so this is the entry's own lstat.
        match entry.metadata() {
            Ok(meta) => summary += SizeSummary::single_file(meta.len()),
            Err(err) => {
                skipped += 1;
                trace!("Cannot stat {}: {err}", entry.path().display());
            }
        }
    }
    cancel.check()?;

    if skipped > 0 {
        trace!("{skipped} entries skipped under {}", path.display());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, n: usize) {
        let mut f = File::create(path).unwrap();
        f.write_all(&vec![7u8; n]).unwrap();
    }

    #[test]
    fn sums_every_regular_file_in_a_nested_tree() {
        let tmp = TempDir::new().unwrap();
        let deep = tmp.path().join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir_all(tmp.path().join("empty")).unwrap();
        write_bytes(&tmp.path().join("top.bin"), 10);
        write_bytes(&tmp.path().join("a").join("mid.bin"), 200);
        write_bytes(&deep.join("leaf.bin"), 3_000);
        write_bytes(&deep.join(".hidden"), 4);

        let summary = calculate_size(tmp.path()).unwrap();
        assert_eq!(summary.size_bytes, 3_214);
        assert_eq!(summary.file_count, 4);
    }

    #[test]
    fn file_sizes_come_from_each_entry_length() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("registry").join("cache");
        fs::create_dir_all(&nested).unwrap();
        File::create(nested.join("crate.tar"))
            .unwrap()
            .set_len(20 * 1024 * 1024)
            .unwrap();
        write_bytes(&tmp.path().join("index"), 7);

        let summary = calculate_size(tmp.path()).unwrap();
        assert_eq!(summary.size_bytes, 20 * 1024 * 1024 + 7);
        assert_eq!(summary.file_count, 2);
    }

    #[test]
    fn empty_directory_is_zero() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(calculate_size(tmp.path()).unwrap(), SizeSummary::default());
    }

    #[test]
    fn single_file_root_counts_itself() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.bin");
        write_bytes(&file, 42);
        assert_eq!(calculate_size(&file).unwrap(), SizeSummary::single_file(42));
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = calculate_size(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CoreError::RootAccess { .. }));
    }

    #[test]
    fn cancelled_token_aborts_the_walk() {
        let tmp = TempDir::new().unwrap();
        for i in 0..600 {
            write_bytes(&tmp.path().join(format!("f{i}")), 1);
        }
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = calculate_size_with_cancel(tmp.path(), &cancel).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let tmp = TempDir::new().unwrap();
        let outside = tmp.path().join("outside");
        let walked = tmp.path().join("walked");
        fs::create_dir_all(&outside).unwrap();
        fs::create_dir_all(&walked).unwrap();
        write_bytes(&outside.join("big.bin"), 5_000);
        write_bytes(&walked.join("small.bin"), 5);
        std::os::unix::fs::symlink(&outside, walked.join("link-dir")).unwrap();
        std::os::unix::fs::symlink(outside.join("big.bin"), walked.join("link-file")).unwrap();
        // A loop back to the walked root must not hang the walk.
        std::os::unix::fs::symlink(&walked, walked.join("loop")).unwrap();

        let summary = calculate_size(&walked).unwrap();
        assert_eq!(summary, SizeSummary::single_file(5));
    }
}
