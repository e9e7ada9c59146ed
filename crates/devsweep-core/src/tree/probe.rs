/// Filesystem access used by the tree cache, behind a trait so tests can
/// count listings.
use crate::cancel::CancelToken;
use crate::error::Result;
use crate::size::{calculate_size_with_cancel, SizeSummary};
use compact_str::CompactString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, sockets, devices: listed but never measured or followed.
    Other,
}

/// One immediate child as seen by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub path: PathBuf,
    pub name: CompactString,
    pub kind: EntryKind,
    /// File length; zero for directories and other entries.
    pub len: u64,
}

pub trait FsProbe: Send + Sync {
    /// List the immediate children of `dir`.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>>;

    /// Recursive totals for one child directory.
    fn measure(&self, dir: &Path, cancel: &CancelToken) -> Result<SizeSummary>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl FsProbe for OsProbe {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(dir)? {
            let Ok(entry) = entry else { continue };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let (kind, len) = if file_type.is_dir() {
                (EntryKind::Dir, 0)
            } else if file_type.is_file() {
                let len = entry.metadata().map(|m| m.len()).unwrap_or(0);
                (EntryKind::File, len)
            } else {
                (EntryKind::Other, 0)
            };
            out.push(ListedEntry {
                path: entry.path(),
                name: CompactString::new(entry.file_name().to_string_lossy()),
                kind,
                len,
            });
        }
        Ok(out)
    }

    fn measure(&self, dir: &Path, cancel: &CancelToken) -> Result<SizeSummary> {
        calculate_size_with_cancel(dir, cancel)
    }
}
