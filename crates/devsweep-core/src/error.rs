/// Error taxonomy shared by every component of the core.
///
/// Per-entry I/O failures inside a walk never surface here; they are skipped
/// where they happen. Only whole-operation problems become a `CoreError`.
use crate::ecosystem::EcosystemKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// `scan_all` was called while another scan on the same orchestrator runs.
    #[error("a scan is already in progress")]
    ScanInProgress,

    /// `clean` was called while another clean on the same cleaner runs.
    #[error("a clean is already in progress")]
    CleanInProgress,

    /// `clean` was handed an empty item list.
    #[error("nothing to clean: the item list is empty")]
    NothingToClean,

    /// The caller's [`CancelToken`](crate::CancelToken) fired.
    #[error("operation cancelled")]
    Cancelled,

    #[error("path is not absolute: {}", .0.display())]
    NotAbsolute(PathBuf),

    /// The top-level path of a walk or listing could not be accessed.
    #[error("cannot access {}: {}", .path.display(), .source)]
    RootAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not determine the home directory")]
    HomeDirUnavailable,

    #[error("{0} scanner panicked")]
    ScannerPanicked(EcosystemKind),

    #[error("cannot read config {}: {}", .path.display(), .source)]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {}", .path.display(), .source)]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("report export failed: {0}")]
    ReportIo(#[from] io::Error),

    #[error("report export failed: {0}")]
    ReportCsv(#[from] csv::Error),

    #[error("report export failed: {0}")]
    ReportJson(#[from] serde_json::Error),
}

impl CoreError {
    /// Wrap an I/O error on the top-level path of an operation.
    pub fn root_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::RootAccess {
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
