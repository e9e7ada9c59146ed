/// Ecosystem scanners — one strategy per tool ecosystem.
///
/// Each scanner combines up to two discovery strategies:
/// - **Global caches:** a fixed table of well-known cache directories
///   (see [`catalog`]).
/// - **Project discovery:** bounded-depth descent under the search roots,
///   recognising projects by a marker file (see [`discovery`]).
pub mod catalog;
pub mod discovery;
pub mod kind;

mod dart;
mod go;
mod jvm;
mod node;
mod python;
mod rust;
mod xcode;

pub use dart::DartScanner;
pub use go::GoScanner;
pub use jvm::JvmScanner;
pub use kind::{EcosystemKind, UnknownEcosystem};
pub use node::NodeScanner;
pub use python::PythonScanner;
pub use rust::RustScanner;
pub use xcode::XcodeScanner;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::Environment;
use std::path::PathBuf;

/// Per-scan inputs shared by every scanner running in that scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub max_depth: usize,
    pub search_roots: &'a [PathBuf],
    pub cancel: &'a CancelToken,
}

/// The trait every ecosystem scanner implements.
///
/// Scanners run on their own thread during a scan, hence `Send + Sync`.
/// Missing directories are not errors; a scanner only fails when the scan
/// cannot continue at all (cancellation, typically).
pub trait EcosystemScanner: Send + Sync {
    fn kind(&self) -> EcosystemKind;

    /// Discover every cleanable unit for this ecosystem.
    fn scan(&self, ctx: &ScanContext<'_>) -> Result<Vec<ScanResult>>;
}

/// The built-in scanner for `kind`.
pub fn scanner_for(kind: EcosystemKind, env: &Environment) -> Box<dyn EcosystemScanner> {
    match kind {
        EcosystemKind::Rust => Box::new(RustScanner::new(env)),
        EcosystemKind::Node => Box::new(NodeScanner::new(env)),
        EcosystemKind::Go => Box::new(GoScanner::new(env)),
        EcosystemKind::Python => Box::new(PythonScanner::new(env)),
        EcosystemKind::Jvm => Box::new(JvmScanner::new(env)),
        EcosystemKind::Dart => Box::new(DartScanner::new(env)),
        EcosystemKind::Xcode => Box::new(XcodeScanner::new(env)),
    }
}

/// One built-in scanner per ecosystem, in [`EcosystemKind::ALL`] order.
pub fn default_scanners(env: &Environment) -> Vec<Box<dyn EcosystemScanner>> {
    EcosystemKind::ALL
        .into_iter()
        .map(|kind| scanner_for(kind, env))
        .collect()
}
