/// devsweep core — scanning, lazy tree navigation, and safe deletion.
///
/// This crate contains all business logic with zero UI dependencies.
/// Presentation layers (TUI, GUI, CLI) drive it through four entry points:
/// [`scanner::ScanOrchestrator::scan_all`], [`tree::TreeCache::get_node`],
/// [`tree::TreeCache::clear_cache`] and [`cleaner::Cleaner::clean`].
///
/// # Modules
///
/// - [`model`] — scan results, scan options, clean outcomes, size formatting.
/// - [`paths`] — home expansion and the captured process environment.
/// - [`ecosystem`] — one scanner per tool ecosystem plus project discovery.
/// - [`size`] — recursive size / file-count calculation.
/// - [`scanner`] — concurrent fan-out over the enabled ecosystems.
/// - [`tree`] — on-demand, memoised directory expansion.
/// - [`safety`] — the deletion gate.
/// - [`cleaner`] — per-item deletion with individual outcomes.
/// - [`events`] — one-way lifecycle notifications for the UI layer.
pub mod cancel;
pub mod cleaner;
pub mod config;
pub mod ecosystem;
pub mod error;
pub mod events;
pub mod model;
pub mod paths;
pub mod report;
pub mod safety;
pub mod scanner;
pub mod size;
pub mod tree;

pub use cancel::CancelToken;
pub use error::{CoreError, Result};
