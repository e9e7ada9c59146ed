/// Data model shared between the scanners, the cleaner and the UI layer.
pub mod clean_result;
pub mod format;
pub mod options;
pub mod scan_result;

pub use clean_result::{CleanResult, CleanSummary};
pub use format::{format_count, format_size};
pub use options::ScanOptions;
pub use scan_result::ScanResult;
