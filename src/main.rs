//! DevSweep: finds developer caches and build artifacts.
//!
//! Thin binary entry point. All logic lives in the `devsweep-core` crate.
//! The binary only reports; deletion is left to front ends that collect an
//! explicit selection from the user.
//!
//! Usage: `devsweep [CONFIG.json] [REPORT.csv|REPORT.json]`

use anyhow::Context;
use devsweep_core::config::Config;
use devsweep_core::events::{self, CoreEvent};
use devsweep_core::model::{format_count, format_size};
use devsweep_core::paths::Environment;
use devsweep_core::report;
use devsweep_core::scanner::ScanOrchestrator;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("DevSweep starting");

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let config = match args.next() {
        Some(path) => Config::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let report_path = args.next();

    let env = Environment::from_process().context("locating home directory")?;
    let options = config.scan.resolved(&env);

    let (sink, rx) = events::channel();
    let orchestrator = ScanOrchestrator::with_default_scanners(&env).with_events(sink);
    let results = orchestrator.scan_all(&options).context("scan failed")?;

    for event in rx.try_iter() {
        if let CoreEvent::ScanError { kind, message } = event {
            match kind {
                Some(kind) => eprintln!("warning: {kind}: {message}"),
                None => eprintln!("warning: {message}"),
            }
        }
    }

    for result in &results {
        println!(
            "{:<8} {:>10} {:>9} files  {}",
            result.kind.label(),
            format_size(result.size_bytes),
            format_count(result.file_count),
            result.path.display()
        );
    }
    let total: u64 = results.iter().map(|r| r.size_bytes).sum();
    println!("{} items, {} reclaimable", results.len(), format_size(total));

    if let Some(path) = report_path {
        report::export(&path, &results)
            .with_context(|| format!("writing report {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}
