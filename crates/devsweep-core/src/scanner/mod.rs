/// Scan orchestrator — fans the enabled ecosystem scanners out over one
/// thread each, joins them, and merges the results.
///
/// An orchestrator is an ordinary value owned by the caller; nothing here is
/// process-global, so tests can run several side by side.
///
/// # Concurrency
///
/// One mutex guards the only mutable state: the "scan in progress" flag and
/// the last completed snapshot. It is held for state transitions only, never
/// across the filesystem walk. A second `scan_all` while one is running fails
/// fast with [`CoreError::ScanInProgress`].
///
/// # Partial failure
///
/// A scanner that errors or panics is logged and reported through the event
/// sink; the results of every other scanner are still returned.
pub mod snapshot;

pub use snapshot::{merge_results, ScanSnapshot};

use crate::cancel::CancelToken;
use crate::ecosystem::{default_scanners, EcosystemKind, EcosystemScanner, ScanContext};
use crate::error::{CoreError, Result};
use crate::events::{CoreEvent, EventSink};
use crate::model::{ScanOptions, ScanResult};
use crate::paths::Environment;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Default)]
struct OrchestratorState {
    scanning: bool,
    last: Option<Arc<ScanSnapshot>>,
}

pub struct ScanOrchestrator {
    scanners: Vec<Box<dyn EcosystemScanner>>,
    state: Mutex<OrchestratorState>,
    events: EventSink,
}

/// Clears the in-progress flag when the scan ends, including by panic.
struct ScanGuard<'a> {
    state: &'a Mutex<OrchestratorState>,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().scanning = false;
    }
}

impl ScanOrchestrator {
    /// Orchestrate the given scanners. Launch order (and therefore the
    /// tie-break for equal sizes) follows the vector order.
    pub fn new(scanners: Vec<Box<dyn EcosystemScanner>>) -> Self {
        Self {
            scanners,
            state: Mutex::new(OrchestratorState::default()),
            events: EventSink::disabled(),
        }
    }

    /// The built-in scanner for every ecosystem.
    pub fn with_default_scanners(env: &Environment) -> Self {
        Self::new(default_scanners(env))
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn is_scanning(&self) -> bool {
        self.state.lock().scanning
    }

    /// The last successfully completed scan, if any.
    pub fn last_snapshot(&self) -> Option<Arc<ScanSnapshot>> {
        self.state.lock().last.clone()
    }

    /// Scan every enabled ecosystem and return the merged results, largest first.
    pub fn scan_all(&self, options: &ScanOptions) -> Result<Vec<ScanResult>> {
        self.scan_all_with_cancel(options, &CancelToken::new())
    }

    /// [`scan_all`](Self::scan_all) with cooperative cancellation.
    pub fn scan_all_with_cancel(
        &self,
        options: &ScanOptions,
        cancel: &CancelToken,
    ) -> Result<Vec<ScanResult>> {
        let _guard = self.begin_scan()?;
        let start = Instant::now();

        let selected: Vec<&dyn EcosystemScanner> = self
            .scanners
            .iter()
            .map(Box::as_ref)
            .filter(|scanner| options.is_enabled(scanner.kind()))
            .collect();
        let kinds: Vec<EcosystemKind> = selected.iter().map(|s| s.kind()).collect();

        info!(
            "Starting scan: {} ecosystems, max depth {}, {} search roots",
            kinds.len(),
            options.max_depth,
            options.search_roots.len()
        );
        self.events.emit(CoreEvent::ScanStarted {
            kinds: kinds.clone(),
        });

        let ctx = ScanContext {
            max_depth: options.max_depth,
            search_roots: &options.search_roots,
            cancel,
        };
        let outcomes = run_scanners(&selected, &ctx);

        if cancel.is_cancelled() {
            info!("Scan cancelled after {:?}", start.elapsed());
            self.events.emit(CoreEvent::ScanError {
                kind: None,
                message: CoreError::Cancelled.to_string(),
            });
            return Err(CoreError::Cancelled);
        }

        let mut batches = Vec::with_capacity(outcomes.len());
        for (kind, outcome) in kinds.iter().copied().zip(outcomes) {
            match outcome {
                Ok(batch) => batches.push(batch),
                Err(err) => {
                    warn!("{kind} scanner failed: {err}");
                    self.events.emit(CoreEvent::ScanError {
                        kind: Some(kind),
                        message: err.to_string(),
                    });
                }
            }
        }

        let results = merge_results(batches);
        let duration = start.elapsed();
        info!("Scan complete: {} results in {duration:?}", results.len());

        let snapshot = Arc::new(ScanSnapshot::new(results.clone(), duration));
        self.state.lock().last = Some(snapshot);
        self.events.emit(CoreEvent::ScanCompleted {
            results: results.clone(),
            duration,
        });
        Ok(results)
    }

    fn begin_scan(&self) -> Result<ScanGuard<'_>> {
        let mut state = self.state.lock();
        if state.scanning {
            drop(state);
            self.events.emit(CoreEvent::ScanError {
                kind: None,
                message: CoreError::ScanInProgress.to_string(),
            });
            return Err(CoreError::ScanInProgress);
        }
        state.scanning = true;
        Ok(ScanGuard { state: &self.state })
    }
}

/// One named thread per scanner, joined in launch order. A panic becomes
/// [`CoreError::ScannerPanicked`] for that scanner only.
fn run_scanners(
    scanners: &[&dyn EcosystemScanner],
    ctx: &ScanContext<'_>,
) -> Vec<Result<Vec<ScanResult>>> {
    thread::scope(|scope| {
        let handles: Vec<_> = scanners
            .iter()
            .map(|&scanner| {
                let kind = scanner.kind();
                let handle = thread::Builder::new()
                    .name(format!("devsweep-scan-{}", kind.id()))
                    .spawn_scoped(scope, move || scanner.scan(ctx))
                    .expect("failed to spawn scanner thread");
                (kind, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(kind, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(CoreError::ScannerPanicked(kind)))
            })
            .collect()
    })
}
