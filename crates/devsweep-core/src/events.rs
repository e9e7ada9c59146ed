/// Lifecycle notifications — lightweight messages sent from the core to
/// whatever presentation layer is listening, via a crossbeam channel.
///
/// Delivery is best-effort: the core uses `try_send`, so a full or
/// disconnected channel never blocks a scan or a clean.
use crate::ecosystem::EcosystemKind;
use crate::model::ScanResult;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::time::Duration;
use tracing::debug;

/// Maximum number of notifications that may queue up before new ones are dropped.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum CoreEvent {
    /// A scan began over the listed ecosystems.
    ScanStarted { kinds: Vec<EcosystemKind> },
    /// A scan finished. `results` is the sorted, merged result set.
    ScanCompleted {
        results: Vec<ScanResult>,
        duration: Duration,
    },
    /// A scan, or one ecosystem within it, failed.
    /// `kind` is `None` when the whole scan was refused or cancelled.
    ScanError {
        kind: Option<EcosystemKind>,
        message: String,
    },
    CleanStarted { item_count: usize },
    CleanCompleted {
        freed_bytes: u64,
        success_count: usize,
        failure_count: usize,
    },
    CleanError { message: String },
}

/// Sending half of the notification channel. The default sink discards
/// everything.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<CoreEvent>>,
}

impl EventSink {
    /// A sink with nobody listening.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(tx: Sender<CoreEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn emit(&self, event: CoreEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(dropped)) => {
                debug!("Event channel full, dropping {dropped:?}");
            }
        }
    }
}

/// Create a bounded notification channel.
pub fn channel() -> (EventSink, Receiver<CoreEvent>) {
    let (tx, rx) = crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY);
    (EventSink::new(tx), rx)
}
