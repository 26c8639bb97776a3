//! Cycle coordinator.
//!
//! Owns the two long-lived tasks of the relay:
//!
//! - the scan loop: re-read the feed list, scan, persist the seen-set, send
//!   the completion signal, sleep for the check interval, repeat
//! - the delivery worker: drain the queue into the sink at a fixed pace
//!
//! Both start together, once. There is no shutdown path other than process
//! exit.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::app::{AppContext, RelayError, Result};
use crate::config::format_interval;
use crate::delivery::{delivery_queue, spawn_delivery_worker, DeliveryQueue, DeliveryWorker};
use crate::domain::{FeedSource, SeenSet};
use crate::scanner::{FeedScanner, ScanReport};
use crate::sink::{DeliveryOutcome, Sink};
use crate::store::SeenStore;

/// Body of the end-of-cycle signal.
pub const COMPLETION_MESSAGE: &str = "Feed check complete: all feeds checked and processed.";

/// Summary of one scan cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub scan: ScanReport,
    pub seen_total: usize,
    pub saved: bool,
    pub completion: DeliveryOutcome,
}

/// The scan side of the relay. Owns the seen-set.
pub struct ScanLoop {
    scanner: FeedScanner,
    store: Arc<dyn SeenStore + Send + Sync>,
    completion_sink: Arc<dyn Sink + Send + Sync>,
    queue: DeliveryQueue,
    list_file: PathBuf,
    check_interval: Duration,
    seen: SeenSet,
}

impl ScanLoop {
    /// Run one SCANNING phase.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let start = Utc::now();

        let sources = match FeedSource::read_list(&self.list_file) {
            Ok(sources) => sources,
            Err(e) => {
                error!(
                    "Failed to read feed list {}: {}",
                    self.list_file.display(),
                    e
                );
                Vec::new()
            }
        };
        if sources.is_empty() {
            warn!("No feeds to check");
        }

        let scan = self
            .scanner
            .scan(&sources, &mut self.seen, &self.queue)
            .await;

        let saved = match self.store.save(&self.seen) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save seen entries: {}", e);
                false
            }
        };

        if scan.all_failed() {
            warn!("Every feed failed this cycle");
        }

        // Sent even when every feed failed.
        let completion = self.completion_sink.notify(COMPLETION_MESSAGE).await;
        match &completion {
            DeliveryOutcome::Delivered => info!("Sent completion notification"),
            DeliveryOutcome::Throttled { retry_after } => warn!(
                "Completion notification rate limited (retry after {:?}), skipped",
                retry_after
            ),
            DeliveryOutcome::Failed(reason) => {
                error!("Failed to send completion notification: {}", reason)
            }
        }

        let elapsed = Utc::now().signed_duration_since(start);
        info!(
            "Check complete: {} new entries, {} of {} feeds failed, {} seen ({:.1}s)",
            scan.queued,
            scan.feeds_failed,
            scan.feeds_scanned,
            self.seen.len(),
            elapsed.num_milliseconds() as f64 / 1000.0
        );

        CycleReport {
            scan,
            seen_total: self.seen.len(),
            saved,
            completion,
        }
    }

    /// Alternate SCANNING and IDLE forever.
    pub async fn run(mut self) {
        info!(
            "Scan loop started (check interval: {})",
            format_interval(self.check_interval)
        );

        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.check_interval).await;
        }
    }
}

struct Components {
    scan: ScanLoop,
    worker: DeliveryWorker,
}

enum Lifecycle {
    Ready(Box<Components>),
    Started,
}

/// Handles to the two spawned loops.
pub struct DaemonHandle {
    pub scan: JoinHandle<()>,
    pub delivery: JoinHandle<()>,
}

/// Daemon runner
pub struct Daemon {
    state: Mutex<Lifecycle>,
}

impl Daemon {
    /// Wire the loops together and load the persisted seen-set.
    pub fn new(ctx: AppContext) -> Result<Self> {
        let seen = ctx.store.load()?;
        info!("Loaded {} seen entries", seen.len());

        let (queue, worker) = delivery_queue(ctx.sink, ctx.config.delivery.send_interval);
        let worker = worker.with_max_throttle_retries(ctx.config.delivery.max_throttle_retries);

        let scan = ScanLoop {
            scanner: FeedScanner::new(ctx.fetcher, ctx.normalizer),
            store: ctx.store,
            completion_sink: ctx.completion_sink,
            queue,
            list_file: ctx.config.feeds.list_file,
            check_interval: ctx.config.feeds.check_interval,
            seen,
        };

        Ok(Self {
            state: Mutex::new(Lifecycle::Ready(Box::new(Components { scan, worker }))),
        })
    }

    fn take_components(&self) -> Option<Components> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match std::mem::replace(&mut *state, Lifecycle::Started) {
            Lifecycle::Ready(components) => Some(*components),
            Lifecycle::Started => None,
        }
    }

    /// Spawn the scan loop and the delivery worker. Only the first call
    /// does anything; later calls return `None`.
    pub fn start(&self) -> Option<DaemonHandle> {
        let Some(Components { scan, worker }) = self.take_components() else {
            warn!("Relay already started, ignoring duplicate start");
            return None;
        };

        let delivery = spawn_delivery_worker(worker);
        let scan = tokio::spawn(scan.run());

        Some(DaemonHandle { scan, delivery })
    }

    /// Start and run until the process exits.
    pub async fn run(&self) -> Result<()> {
        let handle = self
            .start()
            .ok_or_else(|| RelayError::Other("Relay already started".to_string()))?;

        let (scan, delivery) = tokio::join!(handle.scan, handle.delivery);
        scan.map_err(|e| RelayError::Other(format!("Scan loop stopped: {}", e)))?;
        delivery.map_err(|e| RelayError::Other(format!("Delivery worker stopped: {}", e)))?;
        Ok(())
    }

    /// Run a single cycle and deliver everything it queued.
    pub async fn run_once(&self) -> Option<CycleReport> {
        let Components { mut scan, mut worker } = self.take_components()?;

        let report = scan.run_cycle().await;
        let attempts = worker.drain().await;
        info!("Delivered queue ({} send attempts)", attempts);

        Some(report)
    }
}
