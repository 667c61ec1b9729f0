//! Scan orchestration.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ─▶ Validating ─▶ Scanning ─▶ Reporting ─▶ Done
//!             │             │
//!             └──▶ Failed ◀─┘
//! ```
//!
//! Validation (type lookup, selection lookup) runs on the caller's thread
//! and answers with a notice straight away. Everything after the
//! "Calculating blocks..." notice runs on the service's worker pool; the
//! caller gets a [`ScanHandle`] back immediately.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::block::{BlockKind, TypeResolver};
use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::report::{Formatted, Notice, format};
use crate::scan::{ScanOutcome, scan_cancellable, scan_parallel_cancellable};
use crate::selection::{RequesterId, Selection, SelectionProvider};
use crate::sink::{Audience, ReportSink};

/// Where one invocation is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Validating,
    Scanning,
    Reporting,
    Done,
    Failed(ScanError),
}

impl ScanState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

fn enter(requester: &RequesterId, state: &ScanState) {
    debug!(%requester, ?state, "scan state");
}

/// Runs block scans for requesters.
///
/// Holds no per-invocation state; concurrent `run_scan` calls share only
/// the collaborators and the worker pool.
pub struct BlockLocService {
    selections: Arc<dyn SelectionProvider>,
    resolver: Arc<dyn TypeResolver>,
    sink: Arc<dyn ReportSink>,
    pool: ThreadPool,
    parallel_threshold: u64,
}

impl BlockLocService {
    pub fn new(
        selections: Arc<dyn SelectionProvider>,
        resolver: Arc<dyn TypeResolver>,
        sink: Arc<dyn ReportSink>,
        config: &ScanConfig,
    ) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("blockloc-scan-{i}"))
            .build()?;

        info!(
            threads = pool.current_num_threads(),
            parallel_threshold = config.parallel_threshold,
            "block scan service ready"
        );

        Ok(Self {
            selections,
            resolver,
            sink,
            pool,
            parallel_threshold: config.parallel_threshold,
        })
    }

    /// Start a scan for `requester`, searching their selection for the
    /// block named by `raw_type`.
    ///
    /// All feedback goes through `audience` and the report sink. The
    /// returned handle only tells the host when the invocation ended.
    pub fn run_scan(
        &self,
        requester: &RequesterId,
        raw_type: &str,
        audience: Arc<dyn Audience>,
    ) -> ScanHandle {
        enter(requester, &ScanState::Idle);
        enter(requester, &ScanState::Validating);

        let (kind, selection) = match self.validate(requester, raw_type) {
            Ok(validated) => validated,
            Err(err) => {
                debug!(%requester, input = raw_type, %err, "scan rejected");
                audience.send(&err.notice());
                let state = ScanState::Failed(err);
                enter(requester, &state);
                return ScanHandle::finished(state);
            }
        };

        audience.send(&Notice::Calculating);

        let (tx, rx) = bounded(1);
        let cancel = Arc::new(AtomicBool::new(false));
        let job = ScanJob {
            requester: requester.clone(),
            kind,
            kind_name: self.resolver.display_name(kind),
            parallel: selection.volume.block_count() >= self.parallel_threshold,
            selection,
            sink: Arc::clone(&self.sink),
            audience,
            cancel: Arc::clone(&cancel),
        };

        self.pool.spawn(move || {
            // A panicking audience inside `fail` must not take the pool thread down.
            let state = catch_unwind(AssertUnwindSafe(|| job.run()))
                .unwrap_or(ScanState::Failed(ScanError::WorkerPanicked));
            // The host may have dropped its handle.
            let _ = tx.send(state);
        });

        ScanHandle { rx, cancel }
    }

    fn validate(
        &self,
        requester: &RequesterId,
        raw_type: &str,
    ) -> ScanResult<(BlockKind, Selection)> {
        let kind = self
            .resolver
            .resolve(raw_type)
            .ok_or_else(|| ScanError::UnknownType(raw_type.to_string()))?;
        let selection = self
            .selections
            .current_selection(requester)
            .ok_or(ScanError::NoActiveVolume)?;
        Ok((kind, selection))
    }
}

impl core::fmt::Debug for BlockLocService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockLocService")
            .field("threads", &self.pool.current_num_threads())
            .field("parallel_threshold", &self.parallel_threshold)
            .finish_non_exhaustive()
    }
}

/// Everything a worker needs for one invocation.
struct ScanJob {
    requester: RequesterId,
    kind: BlockKind,
    kind_name: String,
    parallel: bool,
    selection: Selection,
    sink: Arc<dyn ReportSink>,
    audience: Arc<dyn Audience>,
    cancel: Arc<AtomicBool>,
}

impl ScanJob {
    fn run(self) -> ScanState {
        enter(&self.requester, &ScanState::Scanning);
        let started = Instant::now();

        let result = catch_unwind(AssertUnwindSafe(|| self.scan()))
            .unwrap_or(Err(ScanError::WorkerPanicked));
        let outcome = match result {
            Ok(outcome) if !self.cancel.load(Ordering::Relaxed) => outcome,
            Ok(_) => return self.fail(ScanError::Cancelled),
            Err(err) => return self.fail(err),
        };

        enter(&self.requester, &ScanState::Reporting);
        info!(
            requester = %self.requester,
            kind = %self.kind_name,
            world = self.selection.world.name(),
            volume = %self.selection.volume,
            parallel = self.parallel,
            visited = outcome.visited,
            matches = outcome.matches.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "block scan finished"
        );

        // Sink and audience are host code; a panic there still fails the scan.
        if catch_unwind(AssertUnwindSafe(|| self.report(&outcome))).is_err() {
            return self.fail(ScanError::WorkerPanicked);
        }

        enter(&self.requester, &ScanState::Done);
        ScanState::Done
    }

    fn report(&self, outcome: &ScanOutcome) {
        match format(&outcome.matches, &self.kind_name, self.selection.world.name()) {
            Formatted::Empty(notice) => self.audience.send(&notice),
            Formatted::Report(report) => {
                self.sink.emit(&report);
                self.audience.send(&Notice::PrintedToConsole);
            }
        }
    }

    fn scan(&self) -> ScanResult<ScanOutcome> {
        let world = self.selection.world.as_ref();
        let volume = &self.selection.volume;
        if self.parallel {
            scan_parallel_cancellable(world, volume, self.kind, &self.cancel)
        } else {
            scan_cancellable(world, volume, self.kind, &self.cancel)
        }
    }

    fn fail(&self, err: ScanError) -> ScanState {
        warn!(requester = %self.requester, %err, "block scan aborted");
        self.audience.send(&err.notice());
        let state = ScanState::Failed(err);
        enter(&self.requester, &state);
        state
    }
}

/// Host-side view of a running invocation.
#[derive(Debug)]
pub struct ScanHandle {
    rx: Receiver<ScanState>,
    cancel: Arc<AtomicBool>,
}

impl ScanHandle {
    fn finished(state: ScanState) -> Self {
        let (tx, rx) = bounded(1);
        // Capacity 1 and we hold the receiver, so this cannot fail.
        let _ = tx.send(state);
        Self {
            rx,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask the worker to stop. A cancelled scan reports nothing.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Block until the invocation reaches a terminal state.
    pub fn wait(self) -> ScanState {
        self.rx
            .recv()
            .unwrap_or(ScanState::Failed(ScanError::WorkerPanicked))
    }

    /// Like [`wait`](Self::wait), giving the handle back on timeout.
    pub fn wait_timeout(self, timeout: Duration) -> Result<ScanState, Self> {
        match self.rx.recv_timeout(timeout) {
            Ok(state) => Ok(state),
            Err(RecvTimeoutError::Timeout) => Err(self),
            Err(RecvTimeoutError::Disconnected) => {
                Ok(ScanState::Failed(ScanError::WorkerPanicked))
            }
        }
    }
}
