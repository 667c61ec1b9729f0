//! Shared fixtures for service-level tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use blockloc::prelude::*;
use blockloc::{BlockPos, Report};
use parking_lot::Mutex;

/// Records everything sent to the requester and the log.
#[derive(Default)]
pub struct Recorder {
    notices: Mutex<Vec<Notice>>,
    reports: Mutex<Vec<Report>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }
}

impl Audience for Recorder {
    fn send(&self, notice: &Notice) {
        self.notices.lock().push(notice.clone());
    }
}

impl ReportSink for Recorder {
    fn emit(&self, report: &Report) {
        self.reports.lock().push(report.clone());
    }
}

/// A memory world that counts block reads.
pub struct CountingWorld {
    inner: MemoryWorld,
    reads: AtomicU64,
}

impl CountingWorld {
    pub fn new(inner: MemoryWorld) -> Arc<Self> {
        Arc::new(Self {
            inner,
            reads: AtomicU64::new(0),
        })
    }

    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn world(&self) -> &MemoryWorld {
        &self.inner
    }
}

impl BlockSource for CountingWorld {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn block_at(&self, pos: BlockPos) -> Option<BlockKind> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.block_at(pos)
    }
}

/// Service wired to a selection store and a recorder.
pub struct Harness {
    pub service: BlockLocService,
    pub selections: Arc<SelectionStore>,
    pub recorder: Arc<Recorder>,
}

impl Harness {
    pub fn new(config: &ScanConfig) -> Self {
        let selections = Arc::new(SelectionStore::new());
        let recorder = Recorder::new();
        let service = BlockLocService::new(
            Arc::clone(&selections) as Arc<dyn SelectionProvider>,
            Arc::new(BlockRegistry::vanilla()),
            Arc::clone(&recorder) as Arc<dyn ReportSink>,
            config,
        )
        .expect("failed to build worker pool");
        Self {
            service,
            selections,
            recorder,
        }
    }

    /// Sequential scans only.
    pub fn sequential() -> Self {
        Self::new(&ScanConfig {
            parallel_threshold: u64::MAX,
            worker_threads: 2,
        })
    }

    /// Parallel scans for everything.
    pub fn parallel() -> Self {
        Self::new(&ScanConfig {
            parallel_threshold: 0,
            worker_threads: 4,
        })
    }

    pub fn select(
        &self,
        requester: &RequesterId,
        world: Arc<dyn BlockSource>,
        pos1: (i32, i32, i32),
        pos2: (i32, i32, i32),
    ) {
        self.selections
            .set_pos1(requester, Arc::clone(&world), pos1.into());
        self.selections.set_pos2(requester, world, pos2.into());
    }

    pub fn run(&self, requester: &RequesterId, raw_type: &str) -> ScanState {
        self.service
            .run_scan(requester, raw_type, Arc::clone(&self.recorder) as Arc<dyn Audience>)
            .wait()
    }
}
