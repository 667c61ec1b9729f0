//! Output channels: the requester and the log.

use tracing::info;

use crate::report::{Notice, Report};

/// Interactive channel back to the requester.
pub trait Audience: Send + Sync {
    fn send(&self, notice: &Notice);
}

/// Durable, append-only channel for full reports.
///
/// Shared by concurrent scans: one `emit` must land as a contiguous block
/// of lines.
pub trait ReportSink: Send + Sync {
    fn emit(&self, report: &Report);
}

/// Writes reports through `tracing` at info level, target `blockloc::report`.
///
/// A report is logged as one multi-line event, so no other log output can
/// land between its header and footer.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportSink for TracingSink {
    fn emit(&self, report: &Report) {
        let block = report.lines().join("\n");
        info!(target: "blockloc::report", "\n{block}");
    }
}
