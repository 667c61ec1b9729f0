//! Bounded-volume block scanning.
//!
//! Answers one question: "inside this selection, where are all the blocks of
//! this type?" The engine walks every cell of an axis-aligned cuboid, keeps
//! the cells whose block matches the target, and renders a deterministic
//! location report.
//!
//! # Flow
//!
//! ```text
//! run_scan(requester, "DIAMOND_ORE")            (interactive thread)
//!   ├── resolve type      ── unknown ──▶ UnknownType notice
//!   ├── current selection ── none    ──▶ SelectionRequired notice
//!   ├── "Calculating blocks..."
//!   └── hand off ─────────────────────────────┐
//!                                             ▼  (worker pool)
//!                         scan / scan_parallel ─▶ MatchSet
//!                         format               ─▶ Report | NoMatches
//!                         ReportSink::emit + PrintedToConsole notice
//! ```
//!
//! World storage, selection tools and command parsing stay outside: they
//! plug in through [`BlockSource`], [`SelectionProvider`] and
//! [`TypeResolver`].
//!
//! # Example
//!
//! ```ignore
//! let service = BlockLocService::new(selections, Arc::new(BlockRegistry::vanilla()), sink, &config)?;
//! let handle = service.run_scan(&RequesterId::new("Steve"), "minecraft:diamond_ore", audience);
//! handle.wait();
//! ```

pub mod block;
pub mod config;
pub mod error;
pub mod pos;
pub mod report;
pub mod scan;
pub mod selection;
pub mod service;
pub mod sink;
pub mod world;

pub use block::{BlockDef, BlockKind, BlockRegistry, TypeResolver};
pub use config::ScanConfig;
pub use error::{ScanError, ScanResult};
pub use pos::{BlockPos, Volume};
pub use rayon::ThreadPoolBuildError;
pub use report::{Formatted, Notice, Report, Tone, format};
pub use scan::{
    MatchSet, ScanOutcome, scan, scan_cancellable, scan_parallel, scan_parallel_cancellable,
};
pub use selection::{RequesterId, Selection, SelectionProvider, SelectionStore};
pub use service::{BlockLocService, ScanHandle, ScanState};
pub use sink::{Audience, ReportSink, TracingSink};
pub use world::{BlockSource, ChunkPos, MemoryWorld};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Audience, BlockKind, BlockLocService, BlockPos, BlockRegistry, BlockSource, MemoryWorld,
        Notice, ReportSink, RequesterId, ScanConfig, ScanError, ScanHandle, ScanState, Selection,
        SelectionProvider, SelectionStore, TypeResolver, Volume,
    };
}
