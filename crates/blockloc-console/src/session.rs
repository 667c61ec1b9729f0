//! One console operator: selection, world edits and scans.

use std::sync::Arc;
use std::time::Duration;

use blockloc::ThreadPoolBuildError;
use blockloc::prelude::*;
use tracing::{info, warn};

use crate::commands::{Command, HELP};

/// Requester name used for everything typed at the console.
pub const CONSOLE: &str = "CONSOLE";

pub struct Session {
    world: Arc<MemoryWorld>,
    selections: Arc<SelectionStore>,
    registry: Arc<BlockRegistry>,
    service: BlockLocService,
    audience: Arc<dyn Audience>,
    requester: RequesterId,
    pending: Vec<ScanHandle>,
}

impl Session {
    pub fn new(
        world: Arc<MemoryWorld>,
        sink: Arc<dyn ReportSink>,
        audience: Arc<dyn Audience>,
        config: &ScanConfig,
    ) -> Result<Self, ThreadPoolBuildError> {
        let selections = Arc::new(SelectionStore::new());
        let registry = Arc::new(BlockRegistry::vanilla());
        let service = BlockLocService::new(
            Arc::clone(&selections) as Arc<dyn SelectionProvider>,
            Arc::clone(&registry) as Arc<dyn TypeResolver>,
            sink,
            config,
        )?;

        Ok(Self {
            world,
            selections,
            registry,
            service,
            audience,
            requester: RequesterId::new(CONSOLE),
            pending: Vec::new(),
        })
    }

    /// Run one command. Returns `false` once the session should end.
    pub fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Pos1(pos) => {
                let world = Arc::clone(&self.world) as Arc<dyn BlockSource>;
                self.selections.set_pos1(&self.requester, world, pos);
                info!("First position set to ({pos})");
            }
            Command::Pos2(pos) => {
                let world = Arc::clone(&self.world) as Arc<dyn BlockSource>;
                self.selections.set_pos2(&self.requester, world, pos);
                info!("Second position set to ({pos})");
            }
            Command::Selection => self.show_selection(),
            Command::Deselect => {
                self.selections.clear(&self.requester);
                info!("Selection cleared");
            }
            Command::SetBlock(pos, raw) => match self.registry.resolve(&raw) {
                Some(kind) => {
                    self.world.set_block(pos, kind);
                    info!("Placed {} at ({pos})", self.registry.display_name(kind));
                }
                None => warn!("Unknown block type '{}'", raw),
            },
            Command::BlockLoc(raw) => {
                let handle =
                    self.service
                        .run_scan(&self.requester, &raw, Arc::clone(&self.audience));
                self.pending.push(handle);
            }
            Command::Blocks(prefix) => {
                let names = self.registry.suggest(&prefix);
                if names.is_empty() {
                    info!("No block types start with '{}'", prefix);
                } else {
                    info!("Block types ({}): {}", names.len(), names.join(", "));
                }
            }
            Command::Load(chunk) => {
                self.world.load_chunk(chunk);
                info!("Chunk ({}, {}) loaded", chunk.x, chunk.z);
            }
            Command::Unload(chunk) => {
                self.world.unload_chunk(chunk);
                info!("Chunk ({}, {}) unloaded", chunk.x, chunk.z);
            }
            Command::Help => {
                info!("Commands:");
                for (usage, description) in HELP {
                    info!("  {usage:<30} {description}");
                }
            }
            Command::Quit => return false,
            Command::Usage(usage) => info!("Usage: {}", usage),
            Command::Unknown(name) => {
                info!("Unknown command: '{}'. Type 'help' for commands.", name);
            }
            Command::Empty => {}
        }
        self.reap();
        true
    }

    fn show_selection(&self) {
        match self.selections.corners(&self.requester) {
            (Some(pos1), Some(pos2)) => {
                let volume = Volume::from_corners(pos1, pos2);
                info!(
                    "Selection in {}: ({}) to ({}), {} blocks",
                    self.world.name(),
                    volume.min,
                    volume.max,
                    volume.block_count()
                );
            }
            (pos1, pos2) => {
                let show = |pos: Option<BlockPos>| {
                    pos.map_or_else(|| "unset".to_string(), |p| format!("({p})"))
                };
                info!("Incomplete selection: pos1 {}, pos2 {}", show(pos1), show(pos2));
            }
        }
    }

    /// Drop handles whose scans have ended.
    pub fn reap(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for handle in pending {
            match handle.wait_timeout(Duration::ZERO) {
                Ok(state) => tracing::debug!(?state, "scan finished"),
                Err(handle) => self.pending.push(handle),
            }
        }
    }

    /// Block until every started scan has ended, returning their final states
    /// in start order.
    pub fn wait_all(&mut self) -> Vec<ScanState> {
        self.pending.drain(..).map(ScanHandle::wait).collect()
    }

    /// Cancel whatever is still running and wait for the workers to stop.
    pub fn shutdown(mut self) {
        for handle in &self.pending {
            handle.cancel();
        }
        let cancelled = self.wait_all().len();
        if cancelled > 0 {
            info!("Stopped {} running scan(s)", cancelled);
        }
    }
}
