//! Volume scanning.
//!
//! Every cell of the volume is visited exactly once, inclusive of both
//! corners on every axis, and compared against the target kind by exact
//! identifier. The scan never stops at the first match.
//!
//! The unit of work is a slab: all cells sharing one x value. The
//! sequential scanner walks slabs in order; the parallel scanner hands
//! slabs to rayon and merges the per-slab hits afterwards. Cancellation is
//! checked once per slab.

use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::HashSet;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::block::BlockKind;
use crate::error::{ScanError, ScanResult};
use crate::pos::{BlockPos, Volume};
use crate::world::BlockSource;

/// Never set; used by the non-cancellable entry points.
static NEVER: AtomicBool = AtomicBool::new(false);

/// Unique positions that matched a scan.
///
/// Inserting a position that is already present is a no-op, so slabs
/// scanned in any order (or twice) merge into the same set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    positions: HashSet<BlockPos>,
}

impl MatchSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a position, returning `false` if it was already present.
    pub fn insert(&mut self, pos: BlockPos) -> bool {
        self.positions.insert(pos)
    }

    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.positions.contains(&pos)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.positions.iter().copied()
    }

    /// Positions ascending by x, then y, then z.
    #[must_use]
    pub fn sorted(&self) -> Vec<BlockPos> {
        let mut positions: Vec<BlockPos> = self.iter().collect();
        positions.sort_unstable();
        positions
    }
}

impl Extend<BlockPos> for MatchSet {
    fn extend<T: IntoIterator<Item = BlockPos>>(&mut self, iter: T) {
        self.positions.extend(iter);
    }
}

impl FromIterator<BlockPos> for MatchSet {
    fn from_iter<T: IntoIterator<Item = BlockPos>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Result of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub matches: MatchSet,
    /// Number of cells read from the block source.
    pub visited: u64,
}

/// Scan `volume` for `target` on the calling thread.
pub fn scan<S>(world: &S, volume: &Volume, target: BlockKind) -> ScanResult<ScanOutcome>
where
    S: BlockSource + ?Sized,
{
    scan_cancellable(world, volume, target, &NEVER)
}

/// [`scan`], aborting with [`ScanError::Cancelled`] once `cancel` is set.
pub fn scan_cancellable<S>(
    world: &S,
    volume: &Volume,
    target: BlockKind,
    cancel: &AtomicBool,
) -> ScanResult<ScanOutcome>
where
    S: BlockSource + ?Sized,
{
    volume.validate()?;

    let mut matches = MatchSet::new();
    let mut visited = 0;

    for x in volume.min.x..=volume.max.x {
        if cancel.load(Ordering::Relaxed) {
            debug!(x, "scan cancelled");
            return Err(ScanError::Cancelled);
        }
        visited += scan_slab(world, volume, target, x, |pos| {
            matches.insert(pos);
        })?;
    }

    Ok(ScanOutcome { matches, visited })
}

/// Scan `volume` for `target`, one slab per rayon task.
///
/// Produces the same result as [`scan`]. Runs on the current rayon pool,
/// so call it from inside `ThreadPool::install` or a pool task to pick the
/// pool.
pub fn scan_parallel<S>(world: &S, volume: &Volume, target: BlockKind) -> ScanResult<ScanOutcome>
where
    S: BlockSource + ?Sized,
{
    scan_parallel_cancellable(world, volume, target, &NEVER)
}

/// [`scan_parallel`], aborting with [`ScanError::Cancelled`] once `cancel` is set.
pub fn scan_parallel_cancellable<S>(
    world: &S,
    volume: &Volume,
    target: BlockKind,
    cancel: &AtomicBool,
) -> ScanResult<ScanOutcome>
where
    S: BlockSource + ?Sized,
{
    volume.validate()?;

    let slabs = (volume.min.x..=volume.max.x)
        .into_par_iter()
        .map(|x| {
            if cancel.load(Ordering::Relaxed) {
                return Err(ScanError::Cancelled);
            }
            let mut hits = Vec::new();
            let visited = scan_slab(world, volume, target, x, |pos| hits.push(pos))?;
            Ok((hits, visited))
        })
        .collect::<ScanResult<Vec<_>>>()?;

    let mut matches = MatchSet::new();
    let mut visited = 0;
    for (hits, slab_visited) in slabs {
        matches.extend(hits);
        visited += slab_visited;
    }

    Ok(ScanOutcome { matches, visited })
}

/// Visit every cell with the given x, calling `on_match` for hits.
fn scan_slab<S>(
    world: &S,
    volume: &Volume,
    target: BlockKind,
    x: i32,
    mut on_match: impl FnMut(BlockPos),
) -> ScanResult<u64>
where
    S: BlockSource + ?Sized,
{
    let mut visited = 0;
    for y in volume.min.y..=volume.max.y {
        for z in volume.min.z..=volume.max.z {
            let pos = BlockPos::new(x, y, z);
            let kind = world
                .block_at(pos)
                .ok_or(ScanError::Unavailable { pos })?;
            visited += 1;
            if kind == target {
                trace!(%pos, "match");
                on_match(pos);
            }
        }
    }
    Ok(visited)
}
