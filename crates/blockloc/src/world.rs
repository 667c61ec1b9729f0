//! Read access to world blocks.

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;

use crate::block::BlockKind;
use crate::pos::{BlockPos, Volume};

/// Read-only view of a world's blocks.
///
/// Shared between concurrent scans, so implementations must tolerate
/// parallel readers.
pub trait BlockSource: Send + Sync {
    /// World name used in report headers.
    fn name(&self) -> &str;

    /// Block at `pos`, or `None` if the cell cannot be read right now
    /// (e.g. its chunk is not loaded).
    fn block_at(&self, pos: BlockPos) -> Option<BlockKind>;
}

/// Chunk column coordinates (16x16 blocks on the XZ plane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a block.
    #[must_use]
    pub const fn containing(pos: BlockPos) -> Self {
        Self {
            x: pos.x >> 4,
            z: pos.z >> 4,
        }
    }
}

type Generator = Box<dyn Fn(BlockPos) -> BlockKind + Send + Sync>;

/// Sparse in-memory world.
///
/// Blocks come from a generator function unless explicitly placed. Cells
/// outside the vertical build range read as air. Chunks can be marked
/// unloaded, in which case reads inside them fail.
pub struct MemoryWorld {
    name: String,
    min_y: i32,
    max_y: i32,
    generator: Generator,
    placed: RwLock<HashMap<BlockPos, BlockKind>>,
    unloaded: RwLock<HashSet<ChunkPos>>,
}

impl MemoryWorld {
    /// Vertical build range used by [`MemoryWorld::new`].
    pub const DEFAULT_HEIGHT: (i32, i32) = (-64, 319);

    /// An all-air world.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_generator(name, |_| BlockKind::AIR)
    }

    /// A world whose unplaced blocks come from `generator`.
    #[must_use]
    pub fn with_generator(
        name: impl Into<String>,
        generator: impl Fn(BlockPos) -> BlockKind + Send + Sync + 'static,
    ) -> Self {
        let (min_y, max_y) = Self::DEFAULT_HEIGHT;
        Self {
            name: name.into(),
            min_y,
            max_y,
            generator: Box::new(generator),
            placed: RwLock::new(HashMap::new()),
            unloaded: RwLock::new(HashSet::new()),
        }
    }

    /// Override the vertical build range.
    #[must_use]
    pub fn with_height(mut self, min_y: i32, max_y: i32) -> Self {
        self.min_y = min_y;
        self.max_y = max_y;
        self
    }

    /// Place a block, replacing whatever was there.
    pub fn set_block(&self, pos: BlockPos, kind: BlockKind) {
        self.placed.write().insert(pos, kind);
    }

    /// Place `kind` in every cell of `volume`.
    pub fn fill(&self, volume: &Volume, kind: BlockKind) {
        let mut placed = self.placed.write();
        for x in volume.min.x..=volume.max.x {
            for y in volume.min.y..=volume.max.y {
                for z in volume.min.z..=volume.max.z {
                    placed.insert(BlockPos::new(x, y, z), kind);
                }
            }
        }
    }

    pub fn unload_chunk(&self, chunk: ChunkPos) {
        self.unloaded.write().insert(chunk);
    }

    pub fn load_chunk(&self, chunk: ChunkPos) {
        self.unloaded.write().remove(&chunk);
    }

    #[must_use]
    pub fn is_loaded(&self, chunk: ChunkPos) -> bool {
        !self.unloaded.read().contains(&chunk)
    }

    /// Number of explicitly placed blocks.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.placed.read().len()
    }
}

impl BlockSource for MemoryWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn block_at(&self, pos: BlockPos) -> Option<BlockKind> {
        if !self.is_loaded(ChunkPos::containing(pos)) {
            return None;
        }
        if pos.y < self.min_y || pos.y > self.max_y {
            return Some(BlockKind::AIR);
        }
        if let Some(kind) = self.placed.read().get(&pos) {
            return Some(*kind);
        }
        Some((self.generator)(pos))
    }
}

impl core::fmt::Debug for MemoryWorld {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryWorld")
            .field("name", &self.name)
            .field("min_y", &self.min_y)
            .field("max_y", &self.max_y)
            .field("placed", &self.placed.read().len())
            .field("unloaded", &self.unloaded.read().len())
            .finish_non_exhaustive()
    }
}
