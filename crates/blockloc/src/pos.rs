//! Block coordinates and cuboid volumes.

use core::fmt;

use crate::error::{ScanError, ScanResult};

/// Integer position of a single block.
///
/// Ordering is component-wise: x, then y, then z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

/// Axis-aligned cuboid of blocks, inclusive on both corners.
///
/// The fields are public so a selection tool can hand over whatever it
/// holds; [`Volume::validate`] is what the scanner trusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Volume {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl Volume {
    /// Create a volume from already ordered corners.
    pub fn new(min: BlockPos, max: BlockPos) -> ScanResult<Self> {
        let volume = Self { min, max };
        volume.validate()?;
        Ok(volume)
    }

    /// Create a volume from two arbitrary corners (e.g. pos1/pos2 of a selection).
    #[must_use]
    pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A volume covering exactly one block.
    #[must_use]
    pub const fn single(pos: BlockPos) -> Self {
        Self { min: pos, max: pos }
    }

    /// Check `min <= max` on every axis.
    pub fn validate(&self) -> ScanResult<()> {
        let Self { min, max } = *self;
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(ScanError::InvalidVolume { min, max });
        }
        Ok(())
    }

    /// Number of blocks along each axis, `(dx + 1, dy + 1, dz + 1)`.
    ///
    /// Only meaningful for a valid volume.
    #[must_use]
    pub fn dimensions(&self) -> (u64, u64, u64) {
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1).max(0) as u64;
        (
            span(self.min.x, self.max.x),
            span(self.min.y, self.max.y),
            span(self.min.z, self.max.z),
        )
    }

    /// Total number of blocks in the volume, saturating at `u64::MAX`.
    #[must_use]
    pub fn block_count(&self) -> u64 {
        let (dx, dy, dz) = self.dimensions();
        dx.saturating_mul(dy).saturating_mul(dz)
    }

    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) -> ({})", self.min, self.max)
    }
}
