//! Per-requester selections.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::pos::{BlockPos, Volume};
use crate::world::BlockSource;

/// Identity of whoever issued a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequesterId(pub String);

impl RequesterId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A complete selection: the world it was made in plus its cuboid.
#[derive(Clone)]
pub struct Selection {
    pub world: Arc<dyn BlockSource>,
    pub volume: Volume,
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("world", &self.world.name())
            .field("volume", &self.volume)
            .finish()
    }
}

/// Supplies the active selection of a requester.
///
/// Having no selection is an ordinary condition, not an error.
pub trait SelectionProvider: Send + Sync {
    fn current_selection(&self, requester: &RequesterId) -> Option<Selection>;
}

#[derive(Default)]
struct Corners {
    world: Option<Arc<dyn BlockSource>>,
    pos1: Option<BlockPos>,
    pos2: Option<BlockPos>,
}

/// Two-corner cuboid selections kept in memory.
///
/// A selection is only complete once both corners are set in the same
/// world; setting a corner in another world drops the other corner.
#[derive(Default)]
pub struct SelectionStore {
    corners: RwLock<HashMap<RequesterId, Corners>>,
}

impl SelectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pos1(&self, requester: &RequesterId, world: Arc<dyn BlockSource>, pos: BlockPos) {
        self.set_corner(requester, world, pos, true);
    }

    pub fn set_pos2(&self, requester: &RequesterId, world: Arc<dyn BlockSource>, pos: BlockPos) {
        self.set_corner(requester, world, pos, false);
    }

    fn set_corner(
        &self,
        requester: &RequesterId,
        world: Arc<dyn BlockSource>,
        pos: BlockPos,
        first: bool,
    ) {
        let mut corners = self.corners.write();
        let entry = corners.entry(requester.clone()).or_default();

        let same_world = entry
            .world
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &world));
        if !same_world {
            entry.pos1 = None;
            entry.pos2 = None;
        }

        entry.world = Some(world);
        if first {
            entry.pos1 = Some(pos);
        } else {
            entry.pos2 = Some(pos);
        }
    }

    /// Forget a requester's selection.
    pub fn clear(&self, requester: &RequesterId) {
        self.corners.write().remove(requester);
    }

    /// Corners set so far, for display.
    #[must_use]
    pub fn corners(&self, requester: &RequesterId) -> (Option<BlockPos>, Option<BlockPos>) {
        self.corners
            .read()
            .get(requester)
            .map_or((None, None), |c| (c.pos1, c.pos2))
    }
}

impl SelectionProvider for SelectionStore {
    fn current_selection(&self, requester: &RequesterId) -> Option<Selection> {
        let corners = self.corners.read();
        let entry = corners.get(requester)?;
        let world = entry.world.clone()?;
        let volume = Volume::from_corners(entry.pos1?, entry.pos2?);
        Some(Selection { world, volume })
    }
}
