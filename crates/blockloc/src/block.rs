//! Block kinds and the name registry.
//!
//! A [`BlockKind`] is a compact, comparable identifier; the registry owns
//! the human-facing names. Each block answers to three spellings:
//!
//! - namespaced key: `minecraft:diamond_ore`
//! - bare key: `diamond_ore`
//! - legacy material name: `DIAMOND_ORE`
//!
//! Anything else is unknown. There is no case folding, so
//! `Diamond_Ore` does not resolve.

use core::fmt;

use hashbrown::HashMap;

/// Block type identifier as stored in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct BlockKind(pub u16);

impl BlockKind {
    /// Air block (default, ID 0)
    pub const AIR: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn id(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Turns raw query input into a block kind.
pub trait TypeResolver: Send + Sync {
    /// Resolve user input, `None` if it names no known block.
    fn resolve(&self, input: &str) -> Option<BlockKind>;

    /// Name used in notices and report headers.
    fn display_name(&self, kind: BlockKind) -> String;
}

/// Registry entry for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDef {
    pub kind: BlockKind,
    /// Namespaced key, e.g. `minecraft:stone`.
    pub key: &'static str,
    /// Legacy upper-case material name, e.g. `STONE`.
    pub material: &'static str,
}

impl BlockDef {
    /// Key without the `minecraft:` namespace.
    #[must_use]
    pub fn bare_key(&self) -> &'static str {
        self.key
            .split_once(':')
            .map_or(self.key, |(_, bare)| bare)
    }
}

macro_rules! vanilla_blocks {
    ($($id:literal => $name:ident, $key:literal;)*) => {
        /// Block constants for the bundled vanilla table.
        pub mod blocks {
            use super::BlockKind;

            $(
                #[doc = concat!("`minecraft:", $key, "`")]
                pub const $name: BlockKind = BlockKind($id);
            )*
        }

        const VANILLA: &[BlockDef] = &[
            $(BlockDef {
                kind: BlockKind($id),
                key: concat!("minecraft:", $key),
                material: stringify!($name),
            },)*
        ];
    };
}

vanilla_blocks! {
    0 => AIR, "air";
    1 => STONE, "stone";
    2 => GRANITE, "granite";
    3 => DIORITE, "diorite";
    4 => ANDESITE, "andesite";
    5 => GRASS_BLOCK, "grass_block";
    6 => DIRT, "dirt";
    7 => COBBLESTONE, "cobblestone";
    8 => OAK_PLANKS, "oak_planks";
    9 => BEDROCK, "bedrock";
    10 => WATER, "water";
    11 => LAVA, "lava";
    12 => SAND, "sand";
    13 => GRAVEL, "gravel";
    14 => GOLD_ORE, "gold_ore";
    15 => IRON_ORE, "iron_ore";
    16 => COAL_ORE, "coal_ore";
    17 => OAK_LOG, "oak_log";
    18 => OAK_LEAVES, "oak_leaves";
    19 => GLASS, "glass";
    20 => LAPIS_ORE, "lapis_ore";
    21 => SANDSTONE, "sandstone";
    22 => DIAMOND_ORE, "diamond_ore";
    23 => REDSTONE_ORE, "redstone_ore";
    24 => EMERALD_ORE, "emerald_ore";
    25 => COPPER_ORE, "copper_ore";
    26 => DEEPSLATE, "deepslate";
    27 => OBSIDIAN, "obsidian";
    28 => CHEST, "chest";
    29 => SPAWNER, "spawner";
    30 => NETHERRACK, "netherrack";
    31 => ANCIENT_DEBRIS, "ancient_debris";
}

/// Name lookup for a fixed set of blocks.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    defs: Vec<BlockDef>,
    by_name: HashMap<&'static str, BlockKind>,
}

impl BlockRegistry {
    /// Build a registry from block definitions.
    #[must_use]
    pub fn new(defs: impl IntoIterator<Item = BlockDef>) -> Self {
        let defs: Vec<BlockDef> = defs.into_iter().collect();
        let mut by_name = HashMap::with_capacity(defs.len() * 3);
        for def in &defs {
            by_name.insert(def.key, def.kind);
            by_name.insert(def.bare_key(), def.kind);
            by_name.insert(def.material, def.kind);
        }
        Self { defs, by_name }
    }

    /// The bundled vanilla block table.
    #[must_use]
    pub fn vanilla() -> Self {
        Self::new(VANILLA.iter().copied())
    }

    #[must_use]
    pub fn get(&self, kind: BlockKind) -> Option<&BlockDef> {
        self.defs.iter().find(|def| def.kind == kind)
    }

    /// Legacy material names starting with `prefix` (case-insensitive), sorted.
    ///
    /// Used for command-argument completion.
    #[must_use]
    pub fn suggest(&self, prefix: &str) -> Vec<&'static str> {
        let prefix = prefix.trim_start_matches("minecraft:").to_ascii_uppercase();
        let mut names: Vec<&'static str> = self
            .defs
            .iter()
            .map(|def| def.material)
            .filter(|material| material.starts_with(&prefix))
            .collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl TypeResolver for BlockRegistry {
    fn resolve(&self, input: &str) -> Option<BlockKind> {
        self.by_name.get(input).copied()
    }

    fn display_name(&self, kind: BlockKind) -> String {
        self.get(kind)
            .map_or_else(|| kind.to_string(), |def| def.material.to_string())
    }
}
