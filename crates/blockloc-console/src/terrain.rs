//! World generation - layered hills with ore veins

use blockloc::{BlockKind, BlockPos};
use blockloc::block::blocks;

// ============================================================================
// Noise
// ============================================================================

/// Integer hash for lattice points and ore rolls.
fn hash3(seed: u64, x: i32, y: i32, z: i32) -> u64 {
    let mut h = seed
        ^ (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (z as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Lattice value in [-1, 1].
fn lattice(seed: u64, x: i32, z: i32) -> f64 {
    (hash3(seed, x, 0, z) >> 11) as f64 / (1u64 << 52) as f64 - 1.0
}

/// 2D value noise, returns value in [-1, 1]
fn noise2d(seed: u64, x: f64, z: f64) -> f64 {
    let x0 = x.floor() as i32;
    let z0 = z.floor() as i32;
    let sx = fade(x - x0 as f64);
    let sz = fade(z - z0 as f64);

    let n0 = lerp(lattice(seed, x0, z0), lattice(seed, x0 + 1, z0), sx);
    let n1 = lerp(lattice(seed, x0, z0 + 1), lattice(seed, x0 + 1, z0 + 1), sx);
    lerp(n0, n1, sz)
}

/// Fractal Brownian Motion - multiple octaves of noise
fn fbm(seed: u64, x: f64, z: f64, octaves: u32) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for octave in 0..octaves {
        value += noise2d(seed.wrapping_add(octave as u64), x * frequency, z * frequency) * amplitude;
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    value / max_value
}

// ============================================================================
// Terrain
// ============================================================================

/// Ore placement: block, highest y it appears at, 1-in-N chance per stone block.
const ORES: &[(BlockKind, i32, u64)] = &[
    (blocks::DIAMOND_ORE, 16, 400),
    (blocks::GOLD_ORE, 32, 250),
    (blocks::REDSTONE_ORE, 16, 120),
    (blocks::LAPIS_ORE, 32, 300),
    (blocks::IRON_ORE, 64, 90),
    (blocks::COPPER_ORE, 96, 110),
    (blocks::COAL_ORE, 128, 60),
];

#[derive(Debug, Clone, Copy)]
pub struct Terrain {
    pub seed: u64,
    pub base_height: i32,
    pub hill_height: i32,
    pub sea_level: i32,
    pub bedrock_y: i32,
    pub deepslate_y: i32,
    pub scale: f64,
}

impl Default for Terrain {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            base_height: 64,
            hill_height: 20,
            sea_level: 62,
            bedrock_y: -64,
            deepslate_y: 0,
            scale: 0.02,
        }
    }
}

impl Terrain {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Surface height of the column at (x, z).
    #[must_use]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let n = fbm(self.seed, x as f64 * self.scale, z as f64 * self.scale, 4);
        self.base_height + (n * self.hill_height as f64) as i32
    }

    #[must_use]
    pub fn block_at(&self, pos: BlockPos) -> BlockKind {
        let surface = self.surface_height(pos.x, pos.z);
        let depth = surface - pos.y;

        if pos.y <= self.bedrock_y {
            blocks::BEDROCK
        } else if depth < 0 {
            if pos.y <= self.sea_level {
                blocks::WATER
            } else {
                BlockKind::AIR
            }
        } else if depth == 0 {
            if surface < self.sea_level { blocks::SAND } else { blocks::GRASS_BLOCK }
        } else if depth < 4 {
            blocks::DIRT
        } else {
            self.stone_at(pos)
        }
    }

    fn stone_at(&self, pos: BlockPos) -> BlockKind {
        let roll = hash3(self.seed, pos.x, pos.y, pos.z);
        for (i, &(ore, max_y, chance)) in ORES.iter().enumerate() {
            if pos.y <= max_y && (roll >> (i * 8)) % chance == 0 {
                return ore;
            }
        }
        if pos.y < self.deepslate_y { blocks::DEEPSLATE } else { blocks::STONE }
    }
}
