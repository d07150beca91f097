//! # Terrain Generation
//!
//! Fills freshly allocated chunks with block ids. The scheduler invokes the
//! generator exactly once per chunk load; everything the generator writes
//! goes through the chunk's own `set`, and the result is deterministic for
//! a given (seed, chunk coordinate) because noise is sampled in world
//! space, which also keeps the terrain seamless across chunk borders.

use noise::{NoiseFn, Perlin};

use super::block::registry::BlockKind;
use super::chunk::{Chunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Sea level in world Y; water fills open space at and below it.
pub const SEA_LEVEL: i32 = 64;

/// Height swing of the Perlin surface around sea level.
const HEIGHT_AMPLITUDE: f64 = 24.0;

/// Scale applied to world coordinates before sampling the height noise.
const HEIGHT_SCALE: f64 = 0.01;

/// Fills chunks with terrain. Implementations must write every cell and be
/// deterministic for a given chunk coordinate.
pub trait TerrainGenerator {
    /// Populates all cells of an all-air chunk.
    fn fill(&self, chunk: &mut Chunk);
}

/// Perlin height-field terrain: stone core, dirt cap, grass surface, sand
/// shores, water up to sea level.
pub struct NoiseTerrain {
    perlin: Perlin,
}

impl NoiseTerrain {
    /// Creates a generator for the given world seed.
    pub fn new(seed: u32) -> Self {
        NoiseTerrain {
            perlin: Perlin::new(seed),
        }
    }

    /// Surface height of the column at world-space (x, z).
    pub(crate) fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        let sample = self.perlin.get([
            world_x as f64 * HEIGHT_SCALE,
            world_z as f64 * HEIGHT_SCALE,
        ]);
        SEA_LEVEL + (sample * HEIGHT_AMPLITUDE) as i32
    }

    fn block_for(&self, y: i32, surface: i32) -> BlockKind {
        if y > surface {
            if y <= SEA_LEVEL {
                BlockKind::WATER
            } else {
                BlockKind::AIR
            }
        } else if y == surface {
            if surface <= SEA_LEVEL + 1 {
                BlockKind::SAND
            } else {
                BlockKind::GRASS
            }
        } else if y >= surface - 3 {
            BlockKind::DIRT
        } else {
            BlockKind::STONE
        }
    }
}

impl TerrainGenerator for NoiseTerrain {
    fn fill(&self, chunk: &mut Chunk) {
        let origin = chunk.world_origin();
        for z in 0..CHUNK_DEPTH as i32 {
            for x in 0..CHUNK_WIDTH as i32 {
                let surface = self.surface_height(origin.x + x, origin.y + z);
                for y in 0..CHUNK_HEIGHT as i32 {
                    chunk.set(x, y, z, self.block_for(y, surface).id());
                }
            }
        }
    }
}

/// Flat terrain for tests and deterministic demos: stone up to three below
/// ground, dirt below the surface, grass on top, air above.
pub struct FlatTerrain {
    /// World Y of the grass surface.
    pub ground_height: i32,
}

impl TerrainGenerator for FlatTerrain {
    fn fill(&self, chunk: &mut Chunk) {
        for z in 0..CHUNK_DEPTH as i32 {
            for x in 0..CHUNK_WIDTH as i32 {
                for y in 0..CHUNK_HEIGHT as i32 {
                    let kind = if y > self.ground_height {
                        BlockKind::AIR
                    } else if y == self.ground_height {
                        BlockKind::GRASS
                    } else if y >= self.ground_height - 3 {
                        BlockKind::DIRT
                    } else {
                        BlockKind::STONE
                    };
                    chunk.set(x, y, z, kind.id());
                }
            }
        }
    }
}
