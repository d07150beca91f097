//! Spawn placement.
//!
//! Scans the center column of a chunk from the top of the world downward
//! and reports a safe standing position on the first solid block found.
//! The scheduler runs this once, when the designated spawn chunk first
//! loads.

use cgmath::Point3;

use crate::voxels::block::registry::BlockRegistry;
use crate::voxels::chunk::{Chunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Finds a standing position above the first solid block of the chunk's
/// center column, in world space. `None` if the column is all air down to
/// the floor (standing on the world floor is not safe ground).
pub fn find_spawn_position(chunk: &Chunk, registry: &BlockRegistry) -> Option<Point3<f32>> {
    let x = CHUNK_WIDTH as i32 / 2;
    let z = CHUNK_DEPTH as i32 / 2;
    let ground = (0..CHUNK_HEIGHT as i32)
        .rev()
        .find(|&y| registry.is_solid(chunk.get(x, y, z)))?;
    let origin = chunk.world_origin();
    Some(Point3::new(
        (origin.x + x) as f32 + 0.5,
        (ground + 1) as f32,
        (origin.y + z) as f32 + 0.5,
    ))
}
