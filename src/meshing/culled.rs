//! Per-face culling, the baseline mesher.
//!
//! Walks every block in the chunk and emits one quad for each face whose
//! neighbor is not solid. Simple and allocation-free against the shared
//! scratch, but produces an order of magnitude more quads than the greedy
//! pass on uniform terrain.

use log::warn;

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::registry::BlockRegistry;
use crate::voxels::chunk::{Chunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

use super::{MeshScratch, TextureAtlas};

pub(crate) fn build(
    scratch: &mut MeshScratch,
    chunk: &Chunk,
    registry: &BlockRegistry,
    atlas: &TextureAtlas,
) {
    let origin = chunk.world_origin();

    for y in 0..CHUNK_HEIGHT as i32 {
        for z in 0..CHUNK_DEPTH as i32 {
            for x in 0..CHUNK_WIDTH as i32 {
                let block_type = registry.by_id(chunk.get(x, y, z));
                if !block_type.is_solid {
                    continue;
                }
                for side in BlockSide::all() {
                    let o = side.offset();
                    if scratch.solid(x + o.x, y + o.y, z + o.z) {
                        continue;
                    }
                    let Some(tile) = block_type.face_tile(side) else {
                        warn!(
                            "block {:?} has no tile for {:?}, skipping face",
                            block_type.name, side
                        );
                        continue;
                    };
                    scratch.emit_quad(side, x, y, z, 1, 1, atlas.uvs_for(tile), origin);
                }
            }
        }
    }
}
