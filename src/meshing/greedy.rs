//! Greedy meshing.
//!
//! Sweeps a plane along each principal axis and builds a 2D mask of the
//! face crossings at every plane position: a mask cell is occupied when
//! solidity differs between the two cells the plane separates and the solid
//! cell belongs to the chunk being meshed (a face owned by a neighbor chunk
//! is that chunk's to emit). Occupied cells then merge into maximal
//! rectangles of equal block id and orientation, each emitted as a single
//! quad whose UVs repeat the atlas tile across the merged run.
//!
//! The width/height of a merged rectangle land on fixed world axes per
//! sweep: X-axis faces tile width along Z and height along Y, Y-axis faces
//! width along Z and height along X, Z-axis faces width along X and height
//! along Y. The per-axis tables below encode that mapping; it mirrors the
//! corner bases in `MeshScratch::emit_quad`.

use log::warn;

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::registry::BlockRegistry;
use crate::voxels::block::BlockId;
use crate::voxels::chunk::{Chunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

use super::{MeshScratch, TextureAtlas};

/// One occupied mask cell: which block id produced the face and whether the
/// face looks down the sweep axis (`flipped`) instead of up it. Cells merge
/// only when both match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MaskCell {
    id: BlockId,
    flipped: bool,
}

/// Sweep setup per principal axis: the swept axis, the two free axes the
/// mask spans (`u` carries quad width, `v` quad height), and the sides
/// emitted for faces pointing up/down the swept axis.
struct Sweep {
    axis: usize,
    u_axis: usize,
    v_axis: usize,
    pos_side: BlockSide,
    neg_side: BlockSide,
}

const SWEEPS: [Sweep; 3] = [
    Sweep {
        axis: 0,
        u_axis: 2,
        v_axis: 1,
        pos_side: BlockSide::BACK,
        neg_side: BlockSide::FRONT,
    },
    Sweep {
        axis: 1,
        u_axis: 2,
        v_axis: 0,
        pos_side: BlockSide::TOP,
        neg_side: BlockSide::BOTTOM,
    },
    Sweep {
        axis: 2,
        u_axis: 0,
        v_axis: 1,
        pos_side: BlockSide::RIGHT,
        neg_side: BlockSide::LEFT,
    },
];

const DIMS: [i32; 3] = [
    CHUNK_WIDTH as i32,
    CHUNK_HEIGHT as i32,
    CHUNK_DEPTH as i32,
];

pub(crate) fn build(
    scratch: &mut MeshScratch,
    chunk: &Chunk,
    registry: &BlockRegistry,
    atlas: &TextureAtlas,
) {
    let origin = chunk.world_origin();

    for sweep in &SWEEPS {
        let depth = DIMS[sweep.axis];
        let u_len = DIMS[sweep.u_axis];
        let v_len = DIMS[sweep.v_axis];
        let mut mask: Vec<Option<MaskCell>> = vec![None; (u_len * v_len) as usize];

        for plane in 0..=depth {
            build_mask(&mut mask, scratch, chunk, registry, sweep, plane);
            merge_and_emit(&mut mask, scratch, registry, atlas, sweep, plane, origin);
        }
    }
}

/// Fills the mask for one plane position. `plane` separates the cell at
/// `plane - 1` (near) from the cell at `plane` (far) along the sweep axis.
fn build_mask(
    mask: &mut [Option<MaskCell>],
    scratch: &MeshScratch,
    chunk: &Chunk,
    registry: &BlockRegistry,
    sweep: &Sweep,
    plane: i32,
) {
    let depth = DIMS[sweep.axis];
    let u_len = DIMS[sweep.u_axis];
    let v_len = DIMS[sweep.v_axis];

    for v in 0..v_len {
        for u in 0..u_len {
            let mut cell = [0i32; 3];
            cell[sweep.u_axis] = u;
            cell[sweep.v_axis] = v;

            cell[sweep.axis] = plane - 1;
            let near_solid = scratch.solid(cell[0], cell[1], cell[2]);
            cell[sweep.axis] = plane;
            let far_solid = scratch.solid(cell[0], cell[1], cell[2]);

            mask[(u + u_len * v) as usize] = if near_solid == far_solid {
                None
            } else if near_solid && plane >= 1 {
                cell[sweep.axis] = plane - 1;
                Some(MaskCell {
                    id: chunk.get(cell[0], cell[1], cell[2]),
                    flipped: false,
                })
            } else if far_solid && plane < depth {
                Some(MaskCell {
                    id: chunk.get(cell[0], cell[1], cell[2]),
                    flipped: true,
                })
            } else {
                // The solid cell lies outside this chunk; its own mesh
                // carries the face.
                None
            };

            // Non-solid ids in the mask would mean the mask and the
            // registry disagree; resolve by dropping the face.
            if let Some(MaskCell { id, .. }) = mask[(u + u_len * v) as usize] {
                if !registry.is_solid(id) {
                    mask[(u + u_len * v) as usize] = None;
                }
            }
        }
    }
}

/// Consumes the mask, growing each occupied cell into the widest then
/// tallest rectangle of identical cells, and emits one quad per rectangle.
#[allow(clippy::too_many_arguments)]
fn merge_and_emit(
    mask: &mut [Option<MaskCell>],
    scratch: &mut MeshScratch,
    registry: &BlockRegistry,
    atlas: &TextureAtlas,
    sweep: &Sweep,
    plane: i32,
    origin: cgmath::Point2<i32>,
) {
    let u_len = DIMS[sweep.u_axis];
    let v_len = DIMS[sweep.v_axis];

    for v in 0..v_len {
        let mut u = 0;
        while u < u_len {
            let Some(cell) = mask[(u + u_len * v) as usize] else {
                u += 1;
                continue;
            };

            let mut w = 1;
            while u + w < u_len && mask[(u + w + u_len * v) as usize] == Some(cell) {
                w += 1;
            }

            let mut h = 1;
            'grow: while v + h < v_len {
                for du in 0..w {
                    if mask[(u + du + u_len * (v + h)) as usize] != Some(cell) {
                        break 'grow;
                    }
                }
                h += 1;
            }

            let mut anchor = [0i32; 3];
            anchor[sweep.axis] = if cell.flipped { plane } else { plane - 1 };
            anchor[sweep.u_axis] = u;
            anchor[sweep.v_axis] = v;
            let side = if cell.flipped {
                sweep.neg_side
            } else {
                sweep.pos_side
            };

            let block_type = registry.by_id(cell.id);
            match block_type.face_tile(side) {
                Some(tile) => scratch.emit_quad(
                    side,
                    anchor[0],
                    anchor[1],
                    anchor[2],
                    w,
                    h,
                    atlas.tiled_uvs_for(tile, w as u32, h as u32),
                    origin,
                ),
                None => warn!(
                    "block {:?} has no tile for {:?}, skipping merged face",
                    block_type.name, side
                ),
            }

            for dv in 0..h {
                for du in 0..w {
                    mask[(u + du + u_len * (v + dv)) as usize] = None;
                }
            }
            u += w;
        }
    }
}
