//! # Chunk Module
//!
//! The `Chunk` struct: a dense 16x256x16 array of block ids, the unit of
//! loading and meshing. Chunks are identified by 2D coordinates in the XZ
//! plane; the Y axis is world-absolute and never chunked.
//!
//! A chunk is created all-air, filled once by a terrain generator, and
//! mutated in place by block edits afterwards. It is owned exclusively by
//! the world scheduler's chunk map and dropped when the scheduler evicts it.

use cgmath::Point2;
use log::error;

use super::block::{BlockId, AIR};

/// Blocks along the X axis of a chunk.
pub const CHUNK_WIDTH: usize = 16;
/// Blocks along the Y axis of a chunk (the full world height).
pub const CHUNK_HEIGHT: usize = 256;
/// Blocks along the Z axis of a chunk.
pub const CHUNK_DEPTH: usize = 16;
/// Blocks in one horizontal XZ layer.
pub const CHUNK_LAYER: usize = CHUNK_WIDTH * CHUNK_DEPTH;
/// Total blocks in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_LAYER * CHUNK_HEIGHT;

/// A 16x256x16 column of block ids.
pub struct Chunk {
    /// Position in chunk coordinates (world X / 16, world Z / 16).
    position: Point2<i32>,
    /// Dense storage, X fastest, then Z, then Y.
    blocks: Box<[BlockId]>,
}

impl Chunk {
    /// Creates an all-air chunk at the given chunk coordinates.
    pub fn new(position: Point2<i32>) -> Self {
        Chunk {
            position,
            blocks: vec![AIR; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// This chunk's position in chunk coordinates.
    pub fn position(&self) -> Point2<i32> {
        self.position
    }

    /// World-space block coordinates of this chunk's (0, y, 0) corner.
    pub fn world_origin(&self) -> Point2<i32> {
        Point2::new(
            self.position.x * CHUNK_WIDTH as i32,
            self.position.y * CHUNK_DEPTH as i32,
        )
    }

    /// Whether chunk-local coordinates fall inside the fixed dimensions.
    ///
    /// Callers working at chunk edges branch on this and route the
    /// out-of-range side through neighbor lookup instead of `get`/`set`.
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && (x as usize) < CHUNK_WIDTH
            && y >= 0
            && (y as usize) < CHUNK_HEIGHT
            && z >= 0
            && (z as usize) < CHUNK_DEPTH
    }

    fn index(x: i32, y: i32, z: i32) -> usize {
        x as usize + CHUNK_WIDTH * (z as usize + CHUNK_DEPTH * y as usize)
    }

    /// Reads the block at chunk-local coordinates.
    ///
    /// An out-of-range read is a caller bug: it is reported and resolves to
    /// air rather than panicking.
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockId {
        if !Self::in_bounds(x, y, z) {
            error!(
                "chunk {:?}: read outside bounds at ({}, {}, {})",
                self.position, x, y, z
            );
            return AIR;
        }
        self.blocks[Self::index(x, y, z)]
    }

    /// Writes the block at chunk-local coordinates.
    ///
    /// An out-of-range write is a caller bug: it is reported and dropped.
    pub fn set(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if !Self::in_bounds(x, y, z) {
            error!(
                "chunk {:?}: write outside bounds at ({}, {}, {})",
                self.position, x, y, z
            );
            return;
        }
        self.blocks[Self::index(x, y, z)] = id;
    }

    /// Whether every cell is air.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&id| id == AIR)
    }
}
