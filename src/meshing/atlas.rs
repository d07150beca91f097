//! # Texture Atlas Mapper
//!
//! Converts integer tile coordinates on a shared texture sheet into
//! normalized UV rectangles. The atlas image origin is its top-left corner
//! while UV space has its origin at the bottom-left, so the V axis is
//! inverted when mapping a tile row into UV space.

use cgmath::Point2;
use log::error;

/// The four UV corners of one tile, in the fixed order bottom-left,
/// top-left, top-right, bottom-right.
pub type TileUvs = [Point2<f32>; 4];

/// Maps tile coordinates on a fixed-size texture sheet to UV rectangles.
///
/// The mapper is a plain value: every lookup returns an independent set of
/// corners, so concurrent mesh builds can share one instance freely.
#[derive(Debug, Clone, Copy)]
pub struct TextureAtlas {
    tiles_x: u32,
    tiles_y: u32,
    tile_u: f32,
    tile_v: f32,
}

impl TextureAtlas {
    /// Creates a mapper for a sheet of `width x height` pixels cut into
    /// square tiles of `tile_size` pixels.
    ///
    /// Fails if any dimension is zero or the sheet is smaller than a single
    /// tile.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Result<Self, crate::EngineError> {
        if width == 0 || height == 0 || tile_size == 0 {
            return Err(crate::EngineError::Atlas(format!(
                "zero dimension: {}x{} with {}px tiles",
                width, height, tile_size
            )));
        }
        let tiles_x = width / tile_size;
        let tiles_y = height / tile_size;
        if tiles_x == 0 || tiles_y == 0 {
            return Err(crate::EngineError::Atlas(format!(
                "tile size {}px does not fit in a {}x{} sheet",
                tile_size, width, height
            )));
        }
        Ok(TextureAtlas {
            tiles_x,
            tiles_y,
            tile_u: 1.0 / tiles_x as f32,
            tile_v: 1.0 / tiles_y as f32,
        })
    }

    /// Number of tile columns in the sheet.
    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    /// Number of tile rows in the sheet.
    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// Returns the UV corners of one tile.
    ///
    /// A tile outside the sheet is a configuration bug in the block palette;
    /// the lookup reports it and returns a zeroed set so the build can
    /// continue without that texture.
    pub fn uvs_for(&self, tile: Point2<u32>) -> TileUvs {
        self.tiled_uvs_for(tile, 1, 1)
    }

    /// Returns the UV corners of a tile stretched to repeat `w` times along
    /// U and `h` times along V, for quads that cover a merged run of blocks.
    /// The renderer wrap-samples within the tile, so corners past the tile
    /// edge encode the repeat count rather than neighboring tiles.
    pub fn tiled_uvs_for(&self, tile: Point2<u32>, w: u32, h: u32) -> TileUvs {
        if tile.x >= self.tiles_x || tile.y >= self.tiles_y {
            error!(
                "atlas tile ({}, {}) outside {}x{} sheet",
                tile.x, tile.y, self.tiles_x, self.tiles_y
            );
            return [Point2::new(0.0, 0.0); 4];
        }
        let u0 = tile.x as f32 * self.tile_u;
        // Tile rows count down from the top of the image; UV rows count up.
        let v0 = 1.0 - (tile.y + 1) as f32 * self.tile_v;
        let u1 = u0 + w as f32 * self.tile_u;
        let v1 = v0 + h as f32 * self.tile_v;
        [
            Point2::new(u0, v0),
            Point2::new(u0, v1),
            Point2::new(u1, v1),
            Point2::new(u1, v0),
        ]
    }
}
