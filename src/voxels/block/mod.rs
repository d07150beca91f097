//! # Block Module
//!
//! Block identifiers and the static per-type properties the meshers consult.
//! A block in the world is nothing but a [`BlockId`]; everything else (name,
//! solidity, transparency, atlas tiles) lives in the [`registry`] and is
//! looked up on demand.

use cgmath::Point2;

use block_side::BlockSide;

pub mod block_side;
pub mod registry;

/// The integer type blocks are stored as. Id 0 is reserved for air.
pub type BlockId = u8;

/// The id of the empty/air block.
pub const AIR: BlockId = 0;

/// Static properties of one block type.
///
/// The per-face texture resolves as override-if-present-else-side for the
/// top and bottom; side faces always use `side_tile`. A solid type with no
/// `side_tile` is a palette mistake: its faces are skipped (with a warning)
/// rather than failing a whole build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockType {
    /// The id chunks store for this type.
    pub id: BlockId,
    /// Human-readable name, unique within a registry.
    pub name: String,
    /// Whether the block occludes adjacent faces and receives geometry.
    pub is_solid: bool,
    /// Whether the block can be seen through.
    pub is_transparent: bool,
    /// Atlas tile used for the four side faces.
    pub side_tile: Option<Point2<u32>>,
    /// Atlas tile for the top face, when it differs from the sides.
    pub top_tile: Option<Point2<u32>>,
    /// Atlas tile for the bottom face, when it differs from the sides.
    pub bottom_tile: Option<Point2<u32>>,
}

impl BlockType {
    /// Resolves the atlas tile for one face of this type.
    pub fn face_tile(&self, side: BlockSide) -> Option<Point2<u32>> {
        match side {
            BlockSide::TOP => self.top_tile.or(self.side_tile),
            BlockSide::BOTTOM => self.bottom_tile.or(self.side_tile),
            _ => self.side_tile,
        }
    }

    /// The canonical air type: non-solid, fully transparent, untextured.
    pub fn air() -> Self {
        BlockType {
            id: AIR,
            name: "air".to_string(),
            is_solid: false,
            is_transparent: true,
            side_tile: None,
            top_tile: None,
            bottom_tile: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_faces_ignore_overrides() {
        let grass = BlockType {
            id: 3,
            name: "grass".to_string(),
            is_solid: true,
            is_transparent: false,
            side_tile: Some(Point2::new(3, 0)),
            top_tile: Some(Point2::new(0, 1)),
            bottom_tile: Some(Point2::new(2, 0)),
        };
        assert_eq!(grass.face_tile(BlockSide::TOP), Some(Point2::new(0, 1)));
        assert_eq!(grass.face_tile(BlockSide::BOTTOM), Some(Point2::new(2, 0)));
        for side in [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ] {
            assert_eq!(grass.face_tile(side), Some(Point2::new(3, 0)));
        }
    }

    #[test]
    fn missing_overrides_fall_back_to_side_tile() {
        let stone = BlockType {
            id: 1,
            name: "stone".to_string(),
            is_solid: true,
            is_transparent: false,
            side_tile: Some(Point2::new(1, 0)),
            top_tile: None,
            bottom_tile: None,
        };
        assert_eq!(stone.face_tile(BlockSide::TOP), Some(Point2::new(1, 0)));
        assert_eq!(stone.face_tile(BlockSide::BOTTOM), Some(Point2::new(1, 0)));
    }
}
