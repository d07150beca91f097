//! # Block Side Module
//!
//! The six faces of a voxel block. Variant values index per-side tables in
//! the meshers, so the discriminants are fixed.

use cgmath::Vector3;

/// One face of a block.
///
/// The engine uses a Y-up coordinate system; FRONT/BACK span the X axis and
/// LEFT/RIGHT the Z axis.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The low-X face, facing -X.
    FRONT = 0,

    /// The high-X face, facing +X.
    BACK = 1,

    /// The low-Y face, facing -Y.
    BOTTOM = 2,

    /// The high-Y face, facing +Y.
    TOP = 3,

    /// The low-Z face, facing -Z.
    LEFT = 4,

    /// The high-Z face, facing +Z.
    RIGHT = 5,
}

impl BlockSide {
    /// All six faces, in discriminant order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Unit offset from a block to the neighbor this face looks at.
    pub fn offset(&self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(-1, 0, 0),
            BlockSide::BACK => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(0, 0, 1),
        }
    }
}
