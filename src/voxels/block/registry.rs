//! # Block Type Registry
//!
//! Maps block ids and names to their static [`BlockType`] records. The
//! registry is built once during engine setup from a list of types and is
//! read-only afterwards; it is passed by reference to whoever needs lookups
//! rather than living in a global.
//!
//! Lookup misses never abort anything: an unknown id or name resolves to the
//! air type with a logged warning, so a chunk containing a stale id still
//! meshes (minus the unknown blocks) instead of taking the engine down.

use std::collections::HashMap;

use cgmath::Point2;
use log::{error, warn};
use num_derive::FromPrimitive;

use super::{BlockId, BlockType, AIR};
use crate::error::EngineError;

/// Names for the builtin block ids, convertible from the raw integers the
/// terrain generator writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockKind {
    /// Empty space.
    AIR,
    /// Base terrain filler.
    STONE,
    /// Subsurface layer under grass.
    DIRT,
    /// Surface block with distinct top and bottom textures.
    GRASS,
    /// Shoreline and beach surface.
    SAND,
    /// Tree trunk, end-grain on top and bottom.
    WOOD,
    /// Tree canopy, see-through.
    LEAVES,
    /// Still water below sea level.
    WATER,
}

impl BlockKind {
    /// The raw id stored in chunks for this kind.
    pub fn id(self) -> BlockId {
        self as BlockId
    }

    /// Converts a raw id back to a builtin kind, if it is one.
    pub fn from_id(id: BlockId) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }
}

/// Id- and name-keyed lookup over immutable block type records.
pub struct BlockRegistry {
    types: Vec<BlockType>,
    by_id: HashMap<BlockId, usize>,
    by_name: HashMap<String, usize>,
    air: usize,
}

impl BlockRegistry {
    /// Builds a registry from a list of types.
    ///
    /// Duplicate ids or names are construction errors: they are reported and
    /// the later entry is skipped, first occurrence wins. A list without an
    /// id-0 air type cannot produce a usable registry and fails outright.
    pub fn new(types: Vec<BlockType>) -> Result<Self, EngineError> {
        let mut registry = BlockRegistry {
            types: Vec::with_capacity(types.len()),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            air: 0,
        };

        for block_type in types {
            if registry.by_id.contains_key(&block_type.id) {
                error!(
                    "duplicate block id {} ({:?}), keeping first registration",
                    block_type.id, block_type.name
                );
                continue;
            }
            if registry.by_name.contains_key(&block_type.name) {
                error!(
                    "duplicate block name {:?} (id {}), keeping first registration",
                    block_type.name, block_type.id
                );
                continue;
            }
            let index = registry.types.len();
            registry.by_id.insert(block_type.id, index);
            registry.by_name.insert(block_type.name.clone(), index);
            registry.types.push(block_type);
        }

        match registry.by_id.get(&AIR) {
            Some(&index) => registry.air = index,
            None => {
                return Err(EngineError::Registry(
                    "no air type registered for id 0".to_string(),
                ))
            }
        }
        if registry.types[registry.air].is_solid || !registry.types[registry.air].is_transparent {
            return Err(EngineError::Registry(
                "id 0 must be non-solid and transparent".to_string(),
            ));
        }

        Ok(registry)
    }

    /// Builds the stock palette used by the bundled terrain generator.
    ///
    /// Tiles address a 4x4 sheet; solid kinds each get a tile, grass and
    /// wood carry top/bottom overrides.
    pub fn builtin() -> Self {
        let tile = |x, y| Some(Point2::new(x, y));
        let types = vec![
            BlockType::air(),
            BlockType {
                id: BlockKind::STONE.id(),
                name: "stone".to_string(),
                is_solid: true,
                is_transparent: false,
                side_tile: tile(1, 0),
                top_tile: None,
                bottom_tile: None,
            },
            BlockType {
                id: BlockKind::DIRT.id(),
                name: "dirt".to_string(),
                is_solid: true,
                is_transparent: false,
                side_tile: tile(2, 0),
                top_tile: None,
                bottom_tile: None,
            },
            BlockType {
                id: BlockKind::GRASS.id(),
                name: "grass".to_string(),
                is_solid: true,
                is_transparent: false,
                side_tile: tile(3, 0),
                top_tile: tile(0, 1),
                bottom_tile: tile(2, 0),
            },
            BlockType {
                id: BlockKind::SAND.id(),
                name: "sand".to_string(),
                is_solid: true,
                is_transparent: false,
                side_tile: tile(1, 1),
                top_tile: None,
                bottom_tile: None,
            },
            BlockType {
                id: BlockKind::WOOD.id(),
                name: "wood".to_string(),
                is_solid: true,
                is_transparent: false,
                side_tile: tile(2, 1),
                top_tile: tile(3, 1),
                bottom_tile: tile(3, 1),
            },
            BlockType {
                id: BlockKind::LEAVES.id(),
                name: "leaves".to_string(),
                is_solid: false,
                is_transparent: true,
                side_tile: tile(0, 2),
                top_tile: None,
                bottom_tile: None,
            },
            BlockType {
                id: BlockKind::WATER.id(),
                name: "water".to_string(),
                is_solid: false,
                is_transparent: true,
                side_tile: tile(1, 2),
                top_tile: None,
                bottom_tile: None,
            },
        ];
        // The builtin list is duplicate-free and contains air, so this
        // cannot fail.
        Self::new(types).expect("builtin palette is well-formed")
    }

    /// Looks up a type by id. Unknown ids resolve to air with a warning.
    pub fn by_id(&self, id: BlockId) -> &BlockType {
        match self.by_id.get(&id) {
            Some(&index) => &self.types[index],
            None => {
                warn!("unknown block id {}, treating as air", id);
                &self.types[self.air]
            }
        }
    }

    /// Looks up a type by name. Unknown names are caller bugs and resolve
    /// to air.
    pub fn by_name(&self, name: &str) -> &BlockType {
        match self.by_name.get(name) {
            Some(&index) => &self.types[index],
            None => {
                error!("unknown block name {:?}, treating as air", name);
                &self.types[self.air]
            }
        }
    }

    /// Whether the block with this id occludes and receives faces.
    pub fn is_solid(&self, id: BlockId) -> bool {
        // The hot path for mesh builds: registered ids skip the warning.
        match self.by_id.get(&id) {
            Some(&index) => self.types[index].is_solid,
            None => {
                warn!("unknown block id {}, treating as air", id);
                false
            }
        }
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry holds only the implicit air type or less.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
