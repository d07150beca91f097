//! # Voxels Module
//!
//! Everything that stores or produces block data: block ids and their
//! registered types, the dense chunk store, terrain generation, and the
//! world scheduler that streams chunks around the viewer.

pub mod block;
pub mod chunk;
pub mod terrain;
pub mod world;
