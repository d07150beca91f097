//! # Meshing Module
//!
//! Turns a chunk of block ids into vertex/index/UV buffers. Two algorithms
//! satisfy the same contract:
//!
//! * [`MeshAlgorithm::Culled`] emits one quad per exposed block face.
//! * [`MeshAlgorithm::Greedy`] merges coplanar same-type runs into larger
//!   quads, covering exactly the same exposed surface with fewer triangles.
//!
//! Both read neighboring chunks through a [`ChunkSource`] so faces on chunk
//! edges cull correctly against loaded neighbors; a missing neighbor is
//! treated as air, so the edge renders as if exposed until the neighbor
//! loads and the chunk is remeshed.
//!
//! ## Solidity mask
//!
//! Every build first rasterizes solidity into a bit vector padded by one
//! layer on each side, so the inner loops test neighbors with a single
//! indexed read instead of branching between local and cross-chunk access.
//! The pad below the world floor is solid (no faces on the underside of the
//! world) and the pad above the ceiling is air.

use std::collections::HashMap;

use bitvec::prelude::BitVec;
use cgmath::{Point2, Point3};

use crate::error::EngineError;
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::registry::BlockRegistry;
use crate::voxels::chunk::{Chunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

pub mod atlas;
mod culled;
mod greedy;

pub use atlas::{TextureAtlas, TileUvs};

const PAD_WIDTH: usize = CHUNK_WIDTH + 2;
const PAD_DEPTH: usize = CHUNK_DEPTH + 2;
const PAD_HEIGHT: usize = CHUNK_HEIGHT + 2;
const PAD_VOLUME: usize = PAD_WIDTH * PAD_DEPTH * PAD_HEIGHT;

/// Read access to loaded chunks by chunk coordinate, used by the meshers to
/// sample blocks across chunk borders. The world scheduler's chunk map is
/// the production implementation; tests stub it with `()` (nothing loaded)
/// or a plain `HashMap`.
pub trait ChunkSource {
    /// The chunk at the given chunk coordinates, if loaded.
    fn chunk_at(&self, position: Point2<i32>) -> Option<&Chunk>;
}

impl ChunkSource for HashMap<Point2<i32>, Chunk> {
    fn chunk_at(&self, position: Point2<i32>) -> Option<&Chunk> {
        self.get(&position)
    }
}

/// The empty source: no neighbors are ever loaded.
impl ChunkSource for () {
    fn chunk_at(&self, _position: Point2<i32>) -> Option<&Chunk> {
        None
    }
}

/// One interleaved vertex as a render sink would upload it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Normalized atlas coordinates.
    pub uv: [f32; 2],
}

/// The geometry produced by one mesh build.
///
/// A fresh output fully replaces any previous mesh for the chunk; it
/// carries no identity beyond the chunk coordinate it was built for.
#[derive(Debug, Clone)]
pub struct MeshOutput {
    /// The chunk this mesh was built for.
    pub chunk_position: Point2<i32>,
    /// Quad corner positions in world space, four per quad.
    pub vertices: Vec<Point3<f32>>,
    /// One atlas coordinate per vertex.
    pub uvs: Vec<Point2<f32>>,
    /// Triangle list, six indices per quad.
    pub indices: Vec<u32>,
}

impl MeshOutput {
    /// Checks the structural invariants every consumer relies on. A
    /// violating mesh must be discarded, never uploaded.
    pub fn validate(&self) -> Result<(), EngineError> {
        let fail = |detail: String| EngineError::BuildInvariant {
            chunk_x: self.chunk_position.x,
            chunk_z: self.chunk_position.y,
            detail,
        };
        if self.vertices.len() != self.uvs.len() {
            return Err(fail(format!(
                "{} vertices but {} uvs",
                self.vertices.len(),
                self.uvs.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(fail(format!(
                "{} indices is not a whole number of triangles",
                self.indices.len()
            )));
        }
        if let Some(&max) = self.indices.iter().max() {
            if max as usize >= self.vertices.len() {
                return Err(fail(format!(
                    "index {} out of range for {} vertices",
                    max,
                    self.vertices.len()
                )));
            }
        }
        Ok(())
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the build produced no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Zips positions and UVs into the interleaved layout sinks upload.
    /// The result casts to bytes via `bytemuck` without copying.
    pub fn interleave(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .zip(self.uvs.iter())
            .map(|(p, uv)| Vertex {
                position: [p.x, p.y, p.z],
                uv: [uv.x, uv.y],
            })
            .collect()
    }
}

/// Reusable working memory for mesh builds.
///
/// The buffers grow to the high-water mark of the worst chunk and stay
/// allocated across builds; callers only ever see the owned snapshot taken
/// at the end of a build.
pub(crate) struct MeshScratch {
    vertices: Vec<Point3<f32>>,
    uvs: Vec<Point2<f32>>,
    indices: Vec<u32>,
    solid: BitVec,
}

impl MeshScratch {
    fn new() -> Self {
        MeshScratch {
            vertices: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            solid: BitVec::repeat(false, PAD_VOLUME),
        }
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        self.indices.clear();
        self.solid.clear();
        self.solid.resize(PAD_VOLUME, false);
    }

    fn mask_index(x: i32, y: i32, z: i32) -> usize {
        (x + 1) as usize + PAD_WIDTH * ((z + 1) as usize + PAD_DEPTH * (y + 1) as usize)
    }

    /// Solidity of a cell in local coordinates, valid one step beyond the
    /// chunk bounds in every direction.
    pub(crate) fn solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.solid[Self::mask_index(x, y, z)]
    }

    /// Rasterizes the chunk and the adjacent layer of its four horizontal
    /// neighbors into the padded solidity mask.
    fn build_solid_mask(
        &mut self,
        chunk: &Chunk,
        neighbors: &dyn ChunkSource,
        registry: &BlockRegistry,
    ) {
        let (w, h, d) = (
            CHUNK_WIDTH as i32,
            CHUNK_HEIGHT as i32,
            CHUNK_DEPTH as i32,
        );

        for y in 0..h {
            for z in 0..d {
                for x in 0..w {
                    if registry.is_solid(chunk.get(x, y, z)) {
                        self.solid.set(Self::mask_index(x, y, z), true);
                    }
                }
            }
        }

        // Below the world floor counts as solid so the underside of the
        // world emits no faces; above the ceiling stays air.
        for z in -1..=d {
            for x in -1..=w {
                self.solid.set(Self::mask_index(x, -1, z), true);
            }
        }

        let position = chunk.position();
        let mut sample_edge = |neighbor: Point2<i32>, dest_x: Option<i32>, dest_z: Option<i32>| {
            let Some(neighbor) = neighbors.chunk_at(neighbor) else {
                return;
            };
            for y in 0..h {
                match (dest_x, dest_z) {
                    (Some(x), None) => {
                        let src_x = if x < 0 { w - 1 } else { 0 };
                        for z in 0..d {
                            if registry.is_solid(neighbor.get(src_x, y, z)) {
                                self.solid.set(Self::mask_index(x, y, z), true);
                            }
                        }
                    }
                    (None, Some(z)) => {
                        let src_z = if z < 0 { d - 1 } else { 0 };
                        for x in 0..w {
                            if registry.is_solid(neighbor.get(x, y, src_z)) {
                                self.solid.set(Self::mask_index(x, y, z), true);
                            }
                        }
                    }
                    _ => unreachable!("edge sampling is one axis at a time"),
                }
            }
        };

        sample_edge(Point2::new(position.x - 1, position.y), Some(-1), None);
        sample_edge(Point2::new(position.x + 1, position.y), Some(w), None);
        sample_edge(Point2::new(position.x, position.y - 1), None, Some(-1));
        sample_edge(Point2::new(position.x, position.y + 1), None, Some(d));
    }

    /// Appends one quad: four corners, four UVs, two triangles.
    ///
    /// `(i, j, k)` is the lowest covered cell; `w` extends along the face's
    /// horizontal texture axis and `h` along its vertical one (Z/Y for X
    /// faces, Z/X for Y faces, X/Y for Z faces). The corner order and the
    /// `(0,1,3),(0,3,2)` winding keep every face counter-clockwise seen
    /// from outside the solid block.
    pub(crate) fn emit_quad(
        &mut self,
        side: BlockSide,
        i: i32,
        j: i32,
        k: i32,
        quad_w: i32,
        quad_h: i32,
        uvs: TileUvs,
        origin: Point2<i32>,
    ) {
        let (w, h) = (quad_w, quad_h);
        // Corners in order lower-left, lower-right, upper-left, upper-right
        // of the face's own basis.
        let corners: [[i32; 3]; 4] = match side {
            BlockSide::FRONT => [
                [i, j, k],
                [i, j, k + w],
                [i, j + h, k],
                [i, j + h, k + w],
            ],
            BlockSide::BACK => [
                [i + 1, j, k + w],
                [i + 1, j, k],
                [i + 1, j + h, k + w],
                [i + 1, j + h, k],
            ],
            BlockSide::BOTTOM => [
                [i, j, k + w],
                [i, j, k],
                [i + h, j, k + w],
                [i + h, j, k],
            ],
            BlockSide::TOP => [
                [i, j + 1, k],
                [i, j + 1, k + w],
                [i + h, j + 1, k],
                [i + h, j + 1, k + w],
            ],
            BlockSide::LEFT => [
                [i + w, j, k],
                [i, j, k],
                [i + w, j + h, k],
                [i, j + h, k],
            ],
            BlockSide::RIGHT => [
                [i, j, k + 1],
                [i + w, j, k + 1],
                [i, j + h, k + 1],
                [i + w, j + h, k + 1],
            ],
        };

        let base = self.vertices.len() as u32;
        for corner in corners {
            self.vertices.push(Point3::new(
                (origin.x + corner[0]) as f32,
                corner[1] as f32,
                (origin.y + corner[2]) as f32,
            ));
        }
        let [bl, tl, tr, br] = uvs;
        self.uvs.push(bl);
        self.uvs.push(br);
        self.uvs.push(tl);
        self.uvs.push(tr);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 3, base, base + 3, base + 2]);
    }

    fn snapshot(&self, chunk_position: Point2<i32>) -> MeshOutput {
        MeshOutput {
            chunk_position,
            vertices: self.vertices.clone(),
            uvs: self.uvs.clone(),
            indices: self.indices.clone(),
        }
    }
}

/// Which meshing algorithm a [`Mesher`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshAlgorithm {
    /// One quad per exposed block face.
    Culled,
    /// Coplanar same-type faces merged into maximal rectangles.
    Greedy,
}

/// Builds chunk meshes, owning the scratch buffers reused across builds.
pub struct Mesher {
    algorithm: MeshAlgorithm,
    scratch: MeshScratch,
}

impl Mesher {
    /// Creates a mesher running the given algorithm.
    pub fn new(algorithm: MeshAlgorithm) -> Self {
        Mesher {
            algorithm,
            scratch: MeshScratch::new(),
        }
    }

    /// The algorithm this mesher runs.
    pub fn algorithm(&self) -> MeshAlgorithm {
        self.algorithm
    }

    /// Builds the mesh for one chunk.
    ///
    /// Neighbor chunks are read through `neighbors` for edge culling; a
    /// missing neighbor counts as air. The output is checked against the
    /// mesh invariants before it is returned; a violation discards the
    /// build and surfaces as `EngineError::BuildInvariant`.
    pub fn build(
        &mut self,
        chunk: &Chunk,
        neighbors: &dyn ChunkSource,
        registry: &BlockRegistry,
        atlas: &TextureAtlas,
    ) -> Result<MeshOutput, EngineError> {
        self.scratch.clear();
        self.scratch.build_solid_mask(chunk, neighbors, registry);
        match self.algorithm {
            MeshAlgorithm::Culled => culled::build(&mut self.scratch, chunk, registry, atlas),
            MeshAlgorithm::Greedy => greedy::build(&mut self.scratch, chunk, registry, atlas),
        }
        let output = self.scratch.snapshot(chunk.position());
        output.validate()?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_vertex_uv_mismatch() {
        let output = MeshOutput {
            chunk_position: Point2::new(0, 0),
            vertices: vec![Point3::new(0.0, 0.0, 0.0)],
            uvs: Vec::new(),
            indices: Vec::new(),
        };
        assert!(output.validate().is_err());
    }

    #[test]
    fn validate_rejects_partial_triangles_and_bad_indices() {
        let mut output = MeshOutput {
            chunk_position: Point2::new(0, 0),
            vertices: vec![Point3::new(0.0, 0.0, 0.0); 3],
            uvs: vec![Point2::new(0.0, 0.0); 3],
            indices: vec![0, 1],
        };
        assert!(output.validate().is_err());
        output.indices = vec![0, 1, 3];
        assert!(output.validate().is_err());
        output.indices = vec![0, 1, 2];
        assert!(output.validate().is_ok());
    }

    #[test]
    fn emit_quad_appends_consistent_buffers() {
        let mut scratch = MeshScratch::new();
        let uvs = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        scratch.emit_quad(BlockSide::TOP, 0, 0, 0, 1, 1, uvs, Point2::new(0, 0));
        scratch.emit_quad(BlockSide::FRONT, 3, 4, 5, 2, 3, uvs, Point2::new(16, 0));
        assert_eq!(scratch.vertices.len(), 8);
        assert_eq!(scratch.uvs.len(), 8);
        assert_eq!(scratch.indices.len(), 12);
        // Second quad indexes only its own vertices.
        assert!(scratch.indices[6..].iter().all(|&i| (4..8).contains(&i)));
        let output = scratch.snapshot(Point2::new(0, 0));
        assert!(output.validate().is_ok());
        assert_eq!(output.triangle_count(), 4);
    }

    #[test]
    fn interleave_pairs_positions_with_uvs() {
        let mut scratch = MeshScratch::new();
        let uvs = [
            Point2::new(0.0, 0.5),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.5, 0.5),
        ];
        scratch.emit_quad(BlockSide::RIGHT, 0, 0, 0, 1, 1, uvs, Point2::new(0, 0));
        let output = scratch.snapshot(Point2::new(0, 0));
        let interleaved = output.interleave();
        assert_eq!(interleaved.len(), 4);
        assert_eq!(interleaved[0].uv, [0.0, 0.5]);
        let bytes: &[u8] = bytemuck::cast_slice(&interleaved);
        assert_eq!(bytes.len(), interleaved.len() * std::mem::size_of::<Vertex>());
    }
}
