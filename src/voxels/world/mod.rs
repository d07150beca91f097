//! # World Module
//!
//! The world scheduler owns every loaded chunk and decides, one step per
//! frame, which chunk to load, unload, or remesh next. It is the single
//! writer of the chunk map and the three work queues; mesh builds read the
//! map through the [`ChunkSource`] capability and write only their own
//! output buffers.
//!
//! ## Lifecycle
//!
//! A chunk coordinate moves through `Unloaded -> queued for load -> Loaded
//! -> queued for unload -> Unloaded`, with a `Loaded -> queued for remesh
//! -> Loaded` self-loop for edits and neighbor changes. The load/unload
//! sets are re-evaluated on the logic tick whenever the viewpoint crosses
//! into a different chunk; the per-frame budget of one queue operation
//! keeps the worst-case frame cost at a single chunk volume scan instead
//! of a whole view ring.

use std::collections::{HashMap, HashSet};

use cgmath::{Point2, Point3};
use log::{debug, error, info};

use crate::error::EngineError;
use crate::meshing::{Mesher, TextureAtlas};
use crate::voxels::block::registry::BlockRegistry;
use crate::voxels::block::BlockId;
use crate::voxels::block::AIR;
use crate::voxels::chunk::{Chunk, CHUNK_DEPTH, CHUNK_WIDTH};
use crate::voxels::terrain::TerrainGenerator;

pub mod clock;
pub mod queue;
pub mod sink;
pub mod spawn;

use queue::WorkQueue;
use sink::MeshSink;

/// What [`WorldScheduler::advance_frame`] spent its budget on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameWork {
    /// A chunk was generated, meshed, and inserted.
    Loaded(Point2<i32>),
    /// A chunk was evicted and its mesh discarded.
    Unloaded(Point2<i32>),
    /// A loaded chunk's mesh was rebuilt.
    Remeshed(Point2<i32>),
    /// No pending work, or the dequeued request was stale.
    Idle,
}

/// Bookkeeping for the geometry currently displayed for a chunk.
#[derive(Debug, Clone, Copy)]
pub struct RenderHandle {
    /// Vertices in the uploaded mesh.
    pub vertices: usize,
    /// Triangles in the uploaded mesh.
    pub triangles: usize,
}

/// Owns chunk data and render bookkeeping, streams chunks around the
/// viewer, and routes edits into remesh work.
pub struct WorldScheduler {
    registry: BlockRegistry,
    atlas: TextureAtlas,
    mesher: Mesher,
    terrain: Box<dyn TerrainGenerator>,
    sink: Box<dyn MeshSink>,
    chunks: HashMap<Point2<i32>, Chunk>,
    render_handles: HashMap<Point2<i32>, RenderHandle>,
    load_queue: WorkQueue,
    unload_queue: WorkQueue,
    remesh_queue: WorkQueue,
    view_distance: i32,
    spawn_chunk: Point2<i32>,
    spawn_position: Option<Point3<f32>>,
    viewer_chunk: Option<Point2<i32>>,
}

impl WorldScheduler {
    /// Assembles a scheduler from its collaborators. The registry, atlas,
    /// and mesher are owned here and passed by reference to builds; nothing
    /// in the engine is a process-wide global.
    pub fn new(
        registry: BlockRegistry,
        atlas: TextureAtlas,
        mesher: Mesher,
        terrain: Box<dyn TerrainGenerator>,
        sink: Box<dyn MeshSink>,
        view_distance: i32,
        spawn_chunk: Point2<i32>,
    ) -> Self {
        WorldScheduler {
            registry,
            atlas,
            mesher,
            terrain,
            sink,
            chunks: HashMap::new(),
            render_handles: HashMap::new(),
            load_queue: WorkQueue::new(),
            unload_queue: WorkQueue::new(),
            remesh_queue: WorkQueue::new(),
            view_distance: view_distance.max(0),
            spawn_chunk,
            spawn_position: None,
            viewer_chunk: None,
        }
    }

    /// Chunk coordinates owning a world-space block column.
    pub fn chunk_coordinate_of(world_x: i32, world_z: i32) -> Point2<i32> {
        Point2::new(
            world_x.div_euclid(CHUNK_WIDTH as i32),
            world_z.div_euclid(CHUNK_DEPTH as i32),
        )
    }

    /// Logic-tick entry point: re-evaluates the load/unload sets when the
    /// viewer has crossed into a different chunk since the last tick.
    pub fn advance_tick(&mut self, viewer_position: Point3<f32>) {
        let viewer_chunk = Self::chunk_coordinate_of(
            viewer_position.x.floor() as i32,
            viewer_position.z.floor() as i32,
        );
        if self.viewer_chunk == Some(viewer_chunk) {
            return;
        }
        self.viewer_chunk = Some(viewer_chunk);
        self.evaluate_view(viewer_chunk);
    }

    /// Frame entry point: executes at most one queued operation, preferring
    /// loads over unloads over remeshes.
    pub fn advance_frame(&mut self) -> FrameWork {
        if let Some(coordinate) = self.load_queue.pop() {
            self.execute_load(coordinate);
            return FrameWork::Loaded(coordinate);
        }
        if let Some(coordinate) = self.unload_queue.pop() {
            self.execute_unload(coordinate);
            return FrameWork::Unloaded(coordinate);
        }
        if let Some(coordinate) = self.remesh_queue.pop() {
            if self.chunks.contains_key(&coordinate) {
                self.rebuild_mesh(coordinate);
                return FrameWork::Remeshed(coordinate);
            }
            // The chunk went away while the request waited; expected, drop it.
            debug!(
                "dropping remesh for unloaded chunk ({}, {})",
                coordinate.x, coordinate.y
            );
        }
        FrameWork::Idle
    }

    /// Applies a block edit at world coordinates.
    ///
    /// Edits to unloaded regions are discarded by design. An edit on a
    /// chunk edge also queues the neighbor sharing that edge, so its mesh
    /// reseals against the changed column.
    pub fn set_block(&mut self, world_position: Point3<i32>, id: BlockId) {
        let coordinate = Self::chunk_coordinate_of(world_position.x, world_position.z);
        let local_x = world_position.x.rem_euclid(CHUNK_WIDTH as i32);
        let local_z = world_position.z.rem_euclid(CHUNK_DEPTH as i32);
        if !Chunk::in_bounds(local_x, world_position.y, local_z) {
            error!(
                "block edit outside world bounds at {:?}",
                world_position
            );
            return;
        }
        let Some(chunk) = self.chunks.get_mut(&coordinate) else {
            debug!(
                "discarding edit at {:?}: chunk ({}, {}) not loaded",
                world_position, coordinate.x, coordinate.y
            );
            return;
        };
        chunk.set(local_x, world_position.y, local_z, id);
        self.remesh_queue.push(coordinate);

        if local_x == 0 {
            self.enqueue_remesh_if_loaded(Point2::new(coordinate.x - 1, coordinate.y));
        }
        if local_x == CHUNK_WIDTH as i32 - 1 {
            self.enqueue_remesh_if_loaded(Point2::new(coordinate.x + 1, coordinate.y));
        }
        if local_z == 0 {
            self.enqueue_remesh_if_loaded(Point2::new(coordinate.x, coordinate.y - 1));
        }
        if local_z == CHUNK_DEPTH as i32 - 1 {
            self.enqueue_remesh_if_loaded(Point2::new(coordinate.x, coordinate.y + 1));
        }
    }

    /// Reads a block at world coordinates; unloaded regions read as air.
    pub fn block_at(&self, world_position: Point3<i32>) -> BlockId {
        let coordinate = Self::chunk_coordinate_of(world_position.x, world_position.z);
        match self.chunks.get(&coordinate) {
            Some(chunk) => chunk.get(
                world_position.x.rem_euclid(CHUNK_WIDTH as i32),
                world_position.y,
                world_position.z.rem_euclid(CHUNK_DEPTH as i32),
            ),
            None => AIR,
        }
    }

    /// Whether a chunk is present in the data map.
    pub fn is_loaded(&self, coordinate: Point2<i32>) -> bool {
        self.chunks.contains_key(&coordinate)
    }

    /// The loaded chunk at a coordinate, if any.
    pub fn chunk(&self, coordinate: Point2<i32>) -> Option<&Chunk> {
        self.chunks.get(&coordinate)
    }

    /// Number of loaded chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Render bookkeeping for a chunk, if its mesh is displayed.
    pub fn render_handle(&self, coordinate: Point2<i32>) -> Option<&RenderHandle> {
        self.render_handles.get(&coordinate)
    }

    /// Pending (load, unload, remesh) queue depths.
    pub fn queue_depths(&self) -> (usize, usize, usize) {
        (
            self.load_queue.len(),
            self.unload_queue.len(),
            self.remesh_queue.len(),
        )
    }

    /// The spawn position resolved at the spawn chunk's first load.
    pub fn spawn_position(&self) -> Option<Point3<f32>> {
        self.spawn_position
    }

    /// Totals over the displayed meshes: (mesh count, triangle count).
    pub fn render_stats(&self) -> (usize, usize) {
        (
            self.render_handles.len(),
            self.render_handles.values().map(|h| h.triangles).sum(),
        )
    }

    fn evaluate_view(&mut self, viewer_chunk: Point2<i32>) {
        let radius = self.view_distance;
        let mut desired = HashSet::new();
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                desired.insert(Point2::new(viewer_chunk.x + dx, viewer_chunk.y + dz));
            }
        }

        // Pending work that the move made stale is cancelled rather than
        // executed and immediately reversed.
        self.load_queue.retain(|c| desired.contains(&c));
        self.unload_queue.retain(|c| !desired.contains(&c));

        for &coordinate in &desired {
            if !self.chunks.contains_key(&coordinate) {
                self.load_queue.push(coordinate);
            }
        }
        for &coordinate in self.chunks.keys() {
            if !desired.contains(&coordinate) {
                self.unload_queue.push(coordinate);
            }
        }
    }

    fn execute_load(&mut self, coordinate: Point2<i32>) {
        if self.chunks.contains_key(&coordinate) {
            return;
        }
        let mut chunk = Chunk::new(coordinate);
        self.terrain.fill(&mut chunk);
        self.chunks.insert(coordinate, chunk);
        info!("loaded chunk ({}, {})", coordinate.x, coordinate.y);

        self.rebuild_mesh(coordinate);

        // Neighbors were meshed against an unloaded (all air) edge; they
        // can now seal against real data.
        for neighbor in Self::horizontal_neighbors(coordinate) {
            self.enqueue_remesh_if_loaded(neighbor);
        }

        if coordinate == self.spawn_chunk && self.spawn_position.is_none() {
            if let Some(chunk) = self.chunks.get(&coordinate) {
                self.spawn_position = spawn::find_spawn_position(chunk, &self.registry);
                match self.spawn_position {
                    Some(position) => info!("spawn position resolved at {:?}", position),
                    None => info!("spawn chunk has no standing ground"),
                }
            }
        }
    }

    fn execute_unload(&mut self, coordinate: Point2<i32>) {
        if !self.chunks.contains_key(&coordinate) {
            return;
        }
        // Neighbors re-open the shared edge once this data is gone.
        for neighbor in Self::horizontal_neighbors(coordinate) {
            self.enqueue_remesh_if_loaded(neighbor);
        }
        self.remesh_queue.remove(coordinate);
        self.sink.discard(coordinate);
        self.render_handles.remove(&coordinate);
        self.chunks.remove(&coordinate);
        info!("unloaded chunk ({}, {})", coordinate.x, coordinate.y);
    }

    /// Builds and uploads the mesh for a loaded chunk. A build that fails
    /// its invariant check is discarded and the chunk queued for another
    /// attempt instead of handing malformed buffers to the sink.
    fn rebuild_mesh(&mut self, coordinate: Point2<i32>) {
        let Some(chunk) = self.chunks.get(&coordinate) else {
            return;
        };
        let mesher = &mut self.mesher;
        let result = mesher.build(chunk, &self.chunks, &self.registry, &self.atlas);
        match result {
            Ok(mesh) => {
                self.render_handles.insert(
                    coordinate,
                    RenderHandle {
                        vertices: mesh.vertices.len(),
                        triangles: mesh.triangle_count(),
                    },
                );
                self.sink.upload(mesh);
            }
            Err(EngineError::BuildInvariant { detail, .. }) => {
                error!(
                    "discarding mesh for chunk ({}, {}): {}",
                    coordinate.x, coordinate.y, detail
                );
                self.remesh_queue.push(coordinate);
            }
            Err(other) => {
                error!(
                    "mesh build failed for chunk ({}, {}): {}",
                    coordinate.x, coordinate.y, other
                );
            }
        }
    }

    fn enqueue_remesh_if_loaded(&mut self, coordinate: Point2<i32>) {
        if self.chunks.contains_key(&coordinate) {
            self.remesh_queue.push(coordinate);
        }
    }

    fn horizontal_neighbors(coordinate: Point2<i32>) -> [Point2<i32>; 4] {
        [
            Point2::new(coordinate.x - 1, coordinate.y),
            Point2::new(coordinate.x + 1, coordinate.y),
            Point2::new(coordinate.x, coordinate.y - 1),
            Point2::new(coordinate.x, coordinate.y + 1),
        ]
    }
}
