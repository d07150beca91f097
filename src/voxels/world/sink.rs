//! The render/collision sink the scheduler hands finished meshes to.
//!
//! From the scheduler's point of view an upload atomically replaces
//! whatever was displayed for that chunk before; a discard removes it. The
//! engine core never talks to a graphics API itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cgmath::Point2;
use log::debug;

use crate::meshing::MeshOutput;

/// Receives mesh outputs for display and collision.
pub trait MeshSink {
    /// Replaces the geometry shown for the mesh's chunk.
    fn upload(&mut self, mesh: MeshOutput);

    /// Removes the geometry for an unloaded chunk.
    fn discard(&mut self, chunk_position: Point2<i32>);
}

/// A sink that counts uploads and drops the data, for headless runs.
#[derive(Debug, Default)]
pub struct NullSink {
    uploads: usize,
    discards: usize,
}

impl NullSink {
    /// Creates a sink that keeps only counters.
    pub fn new() -> Self {
        NullSink::default()
    }

    /// Number of uploads received.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Number of discards received.
    pub fn discards(&self) -> usize {
        self.discards
    }
}

impl MeshSink for NullSink {
    fn upload(&mut self, mesh: MeshOutput) {
        self.uploads += 1;
        debug!(
            "mesh for chunk ({}, {}): {} triangles",
            mesh.chunk_position.x,
            mesh.chunk_position.y,
            mesh.triangle_count()
        );
    }

    fn discard(&mut self, chunk_position: Point2<i32>) {
        self.discards += 1;
        debug!(
            "discarded mesh for chunk ({}, {})",
            chunk_position.x, chunk_position.y
        );
    }
}

/// A sink retaining the latest mesh per chunk behind a shared handle, so
/// tests can hand the sink to a scheduler and still inspect what arrived.
#[derive(Debug, Default)]
pub struct CollectingSink {
    meshes: Rc<RefCell<HashMap<Point2<i32>, MeshOutput>>>,
}

impl CollectingSink {
    /// Creates an empty collecting sink.
    pub fn new() -> Self {
        CollectingSink::default()
    }

    /// A handle to the collected meshes, alive independently of the sink.
    pub fn handle(&self) -> Rc<RefCell<HashMap<Point2<i32>, MeshOutput>>> {
        Rc::clone(&self.meshes)
    }
}

impl MeshSink for CollectingSink {
    fn upload(&mut self, mesh: MeshOutput) {
        self.meshes.borrow_mut().insert(mesh.chunk_position, mesh);
    }

    fn discard(&mut self, chunk_position: Point2<i32>) {
        self.meshes.borrow_mut().remove(&chunk_position);
    }
}
