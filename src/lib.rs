#![warn(missing_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxelfield
//!
//! A voxel-world engine core: a sparse, chunked 3D grid of block ids,
//! converted chunk by chunk into renderable polygon surfaces while chunks
//! stream in and out around a moving viewpoint.
//!
//! ## Key Modules
//!
//! * `voxels` - Block types, chunk storage, terrain generation, and the
//!   world scheduler that streams chunks around the viewer
//! * `meshing` - The face-culling and greedy meshing algorithms plus the
//!   texture atlas mapper
//! * `config` - JSON-loadable engine configuration
//!
//! ## Architecture
//!
//! Everything runs on one cooperative loop with two cadences: a per-frame
//! call that executes at most one queued chunk operation, and a fixed-rate
//! logic tick that re-evaluates which chunks should be loaded. The mesh
//! builders receive their collaborators (block registry, texture atlas,
//! neighbor lookup) by reference, so each piece tests in isolation.
//!
//! The engine produces vertex/index/UV buffers and hands them to a
//! [`voxels::world::sink::MeshSink`]; GPU upload, input, and UI live
//! outside this crate.

use cgmath::Point3;
use log::info;

pub mod config;
pub mod error;
pub mod meshing;
pub mod voxels;

pub use config::EngineConfig;
pub use error::EngineError;
pub use meshing::{MeshAlgorithm, MeshOutput, Mesher, TextureAtlas};
pub use voxels::world::WorldScheduler;

use voxels::block::registry::{BlockKind, BlockRegistry};
use voxels::terrain::NoiseTerrain;
use voxels::world::clock::TickClock;
use voxels::world::sink::NullSink;

/// Frames the headless demo runs before reporting and exiting.
const DEMO_FRAMES: u32 = 20_000;

/// Runs the headless demo: streams terrain around a viewer drifting across
/// the world, applies a few edits, and logs what the engine did.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("logger initialized");

    let config = EngineConfig::default();
    let registry = BlockRegistry::builtin();
    let atlas = TextureAtlas::new(config.atlas_width, config.atlas_height, config.tile_size)
        .expect("default atlas config is valid");
    let algorithm = if config.greedy_meshing {
        MeshAlgorithm::Greedy
    } else {
        MeshAlgorithm::Culled
    };
    let mut scheduler = WorldScheduler::new(
        registry,
        atlas,
        Mesher::new(algorithm),
        Box::new(NoiseTerrain::new(config.seed)),
        Box::new(NullSink::new()),
        config.view_distance,
        cgmath::Point2::new(config.spawn_chunk[0], config.spawn_chunk[1]),
    );

    let mut clock = TickClock::new(config.tick_hz);
    let mut viewer = Point3::new(8.0, 80.0, 8.0);

    for frame in 0..DEMO_FRAMES {
        for _ in 0..clock.ticks_due() {
            scheduler.advance_tick(viewer);
        }
        scheduler.advance_frame();

        // Drift east, crossing a chunk border every few hundred frames.
        viewer.x += 0.05;

        if frame % 4096 == 0 {
            if let Some(spawn) = scheduler.spawn_position() {
                let x = spawn.x as i32 + fastrand::i32(-8..8);
                let z = spawn.z as i32 + fastrand::i32(-8..8);
                let y = fastrand::i32(60..80);
                scheduler.set_block(Point3::new(x, y, z), BlockKind::STONE.id());
            }
        }
    }

    let (meshes, triangles) = scheduler.render_stats();
    let (loads, unloads, remeshes) = scheduler.queue_depths();
    info!(
        "demo finished: {} chunks loaded, {} meshes ({} triangles), queues {}/{}/{}",
        scheduler.loaded_count(),
        meshes,
        triangles,
        loads,
        unloads,
        remeshes
    );
    if let Some(spawn) = scheduler.spawn_position() {
        info!("spawn position: {:?}", spawn);
    }
}
