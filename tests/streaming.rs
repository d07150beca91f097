//! Scheduler scenario tests: view-distance streaming, the one-operation
//! frame budget, edit propagation across chunk edges, and remesh request
//! invalidation on unload.

use std::collections::HashSet;

use cgmath::{Point2, Point3};
use voxelfield::meshing::{MeshAlgorithm, Mesher, TextureAtlas};
use voxelfield::voxels::block::registry::{BlockKind, BlockRegistry};
use voxelfield::voxels::block::AIR;
use voxelfield::voxels::terrain::FlatTerrain;
use voxelfield::voxels::world::sink::{CollectingSink, MeshSink};
use voxelfield::voxels::world::{FrameWork, WorldScheduler};

const GROUND: i32 = 10;

fn scheduler_with(
    view_distance: i32,
    sink: Box<dyn MeshSink>,
) -> WorldScheduler {
    WorldScheduler::new(
        BlockRegistry::builtin(),
        TextureAtlas::new(256, 256, 64).unwrap(),
        Mesher::new(MeshAlgorithm::Greedy),
        Box::new(FlatTerrain {
            ground_height: GROUND,
        }),
        sink,
        view_distance,
        Point2::new(0, 0),
    )
}

fn flat_scheduler(view_distance: i32) -> WorldScheduler {
    scheduler_with(view_distance, Box::new(CollectingSink::new()))
}

fn drain(scheduler: &mut WorldScheduler) -> Vec<FrameWork> {
    let mut work = Vec::new();
    while scheduler.queue_depths() != (0, 0, 0) {
        work.push(scheduler.advance_frame());
    }
    work
}

fn viewer_at_chunk(x: i32, z: i32) -> Point3<f32> {
    Point3::new(x as f32 * 16.0 + 8.0, 40.0, z as f32 * 16.0 + 8.0)
}

#[test]
fn view_distance_streaming_loads_the_square_once() {
    let mut scheduler = flat_scheduler(1);
    scheduler.advance_tick(viewer_at_chunk(0, 0));

    let (loads, unloads, remeshes) = scheduler.queue_depths();
    assert_eq!((loads, unloads, remeshes), (9, 0, 0));

    let mut loaded = HashSet::new();
    for _ in 0..9 {
        match scheduler.advance_frame() {
            FrameWork::Loaded(coordinate) => {
                assert!(loaded.insert(coordinate), "each coordinate loads once");
            }
            other => panic!("expected a load, got {:?}", other),
        }
    }
    let expected: HashSet<_> = (-1..=1)
        .flat_map(|z| (-1..=1).map(move |x| Point2::new(x, z)))
        .collect();
    assert_eq!(loaded, expected);
    assert_eq!(scheduler.loaded_count(), 9);

    // A second tick at the same viewpoint queues nothing new.
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    assert_eq!(scheduler.queue_depths().0, 0);
}

#[test]
fn each_frame_performs_at_most_one_operation() {
    let mut scheduler = flat_scheduler(1);
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    assert_eq!(scheduler.loaded_count(), 0);

    scheduler.advance_frame();
    assert_eq!(scheduler.loaded_count(), 1);
    scheduler.advance_frame();
    assert_eq!(scheduler.loaded_count(), 2);
}

#[test]
fn idle_when_no_work_is_pending() {
    let mut scheduler = flat_scheduler(0);
    assert_eq!(scheduler.advance_frame(), FrameWork::Idle);
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);
    assert_eq!(scheduler.advance_frame(), FrameWork::Idle);
}

#[test]
fn interior_chunks_seal_against_their_neighbors() {
    let sink = CollectingSink::new();
    let meshes = sink.handle();
    let mut scheduler = scheduler_with(1, Box::new(sink));
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);

    // Flat ground everywhere: the center chunk has all four neighbors
    // loaded, so after its reseal passes its mesh is exactly the merged
    // ground surface, two triangles.
    let meshes = meshes.borrow();
    let center = meshes.get(&Point2::new(0, 0)).unwrap();
    assert_eq!(center.triangle_count(), 2);

    // A corner chunk still has two open edges toward unloaded space: the
    // ground quad plus two exposed walls, each merged into one quad per
    // material band (grass, dirt, stone).
    let corner = meshes.get(&Point2::new(1, 1)).unwrap();
    assert_eq!(corner.triangle_count(), 2 + 2 * 3 * 2);
}

#[test]
fn edit_propagation_reaches_only_edge_sharing_neighbors() {
    let mut scheduler = flat_scheduler(1);
    scheduler.advance_tick(viewer_at_chunk(1, 1));
    drain(&mut scheduler);

    // Edit at local (0, y, 8) of chunk (1, 1): on the -X edge, not on any
    // Z edge.
    scheduler.set_block(Point3::new(16, GROUND, 24), AIR);

    assert_eq!(scheduler.advance_frame(), FrameWork::Remeshed(Point2::new(1, 1)));
    assert_eq!(scheduler.advance_frame(), FrameWork::Remeshed(Point2::new(0, 1)));
    assert_eq!(scheduler.advance_frame(), FrameWork::Idle);
}

#[test]
fn corner_edit_queues_both_edge_neighbors() {
    let mut scheduler = flat_scheduler(1);
    scheduler.advance_tick(viewer_at_chunk(1, 1));
    drain(&mut scheduler);

    // Local (0, y, 0) sits on the -X and -Z edges at once.
    scheduler.set_block(Point3::new(16, GROUND, 16), AIR);

    let mut remeshed = HashSet::new();
    loop {
        match scheduler.advance_frame() {
            FrameWork::Remeshed(coordinate) => {
                remeshed.insert(coordinate);
            }
            FrameWork::Idle => break,
            other => panic!("unexpected work {:?}", other),
        }
    }
    let expected: HashSet<_> = [
        Point2::new(1, 1),
        Point2::new(0, 1),
        Point2::new(1, 0),
    ]
    .into_iter()
    .collect();
    assert_eq!(remeshed, expected);
}

#[test]
fn interior_edit_queues_no_neighbors() {
    let mut scheduler = flat_scheduler(1);
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);

    scheduler.set_block(Point3::new(8, GROUND + 1, 8), BlockKind::STONE.id());
    assert_eq!(scheduler.advance_frame(), FrameWork::Remeshed(Point2::new(0, 0)));
    assert_eq!(scheduler.advance_frame(), FrameWork::Idle);
}

#[test]
fn edits_to_unloaded_chunks_are_discarded() {
    let mut scheduler = flat_scheduler(0);
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);

    scheduler.set_block(Point3::new(500, GROUND, 500), BlockKind::STONE.id());
    assert_eq!(scheduler.queue_depths(), (0, 0, 0));
    assert_eq!(scheduler.block_at(Point3::new(500, GROUND, 500)), AIR);
}

#[test]
fn edits_read_back_through_the_world() {
    let mut scheduler = flat_scheduler(0);
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);

    let position = Point3::new(3, GROUND + 5, 12);
    assert_eq!(scheduler.block_at(position), AIR);
    scheduler.set_block(position, BlockKind::WOOD.id());
    assert_eq!(scheduler.block_at(position), BlockKind::WOOD.id());
}

#[test]
fn moving_the_viewer_unloads_what_left_the_view() {
    let sink = CollectingSink::new();
    let meshes = sink.handle();
    let mut scheduler = scheduler_with(1, Box::new(sink));
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);
    assert_eq!(scheduler.loaded_count(), 9);

    scheduler.advance_tick(viewer_at_chunk(10, 10));
    let work = drain(&mut scheduler);

    // Loads take priority over unloads.
    let first_unload = work
        .iter()
        .position(|w| matches!(w, FrameWork::Unloaded(_)))
        .unwrap();
    let last_load = work
        .iter()
        .rposition(|w| matches!(w, FrameWork::Loaded(_)))
        .unwrap();
    assert!(last_load < first_unload);

    assert_eq!(scheduler.loaded_count(), 9);
    assert!(!scheduler.is_loaded(Point2::new(0, 0)));
    assert!(scheduler.is_loaded(Point2::new(10, 10)));

    // The sink dropped the evicted meshes along with the chunks.
    let meshes = meshes.borrow();
    assert!(meshes.get(&Point2::new(0, 0)).is_none());
    assert!(meshes.get(&Point2::new(10, 10)).is_some());
}

#[test]
fn pending_remesh_for_an_unloaded_chunk_is_invalidated() {
    let mut scheduler = flat_scheduler(1);
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);

    // Queue a remesh for (1, 1) but never execute it.
    scheduler.set_block(Point3::new(24, GROUND + 1, 24), BlockKind::STONE.id());
    assert!(scheduler.queue_depths().2 > 0);

    // Move away so (1, 1) unloads before its remesh runs.
    scheduler.advance_tick(viewer_at_chunk(10, 10));
    let work = drain(&mut scheduler);
    assert!(!work.contains(&FrameWork::Remeshed(Point2::new(1, 1))));
    assert!(!scheduler.is_loaded(Point2::new(1, 1)));
}

#[test]
fn returning_into_view_cancels_a_pending_unload() {
    let mut scheduler = flat_scheduler(1);
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);

    // Step away: the old ring is queued for unload but nothing executes.
    scheduler.advance_tick(viewer_at_chunk(5, 0));
    assert!(scheduler.queue_depths().1 > 0);

    // Step right back before any frame runs.
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);
    for z in -1..=1 {
        for x in -1..=1 {
            assert!(scheduler.is_loaded(Point2::new(x, z)));
        }
    }
}

#[test]
fn spawn_resolves_at_first_load_of_the_spawn_chunk() {
    let mut scheduler = flat_scheduler(1);
    assert!(scheduler.spawn_position().is_none());

    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);

    let spawn = scheduler.spawn_position().unwrap();
    assert_eq!(spawn, Point3::new(8.5, (GROUND + 1) as f32, 8.5));

    // The position survives the spawn chunk leaving and re-entering view.
    scheduler.advance_tick(viewer_at_chunk(10, 10));
    drain(&mut scheduler);
    assert!(!scheduler.is_loaded(Point2::new(0, 0)));
    assert_eq!(scheduler.spawn_position(), Some(spawn));
}

#[test]
fn loading_a_chunk_requeues_loaded_neighbors_for_resealing() {
    let mut scheduler = flat_scheduler(1);
    scheduler.advance_tick(viewer_at_chunk(0, 0));
    drain(&mut scheduler);
    assert_eq!(scheduler.loaded_count(), 9);

    // Walk one chunk east: the x = 2 column loads, and (1, 0), already
    // loaded and still in view, is queued to reseal against the new data.
    scheduler.advance_tick(viewer_at_chunk(1, 0));
    let work = drain(&mut scheduler);
    assert!(work.contains(&FrameWork::Loaded(Point2::new(2, 0))));
    assert!(scheduler.is_loaded(Point2::new(1, 0)));
    assert!(work.contains(&FrameWork::Remeshed(Point2::new(1, 0))));
}
