//! # Voxelfield Application Entry Point
//!
//! Runs the headless engine demo. Set `RUST_LOG=info` (or `debug` for
//! per-mesh output) to see what the scheduler is doing.

fn main() {
    voxelfield::run();
}
