//! # Error Types
//!
//! The engine distinguishes between conditions that fail a constructor or a
//! mesh build (surfaced as `EngineError`) and soft conditions that are logged
//! and resolved with a safe fallback (unknown block ids resolve to air,
//! out-of-range chunk accesses become no-ops, out-of-range atlas tiles yield
//! zeroed UVs). Only the variants below ever cross an API boundary.

use thiserror::Error;

/// Errors surfaced by fallible engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The texture atlas was constructed with unusable dimensions.
    #[error("texture atlas misconfigured: {0}")]
    Atlas(String),

    /// The block registry could not be constructed from the given types.
    #[error("block registry misconfigured: {0}")]
    Registry(String),

    /// The engine configuration could not be parsed.
    #[error("invalid engine config: {0}")]
    Config(#[from] serde_json::Error),

    /// A finished mesh build failed its consistency check. The output must be
    /// discarded rather than handed to the render sink; the scheduler
    /// re-queues the chunk for another build.
    #[error("mesh for chunk ({chunk_x}, {chunk_z}) violates build invariants: {detail}")]
    BuildInvariant {
        /// X coordinate of the chunk the build was for.
        chunk_x: i32,
        /// Z coordinate of the chunk the build was for.
        chunk_z: i32,
        /// Which invariant was violated.
        detail: String,
    },
}
