//! # Engine Configuration
//!
//! Runtime configuration for the engine, deserializable from JSON. Every
//! field has a default so a partial config file (or none at all) yields the
//! reference setup: a 256x256 atlas of 64px tiles, view distance 4, a 20 Hz
//! logic tick, and greedy meshing enabled.

use serde::Deserialize;

use crate::error::EngineError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width of the shared texture sheet in pixels.
    pub atlas_width: u32,
    /// Height of the shared texture sheet in pixels.
    pub atlas_height: u32,
    /// Edge length of one atlas tile in pixels.
    pub tile_size: u32,
    /// Chebyshev radius, in chunks, within which chunks are kept loaded.
    pub view_distance: i32,
    /// World seed handed to the terrain generator.
    pub seed: u32,
    /// Chunk coordinate at which the spawn position is resolved on first load.
    pub spawn_chunk: [i32; 2],
    /// Logic tick rate in Hz for the fixed-rate cadence.
    pub tick_hz: u32,
    /// Use the greedy mesher instead of per-face culling.
    pub greedy_meshing: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            atlas_width: 256,
            atlas_height: 256,
            tile_size: 64,
            view_distance: 4,
            seed: 0,
            spawn_chunk: [0, 0],
            tick_hz: 20,
            greedy_meshing: true,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a JSON string. Missing fields fall back
    /// to their defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_reference_setup() {
        let config = EngineConfig::default();
        assert_eq!(config.atlas_width, 256);
        assert_eq!(config.tile_size, 64);
        assert_eq!(config.view_distance, 4);
        assert_eq!(config.tick_hz, 20);
        assert!(config.greedy_meshing);
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config = EngineConfig::from_json(r#"{"view_distance": 2, "seed": 42}"#).unwrap();
        assert_eq!(config.view_distance, 2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.atlas_width, 256);
        assert!(config.greedy_meshing);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(EngineConfig::from_json("not json").is_err());
    }
}
