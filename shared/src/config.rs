//! Runtime configuration loaded from `assets/config.ron`
//!
//! Every section and field has a default, so a config file only needs to list
//! what it overrides.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use crate::player::{EAT_BOX_SIZE, EYE_HEIGHT, MOUSE_SENSITIVITY, PLAYER_SPEED};

#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct WalkConfig {
    pub movement: MovementConfig,
    pub render: RenderDistances,
    pub world: WorldGenConfig,
    pub level: LevelSources,
    pub lights: LightConfig,
    /// Show the fps/position overlay
    pub debug: bool,
}

/// Tunables for the per-frame movement resolver
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Blocks per second
    pub speed: f32,
    /// Probe offset from the avatar along each horizontal axis
    pub eat_box_size: f32,
    pub eye_height: f32,
    pub mouse_sensitivity: f32,
    /// Solids further than this (horizontally) are never collision candidates
    pub proximity_radius: f32,
    /// A solid's centre must sit strictly between these heights above the feet
    pub torso_band_min: f32,
    pub torso_band_max: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            eat_box_size: EAT_BOX_SIZE,
            eye_height: EYE_HEIGHT,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            proximity_radius: 2.0,
            torso_band_min: 0.25,
            torso_band_max: 1.75,
        }
    }
}

/// Visibility thresholds per kind of world entity
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderDistances {
    /// Measured to the chunk centre
    pub terrain_distance: f32,
    /// Applies to props and level geometry
    pub model_distance: f32,
}

impl Default for RenderDistances {
    fn default() -> Self {
        Self {
            terrain_distance: 64.0,
            model_distance: 48.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Chunks generated in each direction from the origin chunk
    pub chunk_radius: i32,
    pub tree_count: usize,
    pub rock_count: usize,
    pub prop_seed: u64,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            chunk_radius: 10,
            tree_count: 500,
            rock_count: 500,
            prop_seed: 42,
        }
    }
}

/// Level files, relative to the asset folder
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct LevelSources {
    pub map: Option<String>,
    pub buildings: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Point light carried by the avatar (lumens, 0 = off)
    pub avatar_light_intensity: f32,
    pub ambient_brightness: f32,
    pub sun_illuminance: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            avatar_light_intensity: 0.0,
            ambient_brightness: 300.0,
            sun_illuminance: 8_000.0,
        }
    }
}

impl WalkConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|e| format!("invalid config: {e}"))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::from_ron_str(&text).map_err(|e| format!("{}: {e}", path.display()))
    }
}
