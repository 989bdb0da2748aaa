//! ECS components shared between world building and the per-frame systems

use bevy::prelude::*;

use crate::config::RenderDistances;

/// What a world entity is, fixed when it is spawned.
///
/// Collision and culling dispatch on this tag only.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldKind {
    /// Level geometry the avatar can bump into (walls, doors, floors, roofs)
    Collidable,
    /// A heightfield chunk
    Terrain,
    /// Decorative scenery (trees, rocks)
    Model,
    /// The sky sphere around the viewer
    Background,
}

impl WorldKind {
    pub fn is_solid(&self) -> bool {
        matches!(self, WorldKind::Collidable)
    }

    /// Distance beyond which this kind of entity is hidden, `None` if never culled.
    pub fn render_distance(&self, distances: &RenderDistances) -> Option<f32> {
        match self {
            WorldKind::Terrain => Some(distances.terrain_distance),
            WorldKind::Model | WorldKind::Collidable => Some(distances.model_distance),
            WorldKind::Background => None,
        }
    }
}

/// Marker for the avatar's carried point light
#[derive(Component)]
pub struct AvatarLight;

/// Marker for the camera holder entity (carries the `Avatar`)
#[derive(Component)]
pub struct CameraHolder;
