//! Distance-based visibility culling

use bevy::prelude::*;

use crate::components::WorldKind;
use crate::config::RenderDistances;

/// Visible iff strictly closer than `render_distance`.
#[inline]
pub fn within_render_distance(object: Vec3, viewer: Vec3, render_distance: f32) -> bool {
    object.distance(viewer) < render_distance
}

/// Whether an entity of `kind` at `object` should be drawn for a viewer at `viewer`.
pub fn is_visible(kind: WorldKind, object: Vec3, viewer: Vec3, distances: &RenderDistances) -> bool {
    match kind.render_distance(distances) {
        Some(limit) => within_render_distance(object, viewer, limit),
        None => true,
    }
}
