//! Walkable ground: the terrain heightfield, flattened under level sites.
//!
//! Level geometry is authored on a flat floor. When a level is loaded it is
//! lifted to the terrain height at the middle of its footprint and the ground
//! under it is levelled to just below its floor, blending back into
//! [`elevation`] over [`PAD_BLEND`] units. Chunk meshes, prop placement and the
//! avatar's ground snap all sample [`Ground::height`], so the avatar stands on
//! the rendered surface inside levels too.

use bevy::prelude::*;

use crate::level::LevelPiece;
use crate::terrain::elevation;

/// Width of the ramp between a flattened pad and the surrounding terrain
pub const PAD_BLEND: f32 = 3.0;

/// How far the pad sits below the level's floor (keeps the terrain from
/// z-fighting with floor tops)
pub const PAD_SINK: f32 = 0.05;

/// A flattened rectangle of ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatPad {
    pub area: Rect,
    pub height: f32,
}

impl FlatPad {
    /// Horizontal distance from the pad's edge, 0 inside
    fn distance_outside(&self, x: f32, z: f32) -> f32 {
        let dx = (self.area.min.x - x).max(x - self.area.max.x).max(0.0);
        let dz = (self.area.min.y - z).max(z - self.area.max.y).max(0.0);
        Vec2::new(dx, dz).length()
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Ground {
    pads: Vec<FlatPad>,
}

impl Ground {
    pub fn flatten(&mut self, area: Rect, height: f32) {
        self.pads.push(FlatPad { area, height });
    }

    /// Ground height at a horizontal world position.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.pads.iter().fold(elevation(x, z), |h, pad| {
            let d = pad.distance_outside(x, z);
            if d >= PAD_BLEND {
                return h;
            }
            let t = smoothstep(d / PAD_BLEND);
            pad.height + (h - pad.height) * t
        })
    }

    /// Whether the point lies on a flattened pad (inside a level site)
    pub fn is_flattened(&self, x: f32, z: f32) -> bool {
        let point = Vec2::new(x, z);
        self.pads.iter().any(|pad| pad.area.contains(point))
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Horizontal bounds covered by a set of unit-cube pieces
pub fn footprint(pieces: &[LevelPiece]) -> Option<Rect> {
    pieces
        .iter()
        .map(|piece| {
            let center = piece.position.xz();
            let half = piece.scale.abs().xz() * 0.5;
            Rect::from_corners(center - half, center + half)
        })
        .reduce(|a, b| a.union(b))
}

/// Lift `pieces` onto the terrain and level the ground under them.
///
/// `floor_height` is the height (before lifting) the avatar's feet should
/// stand at. Returns the applied lift, `None` for an empty level.
pub fn settle_on_terrain(pieces: &mut [LevelPiece], floor_height: f32, ground: &mut Ground) -> Option<f32> {
    let area = footprint(pieces)?;
    let center = area.center();
    let lift = elevation(center.x, center.y);

    for piece in pieces.iter_mut() {
        piece.position.y += lift;
    }
    ground.flatten(area, lift + floor_height - PAD_SINK);

    Some(lift)
}
