//! Spatial hashing for fast solid lookups.
//!
//! The movement resolver only needs the handful of solids around the avatar.
//! Instead of iterating over every wall in the level each frame, solids are
//! bucketed into a hash grid on the XZ plane and queried by neighbourhood.

use bevy::prelude::*;
use std::collections::HashMap;

/// Size of each spatial grid cell in world units.
/// Matches the proximity radius so a radius query touches at most 3x3 cells.
pub const SOLID_CELL_SIZE: f32 = 2.0;

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounds of a unit cube after translation and (axis-aligned) scale.
    pub fn from_unit_cube(translation: Vec3, scale: Vec3) -> Self {
        Self::from_center_half_extents(translation, scale.abs() * 0.5)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive on every face: a point lying exactly on a face is contained.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// A single solid in the grid.
#[derive(Clone, Debug)]
pub struct SolidEntry {
    /// Object origin in world space (used for proximity and the torso band).
    pub position: Vec3,
    pub bounds: Aabb,
}

/// Spatial hash grid of collidable geometry.
///
/// Level geometry is static, so the grid is filled as solids spawn and never
/// rebuilt while walking.
#[derive(Resource, Default, Debug)]
pub struct SolidGrid {
    /// Map from grid cell (x, z) to indices of solids overlapping that cell.
    cells: HashMap<(i32, i32), Vec<usize>>,
    solids: Vec<SolidEntry>,
}

impl SolidGrid {
    #[inline]
    fn world_to_cell(x: f32, z: f32) -> (i32, i32) {
        (
            (x / SOLID_CELL_SIZE).floor() as i32,
            (z / SOLID_CELL_SIZE).floor() as i32,
        )
    }

    /// Add a solid, registering it in every cell its footprint overlaps.
    pub fn insert(&mut self, entry: SolidEntry) {
        let min_cell = Self::world_to_cell(entry.bounds.min.x, entry.bounds.min.z);
        let max_cell = Self::world_to_cell(entry.bounds.max.x, entry.bounds.max.z);

        let idx = self.solids.len();
        self.solids.push(entry);

        for cx in min_cell.0..=max_cell.0 {
            for cz in min_cell.1..=max_cell.1 {
                self.cells.entry((cx, cz)).or_default().push(idx);
            }
        }
    }

    /// Solids whose footprint touches any cell within `radius` of `point` (XZ).
    ///
    /// This is a coarse pre-filter; callers still apply their exact distance test.
    pub fn nearby(&self, point: Vec3, radius: f32) -> impl Iterator<Item = &SolidEntry> {
        let min_cell = Self::world_to_cell(point.x - radius, point.z - radius);
        let max_cell = Self::world_to_cell(point.x + radius, point.z + radius);
        let mut seen = Vec::new();

        for cx in min_cell.0..=max_cell.0 {
            for cz in min_cell.1..=max_cell.1 {
                if let Some(indices) = self.cells.get(&(cx, cz)) {
                    for &idx in indices {
                        if !seen.contains(&idx) {
                            seen.push(idx);
                        }
                    }
                }
            }
        }

        seen.into_iter().map(move |idx| &self.solids[idx])
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}
