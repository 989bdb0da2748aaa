//! Deterministic scattering of decorative props (trees, rocks) over the terrain.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::ground::Ground;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    Tree,
    Rock,
}

impl PropKind {
    pub const fn id(&self) -> &'static str {
        match self {
            PropKind::Tree => "tree",
            PropKind::Rock => "rock",
        }
    }

    /// GLTF scene path for this prop
    pub const fn scene_path(&self) -> &'static str {
        match self {
            PropKind::Tree => "models/tree.glb#Scene0",
            PropKind::Rock => "models/rock.glb#Scene0",
        }
    }

    /// Mixed into the seed so trees and rocks don't share positions
    const fn seed_salt(&self) -> u64 {
        match self {
            PropKind::Tree => 0x7265_6573,
            PropKind::Rock => 0x726f_636b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropPlacement {
    pub kind: PropKind,
    /// Base of the model, on the terrain surface
    pub position: Vec3,
    pub rotation: Quat,
}

/// Scatter `count` props uniformly over a square of side `map_size` centred on
/// the origin. Same seed, same placements. Spots inside level sites are dropped,
/// so fewer than `count` may come back.
pub fn scatter_props(seed: u64, kind: PropKind, count: usize, map_size: f32, ground: &Ground) -> Vec<PropPlacement> {
    let mut rng = StdRng::seed_from_u64(seed ^ kind.seed_salt());
    let half = map_size * 0.5;

    (0..count)
        .filter_map(|_| {
            let x = rng.gen::<f32>() * map_size - half;
            let z = rng.gen::<f32>() * map_size - half;
            let yaw = rng.gen::<f32>() * TAU;
            if ground.is_flattened(x, z) {
                return None;
            }
            Some(PropPlacement {
                kind,
                position: Vec3::new(x, ground.height(x, z), z),
                rotation: Quat::from_rotation_y(yaw),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::elevation;

    #[test]
    fn test_scatter_is_deterministic() {
        let a = scatter_props(42, PropKind::Tree, 50, 336.0, &Ground::default());
        let b = scatter_props(42, PropKind::Tree, 50, 336.0, &Ground::default());
        assert_eq!(a, b);
        assert_ne!(a, scatter_props(43, PropKind::Tree, 50, 336.0, &Ground::default()));
    }

    #[test]
    fn test_kinds_do_not_overlap() {
        let trees = scatter_props(42, PropKind::Tree, 10, 336.0, &Ground::default());
        let rocks = scatter_props(42, PropKind::Rock, 10, 336.0, &Ground::default());
        assert_ne!(trees[0].position, rocks[0].position);
    }

    #[test]
    fn test_props_sit_on_terrain_inside_map() {
        let map_size = 21.0 * crate::terrain::CHUNK_SIZE;
        for prop in scatter_props(7, PropKind::Rock, 200, map_size, &Ground::default()) {
            let p = prop.position;
            assert!(p.x.abs() <= map_size * 0.5 && p.z.abs() <= map_size * 0.5);
            assert_eq!(p.y, elevation(p.x, p.z));
        }
    }

    #[test]
    fn test_props_skip_level_sites() {
        let mut ground = Ground::default();
        ground.flatten(Rect::new(-40.0, -40.0, 40.0, 40.0), 2.0);
        let props = scatter_props(3, PropKind::Tree, 300, 336.0, &ground);

        assert!(props.len() < 300);
        for prop in &props {
            assert!(!ground.is_flattened(prop.position.x, prop.position.z));
            assert_eq!(prop.position.y, ground.height(prop.position.x, prop.position.z));
        }
    }
}
