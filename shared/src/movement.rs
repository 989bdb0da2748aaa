//! Per-frame avatar movement: proximity probes, gated displacement, ground snap
//!
//! In Bevy: +X is right, +Y is up, -Z is forward at yaw 0.
//! Probe and flag names follow the level map's layout: "top" is -Z (the first
//! row of a map), "bottom" is +Z, "left" is -X, "right" is +X.

use bevy::prelude::*;

use crate::config::MovementConfig;
use crate::ground::Ground;
use crate::player::Avatar;
use crate::spatial::{SolidEntry, SolidGrid};

/// Movement keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub left: bool,
    pub back: bool,
    pub right: bool,
}

/// Which world directions are blocked this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    /// -Z
    pub top: bool,
    /// +Z
    pub bottom: bool,
    /// -X
    pub left: bool,
    /// +X
    pub right: bool,
}

impl CollisionFlags {
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    /// Whether motion along X with this sign is blocked
    fn blocks_x(&self, dx: f32) -> bool {
        (dx < 0.0 && self.left) || (dx > 0.0 && self.right)
    }

    /// Whether motion along Z with this sign is blocked
    fn blocks_z(&self, dz: f32) -> bool {
        (dz < 0.0 && self.top) || (dz > 0.0 && self.bottom)
    }
}

/// Frame rate estimate from the time since the previous frame.
///
/// A zero-length frame gives an infinite rate, which moves the avatar by zero.
#[inline]
pub fn fps_from_elapsed(elapsed_secs: f32) -> f32 {
    1.0 / elapsed_secs
}

/// Unit displacement (x, z) of each held key for the avatar's cached facing.
fn key_directions(keys: &MoveKeys, cos: f32, sin: f32) -> impl Iterator<Item = Vec2> {
    [
        (keys.forward, Vec2::new(-sin, -cos)),
        (keys.left, Vec2::new(-cos, sin)),
        (keys.back, Vec2::new(sin, cos)),
        (keys.right, Vec2::new(cos, -sin)),
    ]
    .into_iter()
    .filter_map(|(held, dir)| held.then_some(dir))
}

/// Solids close enough to the avatar to matter this frame.
///
/// Horizontal distance must be under `proximity_radius` and the solid's origin
/// must sit inside the torso band above the avatar's feet, so floors, roofs and
/// lintels never block walking.
pub fn collision_candidates<'a>(
    position: Vec3,
    solids: &'a SolidGrid,
    cfg: &'a MovementConfig,
) -> impl Iterator<Item = &'a SolidEntry> + 'a {
    let feet = position.y - cfg.eye_height;
    let here = position.xz();

    solids
        .nearby(position, cfg.proximity_radius)
        .filter(move |solid| {
            let height = solid.position.y - feet;
            solid.position.xz().distance(here) < cfg.proximity_radius
                && height > cfg.torso_band_min
                && height < cfg.torso_band_max
        })
}

/// Probe the four eat-box points against every candidate solid.
pub fn probe_collisions<'a>(
    position: Vec3,
    eat_box_size: f32,
    candidates: impl IntoIterator<Item = &'a SolidEntry>,
) -> CollisionFlags {
    let top = position - Vec3::Z * eat_box_size;
    let bottom = position + Vec3::Z * eat_box_size;
    let left = position - Vec3::X * eat_box_size;
    let right = position + Vec3::X * eat_box_size;

    let mut flags = CollisionFlags::default();
    for solid in candidates {
        flags.top |= solid.bounds.contains_point(top);
        flags.bottom |= solid.bounds.contains_point(bottom);
        flags.left |= solid.bounds.contains_point(left);
        flags.right |= solid.bounds.contains_point(right);
    }
    flags
}

/// Horizontal displacement for one frame, with blocked axis components dropped
/// per key so the avatar can still slide along a wall.
pub fn gated_displacement(
    keys: &MoveKeys,
    cos_angle: f32,
    sin_angle: f32,
    step: f32,
    flags: &CollisionFlags,
) -> Vec2 {
    let mut total = Vec2::ZERO;
    for dir in key_directions(keys, cos_angle, sin_angle) {
        let delta = dir * step;
        if !flags.blocks_x(delta.x) {
            total.x += delta.x;
        }
        if !flags.blocks_z(delta.y) {
            total.y += delta.y;
        }
    }
    total
}

/// Advance the avatar by one frame.
///
/// Collision flags are computed fresh from the current position and returned for
/// display; nothing carries over to the next call.
pub fn step_avatar(
    avatar: &mut Avatar,
    keys: &MoveKeys,
    fps: f32,
    solids: &SolidGrid,
    ground: &Ground,
    cfg: &MovementConfig,
) -> CollisionFlags {
    let flags = probe_collisions(
        avatar.position,
        cfg.eat_box_size,
        collision_candidates(avatar.position, solids, cfg),
    );

    let step = cfg.speed / fps;
    let delta = gated_displacement(keys, avatar.cos_angle(), avatar.sin_angle(), step, &flags);
    avatar.position.x += delta.x;
    avatar.position.z += delta.y;

    avatar.position.y = ground.height(avatar.position.x, avatar.position.z) + cfg.eye_height;

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::building_layout;
    use crate::level::{parse_map, LevelLayout};
    use crate::spatial::Aabb;
    use crate::terrain::elevation;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    const FPS: f32 = 60.0;
    const SPEED: f32 = 3.0;
    const STEP: f32 = SPEED / FPS;

    fn cfg() -> MovementConfig {
        MovementConfig {
            speed: SPEED,
            ..default()
        }
    }

    fn avatar_at_origin(yaw: f32) -> Avatar {
        Avatar::new(Vec3::new(0.0, cfg().eye_height, 0.0), yaw)
    }

    fn grid_with(boxes: &[Aabb]) -> SolidGrid {
        let mut grid = SolidGrid::default();
        for b in boxes {
            grid.insert(SolidEntry {
                position: b.center(),
                bounds: *b,
            });
        }
        grid
    }

    fn only(key: &str) -> MoveKeys {
        MoveKeys {
            forward: key == "forward",
            left: key == "left",
            back: key == "back",
            right: key == "right",
        }
    }

    fn all_flags() -> CollisionFlags {
        CollisionFlags {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }

    #[test]
    fn test_each_key_moves_by_speed_over_fps() {
        let expected = [
            ("forward", Vec2::new(0.0, -STEP)),
            ("left", Vec2::new(-STEP, 0.0)),
            ("back", Vec2::new(0.0, STEP)),
            ("right", Vec2::new(STEP, 0.0)),
        ];
        for (key, want) in expected {
            let delta = gated_displacement(&only(key), 1.0, 0.0, STEP, &CollisionFlags::default());
            assert!((delta - want).length() < 1e-6, "{key}: {delta:?}");
        }
    }

    #[test]
    fn test_each_key_follows_yaw() {
        // Facing +X after turning right a quarter turn (yaw = -pi/2)
        let mut avatar = avatar_at_origin(-FRAC_PI_2);
        step_avatar(&mut avatar, &only("forward"), FPS, &SolidGrid::default(), &Ground::default(), &cfg());
        assert!((avatar.position.x - STEP).abs() < 1e-6);
        assert!(avatar.position.z.abs() < 1e-6);
    }

    #[test]
    fn test_blocked_axis_moves_exactly_zero() {
        let flags = all_flags();
        for key in ["forward", "left", "back", "right"] {
            for yaw in [0.0, FRAC_PI_4, FRAC_PI_2, 2.0, -2.5] {
                let delta = gated_displacement(&only(key), yaw.cos(), yaw.sin(), STEP, &flags);
                assert_eq!(delta, Vec2::ZERO, "{key} at yaw {yaw}");
            }
        }
    }

    #[test]
    fn test_flags_block_only_the_direction_of_motion() {
        // Walking forward at yaw 0 goes -Z; a wall behind (+Z) must not stop it
        let behind = CollisionFlags {
            bottom: true,
            ..default()
        };
        let delta = gated_displacement(&only("forward"), 1.0, 0.0, STEP, &behind);
        assert!((delta.y + STEP).abs() < 1e-6);

        let ahead = CollisionFlags {
            top: true,
            ..default()
        };
        let delta = gated_displacement(&only("forward"), 1.0, 0.0, STEP, &ahead);
        assert_eq!(delta.y, 0.0);
    }

    #[test]
    fn test_diagonal_slides_along_blocked_wall() {
        // Facing 45 degrees left of -Z: forward pushes toward -X and -Z
        let flags = CollisionFlags {
            top: true,
            ..default()
        };
        let delta = gated_displacement(&only("forward"), FRAC_PI_4.cos(), FRAC_PI_4.sin(), STEP, &flags);
        assert_eq!(delta.y, 0.0);
        assert!((delta.x + STEP * FRAC_PI_4.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_flags_do_not_leak_between_calls() {
        let wall = Aabb::new(Vec3::new(-0.5, 0.0, -0.55), Vec3::new(0.5, 2.0, -0.15));
        let mut avatar = avatar_at_origin(0.0);

        let flags = step_avatar(&mut avatar, &MoveKeys::default(), FPS, &grid_with(&[wall]), &Ground::default(), &cfg());
        assert!(flags.top);

        let empty = SolidGrid::default();
        let first = step_avatar(&mut avatar, &MoveKeys::default(), FPS, &empty, &Ground::default(), &cfg());
        let second = step_avatar(&mut avatar, &MoveKeys::default(), FPS, &empty, &Ground::default(), &cfg());
        assert!(!first.any());
        assert!(!second.any());
    }

    #[test]
    fn test_far_and_floor_solids_are_not_candidates() {
        let position = Vec3::new(0.0, cfg().eye_height, 0.0);
        let floor = Aabb::from_unit_cube(Vec3::new(0.0, 0.0, 0.0), Vec3::ONE);
        let roof = Aabb::from_unit_cube(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE);
        let far_wall = Aabb::from_unit_cube(Vec3::new(2.5, 1.0, 0.0), Vec3::ONE);
        let near_wall = Aabb::from_unit_cube(Vec3::new(1.0, 1.0, 0.0), Vec3::ONE);
        let grid = grid_with(&[floor, roof, far_wall, near_wall]);

        let config = cfg();
        let candidates: Vec<_> = collision_candidates(position, &grid, &config).collect();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].position, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_torso_band_is_relative_to_feet() {
        // Avatar standing on a hill: the wall sits at the same height above the feet
        let feet = 6.0;
        let position = Vec3::new(0.0, feet + cfg().eye_height, 0.0);
        let wall = Aabb::from_unit_cube(Vec3::new(0.6, feet + 1.0, 0.0), Vec3::ONE);
        let grid = grid_with(&[wall]);

        let config = cfg();
        let flags = probe_collisions(position, config.eat_box_size, collision_candidates(position, &grid, &config));
        assert!(flags.right);
        assert!(!flags.left);
    }

    #[test]
    fn test_zero_elapsed_frame_does_not_move() {
        let mut avatar = avatar_at_origin(0.3);
        let fps = fps_from_elapsed(0.0);
        step_avatar(&mut avatar, &only("forward"), fps, &SolidGrid::default(), &Ground::default(), &cfg());
        assert_eq!(avatar.position.xz(), Vec2::ZERO);
    }

    #[test]
    fn test_avatar_snaps_to_terrain() {
        let mut avatar = Avatar::new(Vec3::new(20.0, 100.0, 0.0), 0.0);
        step_avatar(&mut avatar, &MoveKeys::default(), FPS, &SolidGrid::default(), &Ground::default(), &cfg());
        assert!((avatar.position.y - (elevation(20.0, 0.0) + cfg().eye_height)).abs() < 1e-6);
    }

    #[test]
    fn test_wall_ahead_stops_forward_but_allows_strafe() {
        // Thin wall straight ahead (-Z) of an avatar at the origin facing yaw 0
        let wall = Aabb::new(Vec3::new(-0.1, 0.0, -0.55), Vec3::new(0.1, 2.0, -0.35));
        let grid = grid_with(&[wall]);
        let mut avatar = avatar_at_origin(0.0);

        for _ in 0..30 {
            step_avatar(&mut avatar, &only("forward"), FPS, &grid, &Ground::default(), &cfg());
            assert!(avatar.position.z > wall.max.z, "walked into the wall at {:?}", avatar.position);
        }
        // Stopped where the front eat-box point first touched the near face
        let stopped_z = avatar.position.z;
        assert!(stopped_z <= wall.max.z + cfg().eat_box_size + 1e-4);

        let keys = MoveKeys {
            forward: true,
            right: true,
            ..default()
        };
        step_avatar(&mut avatar, &keys, FPS, &grid, &Ground::default(), &cfg());
        assert_eq!(avatar.position.z, stopped_z);
        assert!((avatar.position.x - STEP).abs() < 1e-6);
    }

    #[test]
    fn test_wall_behind_stops_backing_up() {
        // Wall on the +Z side, approached by walking backwards
        let wall = Aabb::new(Vec3::new(-0.1, 0.0, 0.35), Vec3::new(0.1, 2.0, 0.55));
        let grid = grid_with(&[wall]);
        let mut avatar = avatar_at_origin(0.0);

        for _ in 0..30 {
            step_avatar(&mut avatar, &only("back"), FPS, &grid, &Ground::default(), &cfg());
            assert!(avatar.position.z < wall.min.z);
        }
        assert!(avatar.position.z >= wall.min.z - cfg().eat_box_size - 1e-4);
    }

    // Levels settled on sloped terrain, walked through the resolver

    fn index(grid: &mut SolidGrid, layout: &LevelLayout) {
        for piece in &layout.pieces {
            grid.insert(SolidEntry {
                position: piece.position,
                bounds: Aabb::from_unit_cube(piece.position, piece.scale),
            });
        }
    }

    fn stand_at(ground: &Ground, x: f32, z: f32) -> Avatar {
        Avatar::new(Vec3::new(x, ground.height(x, z) + cfg().eye_height, z), 0.0)
    }

    /// Walk for `frames`, returning whether any flag was ever raised
    fn walk(avatar: &mut Avatar, key: &str, frames: usize, grid: &SolidGrid, ground: &Ground) -> bool {
        let mut blocked = false;
        for _ in 0..frames {
            blocked |= step_avatar(avatar, &only(key), FPS, grid, ground, &cfg()).any();
        }
        blocked
    }

    #[test]
    fn test_walled_cell_on_a_slope_blocks_walls_not_roof() {
        let offset = Vec3::new(40.0, 0.0, -25.0);
        let mut layout = parse_map("www\nwpw\nwww");
        for piece in &mut layout.pieces {
            piece.position += offset;
        }
        let spawn = layout.spawn.unwrap() + offset.xz();

        let mut ground = Ground::default();
        let lift = layout.settle_on(&mut ground).unwrap();
        assert!(lift.abs() > 1.0, "cell should sit on a slope, lift {lift}");
        let mut grid = SolidGrid::default();
        index(&mut grid, &layout);

        // Standing still in the middle: roof and floor are out of the torso band
        let avatar = stand_at(&ground, spawn.x, spawn.y);
        let config = cfg();
        let candidates: Vec<_> = collision_candidates(avatar.position, &grid, &config).collect();
        assert!(!candidates.is_empty());
        for solid in &candidates {
            let above_floor = solid.position.y - lift;
            assert!(above_floor > 0.5 && above_floor < 2.5, "candidate at {:?}", solid.position);
        }

        for (key, axis) in [("forward", Vec2::NEG_Y), ("back", Vec2::Y), ("left", Vec2::NEG_X), ("right", Vec2::X)] {
            let mut avatar = stand_at(&ground, spawn.x, spawn.y);
            assert!(walk(&mut avatar, key, 60, &grid, &ground), "{key} never blocked");
            let moved = (avatar.position.xz() - spawn).dot(axis);
            assert!(moved > 0.25 && moved < 0.36, "{key} moved {moved}");
        }
    }

    fn shipped_levels() -> (SolidGrid, Ground, Vec2) {
        let mut ground = Ground::default();
        let mut grid = SolidGrid::default();

        let mut bunker = parse_map(include_str!("../../client/assets/levels/bunker.txt"));
        bunker.settle_on(&mut ground).unwrap();
        index(&mut grid, &bunker);

        let mut outpost = building_layout(include_str!("../../client/assets/levels/outpost.json")).unwrap();
        outpost.settle_on(&mut ground).unwrap();
        index(&mut grid, &outpost);

        (grid, ground, bunker.spawn.unwrap())
    }

    #[test]
    fn test_bunker_walls_and_door_stop_the_avatar() {
        let (grid, ground, spawn) = shipped_levels();
        assert_eq!(spawn, Vec2::new(4.0, 3.0));

        // North wall row (z = 0) ahead
        let mut avatar = stand_at(&ground, spawn.x, spawn.y);
        assert!(walk(&mut avatar, "forward", 200, &grid, &ground));
        assert!(avatar.position.z > 0.6 && avatar.position.z < 0.75, "{:?}", avatar.position);
        assert!((avatar.position.x - spawn.x).abs() < 1e-4);

        // Back across the room to the closed door (z = 5)
        assert!(walk(&mut avatar, "back", 200, &grid, &ground));
        assert!(avatar.position.z > 4.6 && avatar.position.z < 4.8, "{:?}", avatar.position);

        // East wall (x = 8)
        let mut avatar = stand_at(&ground, spawn.x, spawn.y);
        assert!(walk(&mut avatar, "right", 200, &grid, &ground));
        assert!(avatar.position.x > 7.25 && avatar.position.x < 7.4, "{:?}", avatar.position);
    }

    #[test]
    fn test_bunker_exit_is_open() {
        let (grid, ground, spawn) = shipped_levels();
        let mut avatar = stand_at(&ground, spawn.x, spawn.y);
        walk(&mut avatar, "left", 200, &grid, &ground);
        assert!(avatar.position.x < -0.5, "stuck inside at {:?}", avatar.position);
    }

    #[test]
    fn test_outpost_walls_block_and_doorway_is_open() {
        let (grid, ground, _) = shipped_levels();

        // North wall of the (-6, -3) cell
        let mut avatar = stand_at(&ground, -6.0, -3.0);
        assert!(walk(&mut avatar, "back", 100, &grid, &ground));
        assert!(avatar.position.z > -2.85 && avatar.position.z < -2.7, "{:?}", avatar.position);

        // South wall of the (-6, -4) cell
        let mut avatar = stand_at(&ground, -6.0, -3.0);
        assert!(walk(&mut avatar, "forward", 100, &grid, &ground));
        assert!(avatar.position.z > -4.3 && avatar.position.z < -4.1, "{:?}", avatar.position);

        // No west wall on the (-5, -3) cell
        let mut avatar = stand_at(&ground, -6.0, -3.0);
        walk(&mut avatar, "right", 100, &grid, &ground);
        assert!(avatar.position.x > -4.0, "stuck inside at {:?}", avatar.position);
    }
}
