//! Player movement
//!
//! One resolver step per rendered frame, driven by the frame rate estimated
//! from the previous frame's duration.

use bevy::prelude::*;
use shared::{
    fps_from_elapsed, step_avatar, Avatar, CameraHolder, CollisionFlags, Ground, SolidGrid, WalkConfig,
};

use crate::input::InputState;

/// Last frame's movement readout, shown by the debug overlay
#[derive(Resource, Default, Debug)]
pub struct FrameStats {
    pub fps: f32,
    pub collisions: CollisionFlags,
}

/// Move the avatar from held keys, gated by nearby solids, then snap to terrain
pub fn process_player_movement(
    time: Res<Time>,
    input: Res<InputState>,
    config: Res<WalkConfig>,
    solids: Res<SolidGrid>,
    ground: Res<Ground>,
    mut stats: ResMut<FrameStats>,
    mut avatars: Query<&mut Avatar, With<CameraHolder>>,
) {
    let Ok(mut avatar) = avatars.single_mut() else {
        return;
    };

    let fps = fps_from_elapsed(time.delta_secs());
    let collisions = step_avatar(&mut avatar, &input.keys, fps, &solids, &ground, &config.movement);

    if collisions.any() && !stats.collisions.any() {
        debug!("Blocked: {:?}", collisions);
    }

    stats.fps = fps;
    stats.collisions = collisions;
}
