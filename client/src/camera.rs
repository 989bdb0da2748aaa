//! First-person camera holder
//!
//! The holder entity carries the `Avatar` and only ever rotates around Y (yaw).
//! The camera is its child and only ever rotates around X (pitch), so looking
//! up or down never tilts the walking direction.

use bevy::prelude::*;
use shared::{Avatar, CameraHolder, Ground, WalkConfig};

use crate::systems::WorldSetup;

const FOV: f32 = 75.0_f32.to_radians();
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Marker for the player's view camera
#[derive(Component)]
pub struct PlayerCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera_holder.in_set(WorldSetup::Root));
    }
}

/// Spawn the holder standing on the ground at the origin
pub fn spawn_camera_holder(mut commands: Commands, config: Res<WalkConfig>, ground: Res<Ground>) {
    let avatar = Avatar::new(
        Vec3::new(0.0, ground.height(0.0, 0.0) + config.movement.eye_height, 0.0),
        0.0,
    );
    let holder_transform =
        Transform::from_translation(avatar.position).with_rotation(avatar.holder_rotation());

    commands
        .spawn((CameraHolder, avatar, holder_transform, Visibility::default()))
        .with_children(|holder| {
            holder.spawn((
                PlayerCamera,
                Camera3d::default(),
                Projection::Perspective(PerspectiveProjection {
                    fov: FOV,
                    near: NEAR,
                    far: FAR,
                    ..default()
                }),
                Transform::default(),
            ));
        });
}

/// Copy the avatar's pose onto the holder and camera transforms
pub fn sync_camera_transforms(
    mut holders: Query<(&Avatar, &mut Transform), With<CameraHolder>>,
    mut cameras: Query<&mut Transform, (With<PlayerCamera>, Without<CameraHolder>)>,
) {
    let Ok((avatar, mut holder)) = holders.single_mut() else {
        return;
    };

    holder.translation = avatar.position;
    holder.rotation = avatar.holder_rotation();

    for mut camera in cameras.iter_mut() {
        camera.rotation = avatar.camera_rotation();
    }
}
