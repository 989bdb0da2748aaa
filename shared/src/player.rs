//! Player avatar state and movement constants

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// Walking speed (blocks per second)
pub const PLAYER_SPEED: f32 = 2.0;

/// Half-size of the collision probe box around the avatar
pub const EAT_BOX_SIZE: f32 = 0.2;

/// Camera height above the ground
pub const EYE_HEIGHT: f32 = 1.5;

/// Mouse sensitivity for look (radians per pixel)
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// The viewer: position, facing and the trig cache movement runs on.
///
/// Yaw is only writable through [`Avatar::set_yaw`] / [`Avatar::look`], which keep
/// `cos_angle`/`sin_angle` in step with it.
#[derive(Component, Debug, Clone)]
pub struct Avatar {
    pub position: Vec3,
    /// Applied to the child camera only; never affects movement.
    pub pitch: f32,
    yaw: f32,
    cos_angle: f32,
    sin_angle: f32,
}

impl Avatar {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            pitch: 0.0,
            yaw,
            cos_angle: yaw.cos(),
            sin_angle: yaw.sin(),
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Cached `cos(yaw)`
    pub fn cos_angle(&self) -> f32 {
        self.cos_angle
    }

    /// Cached `sin(yaw)`
    pub fn sin_angle(&self) -> f32 {
        self.sin_angle
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.cos_angle = yaw.cos();
        self.sin_angle = yaw.sin();
    }

    /// Apply a mouse-look delta. Pitch is clamped so the view never flips.
    pub fn look(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.set_yaw(self.yaw + delta_yaw);
        self.pitch = (self.pitch + delta_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Rotation of the camera holder (yaw only)
    pub fn holder_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Rotation of the camera relative to its holder (pitch only)
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch)
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, EYE_HEIGHT, 0.0), 0.0)
    }
}
