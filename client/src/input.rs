//! Keyboard, mouse-look, cursor grab and fullscreen

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, MonitorSelection, PrimaryWindow, WindowMode};
use shared::{Avatar, CameraHolder, MoveKeys, WalkConfig};

use crate::states::GameState;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .add_systems(Update, (handle_cursor_grab, toggle_fullscreen))
            .add_systems(OnEnter(GameState::Paused), clear_held_keys);
    }
}

/// Client-side input state, read by the movement system each frame
#[derive(Resource, Default)]
pub struct InputState {
    pub keys: MoveKeys,
}

/// Handle keyboard input for movement
pub fn handle_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input_state: ResMut<InputState>,
) {
    input_state.keys = MoveKeys {
        forward: keyboard.pressed(KeyCode::KeyW),
        left: keyboard.pressed(KeyCode::KeyA),
        back: keyboard.pressed(KeyCode::KeyS),
        right: keyboard.pressed(KeyCode::KeyD),
    };
}

/// Mouse-look: yaw turns the camera holder, pitch tilts the camera.
/// Only applies while the cursor is captured.
pub fn handle_mouse_input(
    mut mouse_motion: MessageReader<MouseMotion>,
    cursor_opts: Query<&CursorOptions, With<PrimaryWindow>>,
    config: Res<WalkConfig>,
    mut avatars: Query<&mut Avatar, With<CameraHolder>>,
) {
    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }
    if delta == Vec2::ZERO {
        return;
    }

    let Ok(cursor) = cursor_opts.single() else {
        return;
    };
    if cursor.grab_mode == CursorGrabMode::None {
        return;
    }

    let Ok(mut avatar) = avatars.single_mut() else {
        return;
    };

    let sensitivity = config.movement.mouse_sensitivity;
    avatar.look(-delta.x * sensitivity, -delta.y * sensitivity);
}

/// Click captures the cursor and resumes; Escape releases it and pauses.
pub fn handle_cursor_grab(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut cursor_opts: Query<&mut CursorOptions, With<PrimaryWindow>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Ok(mut cursor) = cursor_opts.single_mut() else {
        return;
    };

    if mouse_button.just_pressed(MouseButton::Left) {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
        if *state.get() == GameState::Paused {
            info!("Resumed");
            next_state.set(GameState::Playing);
        }
    } else if keyboard.just_pressed(KeyCode::Escape) {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
        if *state.get() == GameState::Playing {
            info!("Paused");
            next_state.set(GameState::Paused);
        }
    }
}

/// F11 toggles borderless fullscreen
pub fn toggle_fullscreen(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !keyboard.just_pressed(KeyCode::F11) {
        return;
    }
    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    window.mode = match window.mode {
        WindowMode::Windowed => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        _ => WindowMode::Windowed,
    };
}

/// Drop held keys so the avatar doesn't keep walking after a resume
pub fn clear_held_keys(mut input_state: ResMut<InputState>) {
    input_state.keys = MoveKeys::default();
}
