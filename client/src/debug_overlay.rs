//! Debug overlay (F3)
//!
//! Starts visible when `debug` is set in the config.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use shared::{Avatar, CameraHolder, ChunkCoord, PropKind, SolidGrid, WalkConfig};

use crate::props::{count_props, EnvironmentProp};
use crate::systems::{process_player_movement, FrameStats, WorldSetup};

pub struct DebugOverlayPlugin;

impl Plugin for DebugOverlayPlugin {
    fn build(&self, app: &mut App) {
        // FPS diagnostics for the overlay
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_systems(Startup, spawn_debug_overlay.in_set(WorldSetup::Populate))
            .add_systems(
                Update,
                (
                    toggle_debug_overlay,
                    update_debug_overlay.after(process_player_movement),
                ),
            );
    }
}

/// Whether the overlay is currently shown
#[derive(Resource, Default)]
pub struct OverlayEnabled(pub bool);

/// Root node of the overlay
#[derive(Component)]
pub struct DebugOverlay;

/// FPS line
#[derive(Component)]
pub struct FpsText;

/// Pose, flags and counters
#[derive(Component)]
pub struct StatsText;

pub fn spawn_debug_overlay(mut commands: Commands, config: Res<WalkConfig>) {
    commands.insert_resource(OverlayEnabled(config.debug));

    commands
        .spawn((
            DebugOverlay,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            BorderRadius::all(Val::Px(4.0)),
            if config.debug {
                Visibility::Visible
            } else {
                Visibility::Hidden
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                FpsText,
                Text::new("FPS: --"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.0, 1.0, 0.0)),
            ));

            parent.spawn((
                StatsText,
                Text::new(""),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.85)),
            ));

            parent.spawn((
                Text::new("[F3] toggle"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ));
        });
}

pub fn toggle_debug_overlay(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut enabled: ResMut<OverlayEnabled>,
) {
    if keyboard.just_pressed(KeyCode::F3) {
        enabled.0 = !enabled.0;
        info!("Debug overlay: {}", if enabled.0 { "ON" } else { "OFF" });
    }
}

pub fn update_debug_overlay(
    enabled: Res<OverlayEnabled>,
    diagnostics: Res<DiagnosticsStore>,
    stats: Res<FrameStats>,
    solids: Res<SolidGrid>,
    avatars: Query<&Avatar, With<CameraHolder>>,
    props: Query<&EnvironmentProp>,
    mut overlay_query: Query<&mut Visibility, With<DebugOverlay>>,
    mut fps_text_query: Query<(&mut Text, &mut TextColor), With<FpsText>>,
    mut stats_text_query: Query<&mut Text, (With<StatsText>, Without<FpsText>)>,
) {
    for mut visibility in overlay_query.iter_mut() {
        visibility.set_if_neq(if enabled.0 {
            Visibility::Visible
        } else {
            Visibility::Hidden
        });
    }

    if !enabled.0 {
        return;
    }

    if let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
    {
        for (mut text, mut color) in fps_text_query.iter_mut() {
            text.0 = format!("FPS: {:.0}", fps);
            *color = if fps >= 55.0 {
                TextColor(Color::srgb(0.2, 1.0, 0.2))
            } else if fps >= 30.0 {
                TextColor(Color::srgb(1.0, 0.8, 0.0))
            } else {
                TextColor(Color::srgb(1.0, 0.2, 0.2))
            };
        }
    }

    let Ok(avatar) = avatars.single() else {
        return;
    };

    let flags = stats.collisions;
    let chunk = ChunkCoord::from_world_pos(avatar.position);
    let mark = |blocked: bool| if blocked { "X" } else { "." };
    let lines = format!(
        "Pos: {:.2} {:.2} {:.2}  Chunk: {} {}\nYaw: {:.1}  Pitch: {:.1}\nBlocked T{} B{} L{} R{}\nStep fps: {:.0}\nSolids: {}  Trees: {}  Rocks: {}",
        avatar.position.x,
        avatar.position.y,
        avatar.position.z,
        chunk.x,
        chunk.z,
        avatar.yaw().to_degrees(),
        avatar.pitch.to_degrees(),
        mark(flags.top),
        mark(flags.bottom),
        mark(flags.left),
        mark(flags.right),
        stats.fps,
        solids.len(),
        count_props(&props, PropKind::Tree),
        count_props(&props, PropKind::Rock),
    );

    for mut text in stats_text_query.iter_mut() {
        text.0 = lines.clone();
    }
}
