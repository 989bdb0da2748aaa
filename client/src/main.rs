//! Walkabout - first-person walk over procedural terrain and ASCII-mapped levels

mod camera;
mod debug_overlay;
mod input;
mod level;
mod materials;
mod props;
mod settings;
mod states;
mod systems;
mod terrain;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use states::GameState;

/// Get the asset path - for bundled macOS apps, use path relative to executable
fn get_asset_path() -> String {
    // Try to find assets relative to executable (for .app bundles)
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled_assets = exe_dir.join("assets");
            if bundled_assets.exists() {
                info!("Using bundled assets at: {:?}", bundled_assets);
                return bundled_assets.to_string_lossy().to_string();
            }
        }
    }
    // Fall back to default "assets" folder (for development)
    "assets".to_string()
}

fn main() {
    let asset_path = get_asset_path();

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Walkabout".to_string(),
                    resolution: WindowResolution::new(1280, 720),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_path.clone(),
                ..default()
            }),
    );

    app.init_state::<GameState>();

    // Config is loaded in PreStartup so every Startup system can read it
    app.add_plugins(settings::SettingsPlugin {
        asset_root: settings::AssetRoot::resolve(&asset_path),
    });

    // Startup phases: resources -> world root and camera -> terrain, level, props, UI
    app.add_plugins(systems::WorldPlugin);
    app.add_plugins(level::LevelPlugin);
    app.add_plugins(camera::CameraPlugin);
    app.add_plugins(terrain::TerrainPlugin);
    app.add_plugins(props::PropsPlugin);
    app.add_plugins(input::InputPlugin);
    app.add_plugins(debug_overlay::DebugOverlayPlugin);

    app.init_resource::<systems::FrameStats>();

    // Per-frame pipeline. ORDER MATTERS (and we enforce it):
    // input -> movement -> culling -> re-centering -> camera.
    // Solids spawned this frame are indexed before movement reads the grid.
    app.add_systems(
        Update,
        (
            input::handle_keyboard_input,
            input::handle_mouse_input,
            systems::process_player_movement,
            systems::cull_far_entities,
            systems::recenter_on_avatar,
            camera::sync_camera_transforms,
        )
            .chain()
            .after(level::index_new_solids)
            .run_if(in_state(GameState::Playing)),
    );

    info!("Starting Walkabout");
    app.run();
}
