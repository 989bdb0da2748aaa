//! World systems
//!
//! World root, lights and the sky sphere, plus keeping the avatar light and
//! the sky centred on the viewer.

use bevy::prelude::*;
use bevy::render::render_resource::Face;
use shared::{Avatar, AvatarLight, CameraHolder, WalkConfig, WorldKind};

use crate::materials::setup_surface_materials;

/// Startup phases, run in order with commands applied between them
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorldSetup {
    /// Materials, parsed levels, flattened ground
    Resources,
    /// World root, lights, sky, camera holder
    Root,
    /// Terrain, level pieces, props, UI
    Populate,
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Startup,
            (WorldSetup::Resources, WorldSetup::Root, WorldSetup::Populate).chain(),
        )
        .add_systems(Startup, setup_surface_materials.in_set(WorldSetup::Resources))
        .add_systems(Startup, spawn_world.in_set(WorldSetup::Root));
    }
}

// =============================================================================
// COMPONENTS
// =============================================================================

/// Root entity for all client-side world visuals
#[derive(Component)]
pub struct ClientWorldRoot;

/// Marker for the sun directional light
#[derive(Component)]
pub struct SunLight;

/// Marker for the background sphere (also tagged `WorldKind::Background`)
#[derive(Component)]
pub struct SkySphere;

const SKY_RADIUS: f32 = 512.0;
const SKY_TEXTURE: &str = "backgrounds/clouds.jpg";

// =============================================================================
// SPAWNING
// =============================================================================

/// Spawn the world root, lights and sky
pub fn spawn_world(
    mut commands: Commands,
    world_roots: Query<Entity, With<ClientWorldRoot>>,
    config: Res<WalkConfig>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !world_roots.is_empty() {
        return;
    }

    let root = commands
        // Parent of terrain chunks / props / level pieces.
        // It must have GlobalTransform or Bevy will emit B0004 warnings for children.
        .spawn((
            ClientWorldRoot,
            Transform::default(),
            GlobalTransform::default(),
            Visibility::default(),
            InheritedVisibility::default(),
        ))
        .id();

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: config.lights.ambient_brightness,
        affects_lightmapped_meshes: true,
    });
    commands.insert_resource(ClearColor(Color::srgb(0.55, 0.65, 0.8)));

    // Low warm sun, 45 degrees up, aimed at the origin
    let sun = commands
        .spawn((
            SunLight,
            DirectionalLight {
                illuminance: config.lights.sun_illuminance,
                color: Color::srgb_u8(0xff, 0x66, 0x44),
                shadows_enabled: true,
                ..default()
            },
            Transform::from_xyz(1.0, 0.5, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
        ))
        .id();
    commands.entity(root).add_child(sun);

    // Lantern carried by the avatar (re-centred every frame)
    commands.spawn((
        AvatarLight,
        PointLight {
            color: Color::srgb_u8(0xff, 0xbb, 0x66),
            intensity: config.lights.avatar_light_intensity,
            range: 20.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, config.movement.eye_height, 0.0),
    ));

    // Sky sphere seen from the inside
    let sky_material = materials.add(StandardMaterial {
        base_color_texture: Some(asset_server.load(SKY_TEXTURE)),
        unlit: true,
        cull_mode: Some(Face::Front),
        fog_enabled: false,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(SKY_RADIUS).mesh().uv(32, 16))),
        MeshMaterial3d(sky_material),
        Transform::default(),
        SkySphere,
        WorldKind::Background,
    ));

    info!("Spawned world root, lights and sky");
}

// =============================================================================
// PER-FRAME
// =============================================================================

/// Keep the avatar light and the sky sphere on the viewer
pub fn recenter_on_avatar(
    avatars: Query<&Avatar, With<CameraHolder>>,
    mut attached: Query<
        &mut Transform,
        (Or<(With<AvatarLight>, With<SkySphere>)>, Without<CameraHolder>),
    >,
) {
    let Ok(avatar) = avatars.single() else {
        return;
    };

    for mut transform in attached.iter_mut() {
        transform.translation = avatar.position;
    }
}
