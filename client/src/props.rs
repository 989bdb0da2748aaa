//! Environmental props - trees and rocks scattered over the terrain.
//!
//! Scenes are spawned straight away with handles that may still be loading; a
//! prop whose model never loads simply stays invisible. Level sites are kept
//! clear of props.

use bevy::prelude::*;
use shared::{scatter_props, Ground, PropKind, WalkConfig, WorldKind, CHUNK_SIZE};

use crate::systems::{ClientWorldRoot, WorldSetup};

pub struct PropsPlugin;

impl Plugin for PropsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_props.in_set(WorldSetup::Populate));
    }
}

/// Marker for environment prop entities
#[derive(Component)]
pub struct EnvironmentProp {
    pub kind: PropKind,
}

pub fn spawn_props(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<WalkConfig>,
    ground: Res<Ground>,
    world_root_query: Query<Entity, With<ClientWorldRoot>>,
) {
    let Ok(world_root) = world_root_query.single() else {
        return;
    };

    // Props cover the whole generated chunk field
    let map_size = (2 * config.world.chunk_radius + 1) as f32 * CHUNK_SIZE;
    let world = &config.world;

    for (kind, count) in [(PropKind::Tree, world.tree_count), (PropKind::Rock, world.rock_count)] {
        let scene: Handle<Scene> = asset_server.load(kind.scene_path());

        let placements = scatter_props(world.prop_seed, kind, count, map_size, &ground);
        info!("Scattering {} {} props", placements.len(), kind.id());

        for placement in placements {
            let prop = commands
                .spawn((
                    SceneRoot(scene.clone()),
                    Transform::from_translation(placement.position).with_rotation(placement.rotation),
                    EnvironmentProp { kind },
                    WorldKind::Model,
                ))
                .id();
            commands.entity(world_root).add_child(prop);
        }
    }
}

/// Count of props per kind, for the debug overlay
pub fn count_props(props: &Query<&EnvironmentProp>, kind: PropKind) -> usize {
    props.iter().filter(|p| p.kind == kind).count()
}
