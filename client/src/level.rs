//! Level geometry: ASCII map and building-object files
//!
//! Levels are read and settled on the terrain before anything is meshed, so
//! the flattened ground under them is part of the terrain chunks, the prop
//! scatter and the avatar's ground snap. Every piece is a unit cube tagged
//! `WorldKind::Collidable`. Solids are indexed into the `SolidGrid` as they
//! appear, so the movement resolver sees them on the frame after they spawn.

use bevy::prelude::*;
use shared::{
    building_layout, parse_map, Aabb, Avatar, CameraHolder, Ground, LevelPiece, SolidEntry, SolidGrid,
    WalkConfig, WorldKind,
};

use crate::materials::SurfaceMaterials;
use crate::settings::AssetRoot;
use crate::systems::{ClientWorldRoot, WorldSetup};

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Ground>()
            .init_resource::<SolidGrid>()
            .add_systems(Startup, load_levels.in_set(WorldSetup::Resources))
            .add_systems(Startup, spawn_level.in_set(WorldSetup::Populate))
            .add_systems(Update, index_new_solids);
    }
}

/// Settled level geometry waiting to be spawned
#[derive(Resource, Default)]
pub struct PendingLevel {
    pub pieces: Vec<LevelPiece>,
    pub spawn: Option<Vec2>,
}

/// Read a level file from the asset folder, logging failures
fn read_level_file(asset_root: &AssetRoot, relative: &str) -> Option<String> {
    let path = asset_root.join(relative);
    match std::fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("Failed to read level file {:?}: {e}", path);
            None
        }
    }
}

/// Parse the configured levels and flatten the ground under them
pub fn load_levels(
    mut commands: Commands,
    config: Res<WalkConfig>,
    asset_root: Res<AssetRoot>,
    mut ground: ResMut<Ground>,
) {
    let mut pending = PendingLevel::default();

    if let Some(map_path) = config.level.map.as_deref() {
        if let Some(text) = read_level_file(&asset_root, map_path) {
            let mut layout = parse_map(&text);
            if let Some(lift) = layout.settle_on(&mut ground) {
                info!("Map {map_path}: {} pieces, lifted {lift:.2}", layout.pieces.len());
            }
            pending.pieces.extend(layout.pieces);
            pending.spawn = layout.spawn;
        }
    }

    if let Some(buildings_path) = config.level.buildings.as_deref() {
        if let Some(text) = read_level_file(&asset_root, buildings_path) {
            match building_layout(&text) {
                Ok(mut layout) => {
                    if let Some(lift) = layout.settle_on(&mut ground) {
                        info!("Buildings {buildings_path}: {} pieces, lifted {lift:.2}", layout.pieces.len());
                    }
                    pending.pieces.extend(layout.pieces);
                }
                Err(e) => error!("{buildings_path}: {e}"),
            }
        }
    }

    commands.insert_resource(pending);
}

pub fn spawn_level(
    mut commands: Commands,
    config: Res<WalkConfig>,
    ground: Res<Ground>,
    mut pending: ResMut<PendingLevel>,
    surfaces: Res<SurfaceMaterials>,
    mut meshes: ResMut<Assets<Mesh>>,
    world_root_query: Query<Entity, With<ClientWorldRoot>>,
    mut avatars: Query<&mut Avatar, With<CameraHolder>>,
) {
    let Ok(world_root) = world_root_query.single() else {
        return;
    };

    if let (Some(spawn), Ok(mut avatar)) = (pending.spawn, avatars.single_mut()) {
        avatar.position = Vec3::new(
            spawn.x,
            ground.height(spawn.x, spawn.y) + config.movement.eye_height,
            spawn.y,
        );
        info!("Player spawn at cell ({}, {})", spawn.x, spawn.y);
    }

    let pieces = std::mem::take(&mut pending.pieces);
    if pieces.is_empty() {
        return;
    }

    let cube = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    for piece in pieces {
        let entity = commands
            .spawn((
                Mesh3d(cube.clone()),
                MeshMaterial3d(surfaces.get(piece.surface)),
                piece.transform(),
                WorldKind::Collidable,
            ))
            .id();
        commands.entity(world_root).add_child(entity);
    }
}

/// Register newly spawned solids in the spatial grid
pub fn index_new_solids(
    new_entities: Query<(&Transform, &WorldKind), Added<WorldKind>>,
    mut grid: ResMut<SolidGrid>,
) {
    let was_empty = grid.is_empty();

    for (transform, kind) in new_entities.iter() {
        if !kind.is_solid() {
            continue;
        }
        grid.insert(SolidEntry {
            position: transform.translation,
            bounds: Aabb::from_unit_cube(transform.translation, transform.scale),
        });
    }

    if was_empty && !grid.is_empty() {
        info!("Indexed {} solids", grid.len());
    }
}
