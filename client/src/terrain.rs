//! Client-side terrain rendering
//!
//! The whole chunk field is built once at startup; far chunks are hidden by the
//! visibility pass rather than despawned.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, VertexAttributeValues};
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use shared::{generate_chunk_mesh, ChunkCoord, Ground, Surface, WalkConfig, WorldKind};

use crate::materials::SurfaceMaterials;
use crate::systems::{ClientWorldRoot, WorldSetup};

pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_terrain_chunks.in_set(WorldSetup::Populate));
    }
}

pub fn spawn_terrain_chunks(
    config: Res<WalkConfig>,
    ground: Res<Ground>,
    surfaces: Res<SurfaceMaterials>,
    mut meshes: ResMut<Assets<Mesh>>,
    world_root_query: Query<Entity, With<ClientWorldRoot>>,
    mut commands: Commands,
) {
    let Ok(world_root) = world_root_query.single() else {
        return;
    };

    let material = surfaces.get(Surface::Grass1);
    let coords = ChunkCoord::new(0, 0).chunks_in_radius(config.world.chunk_radius);

    for coord in coords.iter() {
        let mesh_data = generate_chunk_mesh(*coord, &ground);

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            VertexAttributeValues::Float32x3(mesh_data.positions),
        );
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_NORMAL,
            VertexAttributeValues::Float32x3(mesh_data.normals),
        );
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_UV_0,
            VertexAttributeValues::Float32x2(mesh_data.uvs),
        );
        mesh.insert_indices(Indices::U32(mesh_data.indices));

        let chunk_entity = commands
            .spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(coord.world_center()),
                *coord,
                WorldKind::Terrain,
            ))
            .id();
        commands.entity(world_root).add_child(chunk_entity);
    }

    info!("Spawned {} terrain chunks", coords.len());
}
