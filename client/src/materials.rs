//! One textured material per `Surface`, built once at startup

use bevy::prelude::*;
use shared::Surface;
use std::collections::HashMap;

#[derive(Resource, Default)]
pub struct SurfaceMaterials {
    materials: HashMap<Surface, Handle<StandardMaterial>>,
}

impl SurfaceMaterials {
    /// Material for a surface. Every surface is registered at startup; an empty
    /// handle (default material) is returned only if that setup has not run.
    pub fn get(&self, surface: Surface) -> Handle<StandardMaterial> {
        self.materials.get(&surface).cloned().unwrap_or_default()
    }
}

/// Texture loads are fire-and-forget: a missing file leaves the surface
/// untextured and Bevy logs the failure.
pub fn setup_surface_materials(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut by_surface = HashMap::new();
    for surface in Surface::all().iter().copied() {
        let material = materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(surface.texture_path())),
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        });
        by_surface.insert(surface, material);
    }

    commands.insert_resource(SurfaceMaterials {
        materials: by_surface,
    });
}
