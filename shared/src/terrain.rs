//! Procedural terrain heightfield and chunk mesh data
//!
//! [`elevation`] is the raw heightfield. Chunk vertices, prop placement and the
//! avatar's ground snap all sample it through [`Ground::height`], so the avatar
//! always stands exactly on the rendered surface.
//!
//! Scale: 1 unit = 1 block (~1 meter)

use bevy::prelude::*;

use crate::ground::Ground;

/// Chunk size in world units
pub const CHUNK_SIZE: f32 = 16.0;
/// Quads per chunk side
pub const CHUNK_SEGMENTS: usize = 16;
/// Vertices per chunk side
pub const CHUNK_RESOLUTION: usize = CHUNK_SEGMENTS + 1;
/// Spacing between vertices
pub const VERTEX_SPACING: f32 = CHUNK_SIZE / CHUNK_SEGMENTS as f32;

/// Horizontal frequency of the heightfield
pub const ELEVATION_SCALE: f32 = 0.05;
/// Peak height of the heightfield (units)
pub const ELEVATION_AMPLITUDE: f32 = 10.0;

/// How many times the ground texture repeats across one chunk
const UV_TILES_PER_CHUNK: f32 = 4.0;

/// Terrain height at a horizontal world position.
#[inline]
pub fn elevation(x: f32, z: f32) -> f32 {
    (x * ELEVATION_SCALE).sin() * (z * ELEVATION_SCALE).cos() * ELEVATION_AMPLITUDE
}

/// Chunk coordinate (integer grid position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world position. Chunk (0, 0) is centred on the origin.
    pub fn from_world_pos(pos: Vec3) -> Self {
        Self {
            x: (pos.x / CHUNK_SIZE + 0.5).floor() as i32,
            z: (pos.z / CHUNK_SIZE + 0.5).floor() as i32,
        }
    }

    /// World position of the chunk's centre (at zero height)
    pub fn world_center(&self) -> Vec3 {
        Vec3::new(self.x as f32 * CHUNK_SIZE, 0.0, self.z as f32 * CHUNK_SIZE)
    }

    /// Get chunks in a square radius around this chunk
    pub fn chunks_in_radius(&self, radius: i32) -> Vec<ChunkCoord> {
        let mut chunks = Vec::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                chunks.push(ChunkCoord::new(self.x + dx, self.z + dz));
            }
        }
        chunks
    }
}

/// Generated mesh data for a terrain chunk, local to the chunk centre
pub struct ChunkMeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// Build the vertex grid for one chunk.
///
/// Vertex heights are absolute (ground height at the vertex's world position) so
/// the chunk entity only needs a horizontal translation to its centre.
pub fn generate_chunk_mesh(coord: ChunkCoord, ground: &Ground) -> ChunkMeshData {
    let center = coord.world_center();
    let half = CHUNK_SIZE * 0.5;

    let vertex_count = CHUNK_RESOLUTION * CHUNK_RESOLUTION;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(CHUNK_SEGMENTS * CHUNK_SEGMENTS * 6);

    for zi in 0..CHUNK_RESOLUTION {
        for xi in 0..CHUNK_RESOLUTION {
            let local_x = xi as f32 * VERTEX_SPACING - half;
            let local_z = zi as f32 * VERTEX_SPACING - half;
            let world_x = center.x + local_x;
            let world_z = center.z + local_z;

            positions.push([local_x, ground.height(world_x, world_z), local_z]);
            uvs.push([
                xi as f32 / CHUNK_SEGMENTS as f32 * UV_TILES_PER_CHUNK,
                zi as f32 / CHUNK_SEGMENTS as f32 * UV_TILES_PER_CHUNK,
            ]);
        }
    }

    // Central differences on the heightfield itself, so normals stay continuous
    // across chunk seams.
    for zi in 0..CHUNK_RESOLUTION {
        for xi in 0..CHUNK_RESOLUTION {
            let idx = zi * CHUNK_RESOLUTION + xi;
            let world_x = center.x + positions[idx][0];
            let world_z = center.z + positions[idx][2];

            let h_left = ground.height(world_x - VERTEX_SPACING, world_z);
            let h_right = ground.height(world_x + VERTEX_SPACING, world_z);
            let h_down = ground.height(world_x, world_z - VERTEX_SPACING);
            let h_up = ground.height(world_x, world_z + VERTEX_SPACING);

            let normal = Vec3::new(h_left - h_right, 2.0 * VERTEX_SPACING, h_down - h_up).normalize();
            normals.push([normal.x, normal.y, normal.z]);
        }
    }

    for zi in 0..CHUNK_SEGMENTS {
        for xi in 0..CHUNK_SEGMENTS {
            let top_left = (zi * CHUNK_RESOLUTION + xi) as u32;
            let top_right = top_left + 1;
            let bottom_left = top_left + CHUNK_RESOLUTION as u32;
            let bottom_right = bottom_left + 1;

            indices.push(top_left);
            indices.push(bottom_left);
            indices.push(top_right);

            indices.push(top_right);
            indices.push(bottom_left);
            indices.push(bottom_right);
        }
    }

    ChunkMeshData {
        positions,
        normals,
        uvs,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_golden_values() {
        assert_eq!(elevation(0.0, 0.0), 0.0);
        // sin(1) * cos(0) * 10
        let h = elevation(20.0, 0.0);
        assert!((h - 8.4147).abs() < 1e-3, "got {h}");
    }

    #[test]
    fn test_chunk_vertices_sit_on_elevation() {
        let coord = ChunkCoord::new(2, -3);
        let center = coord.world_center();
        let mesh = generate_chunk_mesh(coord, &Ground::default());

        assert_eq!(mesh.positions.len(), CHUNK_RESOLUTION * CHUNK_RESOLUTION);
        for p in &mesh.positions {
            let expected = elevation(center.x + p[0], center.z + p[2]);
            assert_eq!(p[1], expected);
        }
    }

    #[test]
    fn test_chunk_vertices_follow_flattened_ground() {
        let mut ground = Ground::default();
        ground.flatten(Rect::new(-3.0, -3.0, 3.0, 3.0), 1.25);
        let mesh = generate_chunk_mesh(ChunkCoord::new(0, 0), &ground);

        for p in &mesh.positions {
            assert_eq!(p[1], ground.height(p[0], p[2]));
            if p[0].abs() <= 3.0 && p[2].abs() <= 3.0 {
                assert_eq!(p[1], 1.25);
            }
        }
    }

    #[test]
    fn test_chunk_edges_meet() {
        // Right edge of chunk (0,0) and left edge of chunk (1,0) share heights
        let a = generate_chunk_mesh(ChunkCoord::new(0, 0), &Ground::default());
        let b = generate_chunk_mesh(ChunkCoord::new(1, 0), &Ground::default());
        for zi in 0..CHUNK_RESOLUTION {
            let right = a.positions[zi * CHUNK_RESOLUTION + CHUNK_SEGMENTS][1];
            let left = b.positions[zi * CHUNK_RESOLUTION][1];
            assert!((right - left).abs() < 1e-5);
        }
    }

    #[test]
    fn test_chunk_coord_round_trip() {
        let coord = ChunkCoord::new(-4, 7);
        assert_eq!(ChunkCoord::from_world_pos(coord.world_center()), coord);
        // Just inside the +x edge still belongs to the same chunk
        let edge = coord.world_center() + Vec3::new(CHUNK_SIZE * 0.5 - 0.01, 0.0, 0.0);
        assert_eq!(ChunkCoord::from_world_pos(edge), coord);
    }

    #[test]
    fn test_chunks_in_radius_is_square() {
        let chunks = ChunkCoord::new(0, 0).chunks_in_radius(10);
        assert_eq!(chunks.len(), 21 * 21);
    }
}
