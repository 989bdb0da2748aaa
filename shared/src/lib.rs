//! Game logic shared by the walkabout client and its tests
//!
//! Nothing in here renders: it is plain data and math over Bevy types, so every
//! rule (movement, collision probes, terrain height, level layout, culling) can
//! be unit tested without a window.

pub mod building;
pub mod components;
pub mod config;
pub mod ground;
pub mod level;
pub mod movement;
pub mod player;
pub mod props;
pub mod spatial;
pub mod surface;
pub mod terrain;
pub mod visibility;

pub use building::{building_layout, parse_buildings, BuildingObject, Facing};
pub use components::{AvatarLight, CameraHolder, WorldKind};
pub use config::{LevelSources, LightConfig, MovementConfig, RenderDistances, WalkConfig, WorldGenConfig};
pub use ground::Ground;
pub use level::{parse_map, LevelLayout, LevelPiece};
pub use movement::{fps_from_elapsed, step_avatar, CollisionFlags, MoveKeys};
pub use player::*;
pub use props::{scatter_props, PropKind, PropPlacement};
pub use spatial::{Aabb, SolidEntry, SolidGrid};
pub use surface::Surface;
pub use terrain::{elevation, generate_chunk_mesh, ChunkCoord, ChunkMeshData, CHUNK_SIZE};
pub use visibility::is_visible;

/// Config file, relative to the working directory or the bundled asset folder
pub const CONFIG_FILE: &str = "config.ron";
