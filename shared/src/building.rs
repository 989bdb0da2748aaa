//! Building-object level files (JSON)
//!
//! An ordered list of floor and wall records:
//!
//! ```json
//! [
//!   { "type": "floor", "position": { "x": 0, "y": 0, "z": 0 }, "material": "Concrete" },
//!   { "type": "wall", "position": { "x": 0, "y": 1, "z": 0 }, "facing": "north", "material": "Rust" }
//! ]
//! ```
//!
//! Walls are thin slabs pushed against one side of their cell by `facing`.

use bevy::prelude::*;
use serde::Deserialize;

use crate::level::{LevelLayout, LevelPiece};
use crate::surface::Surface;

/// Offset of a wall slab from the cell centre
const WALL_OFFSET: f32 = 0.45;
/// Thickness of a wall slab
const WALL_THICKNESS: f32 = 0.1;
const FLOOR_THICKNESS: f32 = 0.2;
const FLOOR_DROP: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ObjectPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<ObjectPosition> for Vec3 {
    fn from(p: ObjectPosition) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    North,
    South,
    West,
    East,
}

impl Facing {
    pub fn from_name(name: &str) -> Option<Facing> {
        match name {
            "north" => Some(Facing::North),
            "south" => Some(Facing::South),
            "west" => Some(Facing::West),
            "east" => Some(Facing::East),
            _ => None,
        }
    }
}

/// One record as written in the file. Unknown `type`, `facing` or `material`
/// strings are kept so the loader can report them instead of rejecting the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildingObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: ObjectPosition,
    #[serde(default)]
    pub facing: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
}

impl BuildingObject {
    fn surface(&self) -> Surface {
        match self.material.as_deref() {
            None => Surface::default(),
            Some(name) => Surface::from_name(name).unwrap_or_else(|| {
                warn!("Unknown building material {:?}, using {}", name, Surface::default().name());
                Surface::default()
            }),
        }
    }

    /// Geometry for this record, `None` for unknown object types.
    ///
    /// A wall without a recognised facing keeps a full, unoffset cube. Level
    /// authors get a warning; the placement is left as-is on purpose.
    pub fn placement(&self) -> Option<LevelPiece> {
        let mut position: Vec3 = self.position.into();
        let mut scale = Vec3::ONE;

        match self.kind.as_str() {
            "floor" => {
                scale.y = FLOOR_THICKNESS;
                position.y -= FLOOR_DROP;
            }
            "wall" => match self.facing.as_deref().and_then(Facing::from_name) {
                Some(Facing::North) => {
                    scale.z = WALL_THICKNESS;
                    position.z += WALL_OFFSET;
                }
                Some(Facing::South) => {
                    scale.z = WALL_THICKNESS;
                    position.z -= WALL_OFFSET;
                }
                Some(Facing::West) => {
                    scale.x = WALL_THICKNESS;
                    position.x += WALL_OFFSET;
                }
                Some(Facing::East) => {
                    scale.x = WALL_THICKNESS;
                    position.x -= WALL_OFFSET;
                }
                None => {
                    warn!(
                        "Wall at {:?} has no recognised facing ({:?}); placing a full cube",
                        self.position, self.facing
                    );
                }
            },
            other => {
                warn!("Skipping building object of unknown type {:?}", other);
                return None;
            }
        }

        Some(LevelPiece::scaled(self.surface(), position, scale))
    }
}

pub fn parse_buildings(json: &str) -> Result<Vec<BuildingObject>, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid building file: {e}"))
}

/// Parse a building file straight into level geometry, in file order.
///
/// The avatar walks on the lowest record's base: the top of a floor slab, or
/// the bottom of a wall when there are no floors.
pub fn building_layout(json: &str) -> Result<LevelLayout, String> {
    let objects = parse_buildings(json)?;
    let floor_height = objects
        .iter()
        .map(|o| o.position.y - 0.5)
        .reduce(f32::min)
        .unwrap_or_default();

    Ok(LevelLayout {
        pieces: objects.iter().filter_map(BuildingObject::placement).collect(),
        spawn: None,
        floor_height,
    })
}
