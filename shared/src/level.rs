//! ASCII map levels
//!
//! Each line of the map is a row along +Z, each character a column along +X;
//! one character is one 1x1 cell.
//!
//! | char  | contents                                   |
//! |-------|--------------------------------------------|
//! | `w`   | two stacked wall cubes                     |
//! | `d`   | door across X (plus lintel, floor, roof)   |
//! | `D`   | door across Z (plus lintel, floor, roof)   |
//! | `e`   | emergency exit sign across X (floor, roof) |
//! | `E`   | emergency exit sign across Z (floor, roof) |
//! | `p`   | player spawn (floor, roof)                 |
//! | other | floor and roof                             |

use bevy::prelude::*;

use crate::ground::{settle_on_terrain, Ground};
use crate::surface::Surface;

/// Top of the map's floor cubes, where the avatar's feet stand
pub const MAP_FLOOR_HEIGHT: f32 = 0.5;

/// One unit cube of level geometry, already scaled and positioned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPiece {
    pub position: Vec3,
    pub scale: Vec3,
    pub surface: Surface,
}

impl LevelPiece {
    pub fn cube(surface: Surface, position: Vec3) -> Self {
        Self {
            position,
            scale: Vec3::ONE,
            surface,
        }
    }

    pub fn scaled(surface: Surface, position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            scale,
            surface,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_scale(self.scale)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LevelLayout {
    pub pieces: Vec<LevelPiece>,
    /// Cell (x, z) marked `p`, if any
    pub spawn: Option<Vec2>,
    /// Height the avatar walks at, before the level is settled on the terrain
    pub floor_height: f32,
}

impl LevelLayout {
    /// Lift the pieces onto the terrain and flatten the ground under them.
    pub fn settle_on(&mut self, ground: &mut Ground) -> Option<f32> {
        settle_on_terrain(&mut self.pieces, self.floor_height, ground)
    }
}

/// Orientation of a thin feature inside its cell
#[derive(Clone, Copy)]
enum Across {
    /// Spans the cell along X (thin in Z)
    X,
    /// Spans the cell along Z (thin in X)
    Z,
}

fn floor_and_roof(pieces: &mut Vec<LevelPiece>, x: f32, z: f32) {
    pieces.push(LevelPiece::cube(Surface::Concrete, Vec3::new(x, 0.0, z)));
    pieces.push(LevelPiece::cube(Surface::Plaster, Vec3::new(x, 3.0, z)));
}

fn door(pieces: &mut Vec<LevelPiece>, x: f32, z: f32, across: Across) {
    let scale = match across {
        Across::X => Vec3::new(1.0, 1.8, 0.2),
        Across::Z => Vec3::new(0.2, 1.8, 1.0),
    };
    pieces.push(LevelPiece::scaled(Surface::Steel, Vec3::new(x, 1.4, z), scale));
    pieces.push(LevelPiece::scaled(
        Surface::Rust,
        Vec3::new(x, 2.4, z),
        Vec3::new(1.0, 0.2, 1.0),
    ));
}

fn exit_sign(pieces: &mut Vec<LevelPiece>, x: f32, z: f32, across: Across) {
    let scale = match across {
        Across::X => Vec3::new(0.6, 0.3, 0.05),
        Across::Z => Vec3::new(0.05, 0.3, 0.6),
    };
    pieces.push(LevelPiece::scaled(Surface::EmergencyExit, Vec3::new(x, 2.6, z), scale));
}

/// Build level geometry from map text. Never fails: unknown cells get floor and roof.
pub fn parse_map(map: &str) -> LevelLayout {
    let mut layout = LevelLayout {
        floor_height: MAP_FLOOR_HEIGHT,
        ..default()
    };

    for (row, line) in map.lines().enumerate() {
        let z = row as f32;
        for (col, ch) in line.trim_end_matches('\r').chars().enumerate() {
            let x = col as f32;
            let pieces = &mut layout.pieces;
            match ch {
                'w' => {
                    pieces.push(LevelPiece::cube(Surface::Rust, Vec3::new(x, 1.0, z)));
                    pieces.push(LevelPiece::cube(Surface::Rust, Vec3::new(x, 2.0, z)));
                }
                'd' => {
                    door(pieces, x, z, Across::X);
                    floor_and_roof(pieces, x, z);
                }
                'D' => {
                    door(pieces, x, z, Across::Z);
                    floor_and_roof(pieces, x, z);
                }
                'e' => {
                    exit_sign(pieces, x, z, Across::X);
                    floor_and_roof(pieces, x, z);
                }
                'E' => {
                    exit_sign(pieces, x, z, Across::Z);
                    floor_and_roof(pieces, x, z);
                }
                'p' => {
                    floor_and_roof(pieces, x, z);
                    layout.spawn = Some(Vec2::new(x, z));
                }
                _ => floor_and_roof(pieces, x, z),
            }
        }
    }

    layout
}
