//! Client-side per-frame systems
//!
//! Organized into submodules for maintainability.

mod player;
mod visibility;
mod world;

// Re-export everything for easy access from main.rs
pub use player::*;
pub use visibility::*;
pub use world::*;
