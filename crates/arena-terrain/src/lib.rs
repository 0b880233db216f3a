//! Terrain for the tank arena.
//!
//! Tile classification, speed modifiers, 3×3 neighbourhood checks for spawn
//! validation, and seeded re-scatter between rounds.

pub use arena_core as core;

pub mod grid;
pub mod provider;

pub use grid::{ScatterDensity, TileGrid};
pub use provider::{class_speed_modifier, TerrainProvider};
