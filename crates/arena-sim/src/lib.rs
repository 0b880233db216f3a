//! Simulation engine for the tank arena.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for renderers and UI.

pub mod engine;
pub mod round;
pub mod systems;
pub mod weapons;
pub mod world_setup;

pub use arena_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use world_setup::ArenaLayout;

#[cfg(test)]
mod tests;
