//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only) plus the borrowed per-tick environment. They do not own state;
//! entity state lives in components and round state in the engine.

pub mod camera;
pub mod damage;
pub mod drones;
pub mod effects;
pub mod explosions;
pub mod hazards;
pub mod obstacles;
pub mod powerups;
pub mod projectiles;
pub mod ring;
pub mod snapshot;
pub mod tanks;
pub mod targets;
pub mod tick_env;
