//! Headless host for the tank arena.
//!
//! Runs the simulation engine on its own thread and exposes commands and
//! snapshots to whoever drives it.

pub mod demo;
pub mod game_loop;
pub mod state;

pub use arena_core as core;
