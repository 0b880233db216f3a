//! Hazard and obstacle state machines for the tank arena.
//!
//! Timed gates, mines, lightning strikes and shield barriers. Every
//! transition is a pure function over plain data; the simulation applies
//! the results to its entities.

pub mod gate;
pub mod lightning;
pub mod mine;
pub mod shield;

pub use arena_core as core;
