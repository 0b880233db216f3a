//! Core types and definitions for the tank arena simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, state snapshots, events, constants,
//! the tuning table and the error type. It contains no simulation logic.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod tuning;
pub mod types;
