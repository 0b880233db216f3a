//! Commands fed to the simulation by input, AI and relay providers.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Desired control state for one tank. Axes are clamped to [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TankIntent {
    /// +1 forward, -1 reverse.
    pub forward: f32,
    /// +1 turns toward +angle.
    pub turn: f32,
    pub fire: bool,
}

impl TankIntent {
    /// Clamp the axes; non-finite input reads as 0.
    pub fn clamped(self) -> Self {
        let axis = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            forward: axis(self.forward),
            turn: axis(self.turn),
            fire: self.fire,
        }
    }
}

/// All possible player/host actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start (or restart) a match in the given mode.
    StartMatch { mode: GameMode },
    /// Replace a tank's control intent.
    SetIntent { player: usize, intent: TankIntent },
    Pause,
    Resume,
    /// Reset the round immediately without scoring.
    ForceReset,
}
