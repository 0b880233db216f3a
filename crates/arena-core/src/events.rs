//! Events emitted by the simulation for the score/UI provider and audio.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A tank fired (one event per trigger pull, not per projectile).
    Fired { player: usize, weapon: WeaponType },
    /// A tank was destroyed. `killer` is None for hazards and ownerless hits.
    TankDestroyed { player: usize, killer: Option<usize> },
    TankFrozen { player: usize },
    TargetDestroyed { killer: Option<usize> },
    Explosion { pos: Vec2, radius: f32 },
    WallDestroyed { pos: Vec2 },
    MineArmed { pos: Vec2 },
    MineTriggered { pos: Vec2 },
    LightningStrike { pos: Vec2 },
    ShieldCollapsed { pos: Vec2 },
    PowerUpCollected { player: usize, weapon: WeaponType },
    Teleported { player: usize, from: Vec2, to: Vec2 },
    RoundWon { player: usize, score: u32 },
    RoundReset { round: u32 },
    /// An entity was discarded after an update fault.
    EntityFault { what: String, tick: u64 },
}
