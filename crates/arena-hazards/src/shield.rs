//! Shield barrier: a stationary directional wall with its own health pool.

use arena_core::enums::ShieldPhase;
use arena_core::tuning::ShieldTuning;
use arena_core::types::heading;
use glam::Vec2;

pub fn raised(tuning: &ShieldTuning) -> ShieldPhase {
    ShieldPhase::Active {
        remaining: tuning.lifetime_ticks.max(1),
    }
}

/// Advance one tick. Collapses when its lifetime runs out or its health is gone.
pub fn step(phase: ShieldPhase, health: u32) -> ShieldPhase {
    match phase {
        ShieldPhase::Active { .. } if health == 0 => ShieldPhase::Collapsed,
        ShieldPhase::Active { remaining } => {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                ShieldPhase::Collapsed
            } else {
                ShieldPhase::Active { remaining }
            }
        }
        ShieldPhase::Collapsed => ShieldPhase::Collapsed,
    }
}

/// True if a projectile at `pos` (radius `r`) travelling along `dir` is
/// stopped by the barrier. Only projectiles moving against the facing
/// direction are blocked.
pub fn blocks(
    shield_pos: Vec2,
    facing: f32,
    tuning: &ShieldTuning,
    pos: Vec2,
    r: f32,
    dir: Vec2,
) -> bool {
    let normal = heading(facing);
    if dir.dot(normal) >= 0.0 {
        return false;
    }
    let d = pos - shield_pos;
    let along = d.dot(normal).abs();
    let lateral = d.dot(normal.perp()).abs();
    along <= tuning.thickness * 0.5 + r && lateral <= tuning.length * 0.5 + r
}

/// Take one hit. Returns the remaining health.
pub fn absorb(health: u32) -> u32 {
    health.saturating_sub(1)
}
