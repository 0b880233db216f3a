//! Lightning strike: a telegraphed charge, one flat-damage strike, then a
//! short visible bolt before removal.

use arena_core::enums::LightningPhase;
use arena_core::tuning::LightningTuning;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightningUpdate {
    pub phase: LightningPhase,
    /// Damage is applied on this tick.
    pub strike: bool,
    /// The hazard can be removed.
    pub finished: bool,
}

pub fn charging(tuning: &LightningTuning) -> LightningPhase {
    LightningPhase::Charging {
        remaining: tuning.charge_ticks.max(1),
    }
}

pub fn step(phase: LightningPhase, tuning: &LightningTuning) -> LightningUpdate {
    match phase {
        LightningPhase::Charging { remaining } => {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                LightningUpdate {
                    phase: LightningPhase::Striking {
                        remaining: tuning.strike_ticks,
                    },
                    strike: true,
                    finished: false,
                }
            } else {
                LightningUpdate {
                    phase: LightningPhase::Charging { remaining },
                    strike: false,
                    finished: false,
                }
            }
        }
        LightningPhase::Striking { remaining } => {
            let remaining = remaining.saturating_sub(1);
            let phase = if remaining == 0 {
                LightningPhase::Done
            } else {
                LightningPhase::Striking { remaining }
            };
            LightningUpdate {
                phase,
                strike: false,
                finished: phase == LightningPhase::Done,
            }
        }
        LightningPhase::Done => LightningUpdate {
            phase,
            strike: false,
            finished: true,
        },
    }
}

/// Flat strike damage if `target` is inside the strike radius.
pub fn strike_damage(center: Vec2, target: Vec2, tuning: &LightningTuning) -> Option<f32> {
    (center.distance(target) <= tuning.radius).then_some(tuning.damage)
}
