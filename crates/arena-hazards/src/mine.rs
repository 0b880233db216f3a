//! Mine lifecycle: arming → armed → triggered → detonated.
//!
//! The owner cannot trigger its own mine but is not spared from the blast.

use arena_core::enums::MinePhase;
use arena_core::tuning::MineTuning;
use glam::Vec2;

/// Minimal view of a tank for proximity scans.
#[derive(Debug, Clone, Copy)]
pub struct TankProbe {
    pub player: usize,
    pub pos: Vec2,
    pub alive: bool,
}

/// Input to the mine FSM for a single mine.
pub struct MineContext<'a> {
    pub phase: MinePhase,
    pub pos: Vec2,
    pub owner: Option<usize>,
    pub tanks: &'a [TankProbe],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineEvent {
    Armed,
    Triggered { by: usize },
    Detonate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineUpdate {
    pub phase: MinePhase,
    pub event: Option<MineEvent>,
}

/// Phase of a freshly placed mine.
pub fn placed(tuning: &MineTuning) -> MinePhase {
    if tuning.arm_ticks == 0 {
        MinePhase::Armed
    } else {
        MinePhase::Arming {
            remaining: tuning.arm_ticks,
        }
    }
}

pub fn is_armed(phase: MinePhase) -> bool {
    matches!(phase, MinePhase::Armed)
}

/// Advance one tick. Arming does not scan on the tick it completes.
pub fn step(ctx: &MineContext<'_>, tuning: &MineTuning) -> MineUpdate {
    match ctx.phase {
        MinePhase::Arming { remaining } => {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                MineUpdate {
                    phase: MinePhase::Armed,
                    event: Some(MineEvent::Armed),
                }
            } else {
                MineUpdate {
                    phase: MinePhase::Arming { remaining },
                    event: None,
                }
            }
        }
        MinePhase::Armed => match first_intruder(ctx, tuning) {
            Some(by) => MineUpdate {
                phase: trip(tuning),
                event: Some(MineEvent::Triggered { by }),
            },
            None => MineUpdate {
                phase: MinePhase::Armed,
                event: None,
            },
        },
        MinePhase::Triggered { remaining } => {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                MineUpdate {
                    phase: MinePhase::Detonated,
                    event: Some(MineEvent::Detonate),
                }
            } else {
                MineUpdate {
                    phase: MinePhase::Triggered { remaining },
                    event: None,
                }
            }
        }
        MinePhase::Detonated => MineUpdate {
            phase: MinePhase::Detonated,
            event: None,
        },
    }
}

fn trip(tuning: &MineTuning) -> MinePhase {
    MinePhase::Triggered {
        remaining: tuning.detonation_ticks.max(1),
    }
}

/// First living non-owner tank inside the trigger radius.
fn first_intruder(ctx: &MineContext<'_>, tuning: &MineTuning) -> Option<usize> {
    ctx.tanks
        .iter()
        .filter(|t| t.alive && Some(t.player) != ctx.owner)
        .find(|t| t.pos.distance(ctx.pos) <= tuning.trigger_radius)
        .map(|t| t.player)
}

/// Trip an armed mine from outside (a projectile hit). Other phases are
/// left alone so the arm → trigger → detonate order holds.
pub fn external_trigger(phase: MinePhase, tuning: &MineTuning) -> Option<MinePhase> {
    is_armed(phase).then(|| trip(tuning))
}
