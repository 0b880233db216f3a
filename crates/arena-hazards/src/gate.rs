//! Timed gate cycle: open → warning → closing → closed → opening → open.
//!
//! Pure functions over the gate component. No ECS dependency.

use arena_core::components::Gate;
use arena_core::enums::GatePhase;
use arena_core::tuning::GateTuning;
use arena_core::types::Rect;

/// Output of one gate step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateUpdate {
    pub phase: GatePhase,
    pub timer: u32,
    pub open_fraction: f32,
    pub phase_changed: bool,
}

/// Ticks spent in `phase`.
pub fn phase_duration(phase: GatePhase, tuning: &GateTuning) -> u32 {
    match phase {
        GatePhase::Open => tuning.open_ticks,
        GatePhase::Warning => tuning.warning_ticks,
        GatePhase::Closing => tuning.closing_ticks,
        GatePhase::Closed => tuning.closed_ticks,
        GatePhase::Opening => tuning.opening_ticks,
    }
}

/// A fresh gate at the start of its open window.
pub fn new_gate(rect: Rect, tuning: &GateTuning) -> Gate {
    Gate {
        rect,
        phase: GatePhase::Open,
        timer: tuning.open_ticks,
        open_fraction: 1.0,
    }
}

/// Open fraction for a phase with `timer` ticks left. Closing and opening
/// interpolate linearly across their window.
pub fn open_fraction(phase: GatePhase, timer: u32, tuning: &GateTuning) -> f32 {
    match phase {
        GatePhase::Open | GatePhase::Warning => 1.0,
        GatePhase::Closed => 0.0,
        GatePhase::Closing => ratio(timer, tuning.closing_ticks),
        GatePhase::Opening => 1.0 - ratio(timer, tuning.opening_ticks),
    }
}

fn ratio(timer: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        (timer as f32 / total as f32).clamp(0.0, 1.0)
    }
}

/// Advance one tick. The phase changes on the tick its timer reaches zero.
pub fn step(gate: &Gate, tuning: &GateTuning) -> GateUpdate {
    let timer = gate.timer.saturating_sub(1);
    if timer == 0 {
        let phase = gate.phase.next();
        let timer = phase_duration(phase, tuning);
        return GateUpdate {
            phase,
            timer,
            open_fraction: open_fraction(phase, timer, tuning),
            phase_changed: true,
        };
    }
    GateUpdate {
        phase: gate.phase,
        timer,
        open_fraction: open_fraction(gate.phase, timer, tuning),
        phase_changed: false,
    }
}

/// Apply a step result to the component.
pub fn apply(gate: &mut Gate, update: &GateUpdate) {
    gate.phase = update.phase;
    gate.timer = update.timer;
    gate.open_fraction = update.open_fraction;
}

/// True when the gate stops tanks (and projectiles).
pub fn blocks_movement(gate: &Gate, tuning: &GateTuning) -> bool {
    match gate.phase {
        GatePhase::Closed => true,
        GatePhase::Closing => gate.open_fraction < tuning.blocking_threshold,
        _ => false,
    }
}

/// True while tanks inside the footprint take crush damage.
pub fn crushes(gate: &Gate) -> bool {
    matches!(gate.phase, GatePhase::Closing | GatePhase::Closed)
}

/// Crush damage for a tank bounding box this tick. Applies on every tick of
/// overlap, not only the first.
pub fn crush_damage(gate: &Gate, tank_box: &Rect, tuning: &GateTuning) -> Option<f32> {
    (crushes(gate) && gate.rect.overlaps(tank_box)).then_some(tuning.crush_damage)
}
