//! Tank timers, movement resolution and fire control.

use std::f32::consts::TAU;

use hecs::World;
use log::warn;

use arena_core::components::Tank;
use arena_core::constants::TANK_COLLISION_SAMPLES;
use arena_core::enums::WeaponType;
use arena_core::error::{ensure_finite, SimError, SimResult};
use arena_core::events::SimEvent;
use arena_core::tuning::Tuning;
use arena_core::types::{heading, normalize_angle, wrap_position};
use arena_terrain::TerrainProvider;
use glam::Vec2;

use super::obstacles::Blockers;
use super::tick_env::TickEnv;
use crate::weapons::{fire, Spawn};
use crate::world_setup::spawn_all;

/// Update every living tank: timers, movement, then firing.
pub fn run(world: &mut World, env: &mut TickEnv<'_>) {
    let blockers = Blockers::collect(world, env.tuning, env.tick);
    let mut spawns: Vec<Spawn> = Vec::new();

    for (_, tank) in world.query_mut::<&mut Tank>() {
        if !tank.alive {
            tank.speed = 0.0;
            continue;
        }
        tick_timers(tank);

        let before = tank.clone();
        if let Err(e) = drive(tank, &blockers, &*env.terrain, env.tuning, env.tick) {
            warn!("tick {}: tank {} movement fault: {e}", env.tick, tank.player);
            *tank = before;
            tank.speed = 0.0;
            env.damage.events.push(SimEvent::EntityFault {
                what: format!("tank {}: {e}", tank.player),
                tick: env.tick,
            });
            continue;
        }

        if tank.intent.fire {
            spawns.extend(shoot(tank, env.tuning, env.damage.events));
        }
    }

    spawn_all(world, spawns);
}

/// Reload, freeze and power-up countdowns.
pub fn tick_timers(tank: &mut Tank) {
    tank.reload_timer = tank.reload_timer.saturating_sub(1);

    if tank.frozen {
        tank.frozen_timer = tank.frozen_timer.saturating_sub(1);
        if tank.frozen_timer == 0 {
            tank.frozen = false;
        }
    }

    // Expiry clears the power-up even if ammo remains.
    if tank.power_up.is_some() {
        tank.power_up_timer = tank.power_up_timer.saturating_sub(1);
        if tank.power_up_timer == 0 {
            tank.power_up = None;
            tank.special_ammo = 0;
        }
    }
}

/// Turn and move according to the current intent. A blocked move is rejected
/// outright and the speed forced to zero.
pub fn drive(
    tank: &mut Tank,
    blockers: &Blockers,
    terrain: &dyn TerrainProvider,
    tuning: &Tuning,
    tick: u64,
) -> SimResult<()> {
    if tank.frozen {
        tank.speed = 0.0;
        return Ok(());
    }
    let intent = tank.intent.clamped();
    tank.angle = normalize_angle(tank.angle + intent.turn * tank.turn_speed);
    if !tank.angle.is_finite() {
        return Err(SimError::NonFiniteState {
            what: "tank angle",
            tick,
        });
    }

    tank.speed = intent.forward * tank.move_speed * terrain.speed_modifier(tank.pos);
    if tank.speed == 0.0 {
        return Ok(());
    }

    let candidate = tank.pos + heading(tank.angle) * tank.speed;
    ensure_finite(candidate, "tank position", tick)?;

    let radius = tuning.tank.radius;
    if body_blocked(candidate, radius, blockers, terrain) {
        tank.speed = 0.0;
        return Ok(());
    }
    tank.pos = wrap_position(candidate, tuning.arena.width, tuning.arena.height, radius);
    Ok(())
}

/// Test points spaced evenly around the body circumference.
pub fn body_blocked(
    pos: Vec2,
    radius: f32,
    blockers: &Blockers,
    terrain: &dyn TerrainProvider,
) -> bool {
    (0..TANK_COLLISION_SAMPLES).any(|i| {
        let angle = i as f32 * TAU / TANK_COLLISION_SAMPLES as f32;
        let p = pos + heading(angle) * radius;
        blockers.point_blocked(p) || terrain.is_blocked(p)
    })
}

/// Pull the trigger. No-op while reloading, frozen, or holding a power-up
/// with no ammo left; otherwise fires and restarts the reload timer.
pub fn shoot(tank: &mut Tank, tuning: &Tuning, events: &mut Vec<SimEvent>) -> Vec<Spawn> {
    if !tank.alive || tank.frozen || tank.reload_timer > 0 {
        return Vec::new();
    }
    if tank.power_up.is_some() && tank.special_ammo == 0 {
        return Vec::new();
    }
    let weapon = tank.power_up.unwrap_or(WeaponType::Regular);
    let origin = tank.pos + heading(tank.angle) * tuning.tank.barrel_length;
    let (angle, player) = (tank.angle, tank.player);

    let spawns = fire(origin, angle, Some(player), weapon, tank, tuning);
    tank.reload_timer = tuning.tank.reload_ticks;
    events.push(SimEvent::Fired { player, weapon });
    spawns
}
