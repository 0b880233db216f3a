//! Mines, lightning strikes and shield walls.

use hecs::{Entity, World};
use log::debug;

use arena_core::components::{LightningStrike, Mine, ShieldWall, Tank, Target};
use arena_core::enums::ShieldPhase;
use arena_core::events::SimEvent;
use arena_hazards::lightning;
use arena_hazards::mine::{self, MineContext, MineEvent, TankProbe};
use arena_hazards::shield;
use glam::Vec2;

use super::damage::{damage_tank, damage_target};
use super::explosions::explode;
use super::tick_env::TickEnv;
use crate::world_setup::spawn_particles;

/// Step every mine. Proximity is checked against the tank positions at the
/// start of the pass; detonations resolve afterwards.
pub fn run_mines(world: &mut World, env: &mut TickEnv<'_>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let probes: Vec<TankProbe> = world
        .query::<&Tank>()
        .iter()
        .map(|(_, t)| TankProbe {
            player: t.player,
            pos: t.pos,
            alive: t.alive,
        })
        .collect();

    let mut detonations: Vec<(Vec2, Option<usize>)> = Vec::new();
    for (entity, m) in world.query_mut::<&mut Mine>() {
        let ctx = MineContext {
            phase: m.phase,
            pos: m.pos,
            owner: m.owner,
            tanks: &probes,
        };
        let update = mine::step(&ctx, &env.tuning.mine);
        m.phase = update.phase;
        match update.event {
            Some(MineEvent::Armed) => env.damage.events.push(SimEvent::MineArmed { pos: m.pos }),
            Some(MineEvent::Triggered { by }) => {
                debug!("tick {}: mine at {} tripped by player {by}", env.tick, m.pos);
                env.damage
                    .events
                    .push(SimEvent::MineTriggered { pos: m.pos });
            }
            Some(MineEvent::Detonate) => {
                detonations.push((m.pos, m.owner));
                despawn_buffer.push(entity);
            }
            None => {}
        }
    }

    let (radius, max_damage) = (env.tuning.mine.explosion_radius, env.tuning.mine.max_damage);
    for (pos, owner) in detonations {
        // The owner is not spared at detonation.
        explode(world, env, pos, radius, max_damage, owner, 0.0);
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Charge, strike and fade lightning.
pub fn run_lightning(world: &mut World, env: &mut TickEnv<'_>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let mut strikes: Vec<(Vec2, Option<usize>)> = Vec::new();
    for (entity, l) in world.query_mut::<&mut LightningStrike>() {
        let update = lightning::step(l.phase, &env.tuning.lightning);
        l.phase = update.phase;
        if update.strike {
            strikes.push((l.pos, l.owner));
        }
        if update.finished {
            despawn_buffer.push(entity);
        }
    }

    let tuning = env.tuning;
    for (pos, owner) in strikes {
        for (_, tank) in world.query_mut::<&mut Tank>() {
            if let Some(dmg) = lightning::strike_damage(pos, tank.pos, &tuning.lightning) {
                damage_tank(tank, dmg, owner, &mut env.damage);
            }
        }
        for (_, target) in world.query_mut::<&mut Target>() {
            if let Some(dmg) = lightning::strike_damage(pos, target.pos, &tuning.lightning) {
                damage_target(target, dmg, owner, &mut env.damage);
            }
        }
        spawn_particles(world, env.rng, pos, 8, 2.5);
        env.damage.events.push(SimEvent::LightningStrike { pos });
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Age shields and remove collapsed ones.
pub fn run_shields(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    for (entity, s) in world.query_mut::<&mut ShieldWall>() {
        s.phase = shield::step(s.phase, s.health);
        if s.phase == ShieldPhase::Collapsed {
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
