//! Obstacles: movement blockers, destructible wall decay and the gate cycle.

use hecs::{Entity, World};
use log::warn;

use arena_core::components::{DestructibleWall, Gate, Tank, Wall};
use arena_core::constants::DEBRIS_PARTICLES;
use arena_core::events::SimEvent;
use arena_core::tuning::Tuning;
use arena_core::types::Rect;
use arena_hazards::gate;
use glam::Vec2;

use super::damage::damage_tank;
use super::tick_env::TickEnv;
use crate::world_setup::spawn_particles;

/// Rectangles that stop tank movement this tick: walls, destructible walls
/// and gates that currently block.
#[derive(Debug, Default)]
pub struct Blockers {
    pub rects: Vec<Rect>,
}

impl Blockers {
    pub fn collect(world: &World, tuning: &Tuning, tick: u64) -> Self {
        let mut rects = Vec::new();
        let mut push = |rect: Rect, what: &str| {
            if rect.is_degenerate() {
                warn!("tick {tick}: skipping degenerate {what} {rect:?}");
            } else {
                rects.push(rect);
            }
        };
        for (_, wall) in world.query::<&Wall>().iter() {
            push(wall.rect, "wall");
        }
        for (_, wall) in world.query::<&DestructibleWall>().iter() {
            push(wall.rect, "destructible wall");
        }
        for (_, g) in world.query::<&Gate>().iter() {
            if gate::blocks_movement(g, &tuning.gate) {
                push(g.rect, "gate");
            }
        }
        Self { rects }
    }

    pub fn point_blocked(&self, p: Vec2) -> bool {
        self.rects.iter().any(|r| r.contains(p))
    }
}

/// Remove `amount` hit points from a destructible wall. At zero the wall is
/// despawned and dropped from the tile index. Returns true if it was destroyed.
pub fn damage_destructible(
    world: &mut World,
    env: &mut TickEnv<'_>,
    entity: Entity,
    amount: u8,
) -> bool {
    let (rect, hp) = match world.get::<&mut DestructibleWall>(entity) {
        Ok(mut wall) => {
            wall.hp = wall.hp.saturating_sub(amount);
            (wall.rect, wall.hp)
        }
        Err(_) => return false,
    };
    let center = rect.center();
    if hp > 0 {
        spawn_particles(world, env.rng, center, 2, 1.0);
        return false;
    }
    let _ = world.despawn(entity);
    env.terrain.clear_obstacle(&rect);
    spawn_particles(world, env.rng, center, DEBRIS_PARTICLES, 1.5);
    env.damage
        .events
        .push(SimEvent::WallDestroyed { pos: center });
    true
}

/// Advance every gate one tick, then crush tanks inside closing or closed gates.
pub fn run(world: &mut World, env: &mut TickEnv<'_>) {
    let tuning = &env.tuning.gate;
    let radius = env.tuning.tank.radius;

    let mut crushing: Vec<Gate> = Vec::new();
    for (_, g) in world.query_mut::<&mut Gate>() {
        let update = gate::step(g, tuning);
        gate::apply(g, &update);
        if gate::crushes(g) {
            crushing.push(*g);
        }
    }
    if crushing.is_empty() {
        return;
    }

    for (_, tank) in world.query_mut::<&mut Tank>() {
        if !tank.alive {
            continue;
        }
        let tank_box = Rect::centered(tank.pos, radius);
        for g in &crushing {
            if let Some(dmg) = gate::crush_damage(g, &tank_box, tuning) {
                damage_tank(tank, dmg, None, &mut env.damage);
            }
        }
    }
}
