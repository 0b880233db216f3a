//! Ring of fire: a shrinking safe circle centred on the arena.

use hecs::World;

use arena_core::components::{RingOfFire, Tank};
use arena_core::tuning::Tuning;
use glam::Vec2;

use super::damage::damage_tank;
use super::tick_env::TickEnv;

/// A fresh ring covering the whole arena.
pub fn new_ring(tuning: &Tuning) -> RingOfFire {
    let size = Vec2::new(tuning.arena.width, tuning.arena.height);
    RingOfFire {
        center: size * 0.5,
        radius: size.length() * 0.5,
        delay: tuning.ring.start_delay_ticks,
    }
}

/// Shrink after the start delay and burn living tanks outside the circle.
pub fn run(ring: &mut RingOfFire, world: &mut World, env: &mut TickEnv<'_>) {
    let tuning = &env.tuning.ring;
    if ring.delay > 0 {
        ring.delay -= 1;
    } else {
        ring.radius = (ring.radius - tuning.shrink_per_tick).max(tuning.min_radius);
    }

    let damage = tuning.damage_per_tick;
    for (_, tank) in world.query_mut::<&mut Tank>() {
        if tank.alive && tank.pos.distance(ring.center) > ring.radius {
            damage_tank(tank, damage, None, &mut env.damage);
        }
    }
}
