//! Area explosions: falloff damage, visuals, particles and camera shake.

use hecs::World;

use arena_core::components::{Drone, Explosion, Tank, Target};
use arena_core::constants::{EXPLOSION_PARTICLES, EXPLOSION_VISUAL_TICKS};
use arena_core::events::SimEvent;
use glam::Vec2;

use super::damage::area_damage;
use super::tick_env::TickEnv;
use crate::world_setup::spawn_particles;

/// Detonate at `center`. Damage falls off linearly to zero at `radius` and is
/// applied once; the visual ring lingers for a few ticks.
pub fn explode(
    world: &mut World,
    env: &mut TickEnv<'_>,
    center: Vec2,
    radius: f32,
    max_damage: f32,
    killer: Option<usize>,
    shake: f32,
) {
    {
        let mut tank_q = world.query::<&mut Tank>();
        let mut target_q = world.query::<&mut Target>();
        let mut drone_q = world.query::<&mut Drone>();
        let mut tanks: Vec<&mut Tank> = tank_q.iter().map(|(_, t)| t).collect();
        let mut targets: Vec<&mut Target> = target_q.iter().map(|(_, t)| t).collect();
        let mut drones: Vec<&mut Drone> = drone_q.iter().map(|(_, d)| d).collect();
        area_damage(
            center,
            radius,
            max_damage,
            killer,
            &mut tanks,
            &mut targets,
            &mut drones,
            &mut env.damage,
        );
    }

    world.spawn((Explosion {
        pos: center,
        radius,
        remaining: EXPLOSION_VISUAL_TICKS,
        alive: true,
    },));
    spawn_particles(world, env.rng, center, EXPLOSION_PARTICLES, 2.0);
    env.camera.shake = env.camera.shake.max(shake);
    env.damage
        .events
        .push(SimEvent::Explosion { pos: center, radius });
}
