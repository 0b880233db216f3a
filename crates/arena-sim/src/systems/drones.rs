//! Drones: seek the nearest living enemy tank and ram it.

use hecs::{Entity, World};

use arena_core::components::{Drone, Tank};
use arena_core::constants::*;
use arena_core::types::{angle_to, heading, normalize_angle, rotate_towards, wrap_position};
use glam::Vec2;

use super::damage::destroy_tank;
use super::tick_env::TickEnv;

/// Steer, move and resolve contact for every drone, then drop the dead ones.
pub fn run(world: &mut World, env: &mut TickEnv<'_>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let tanks: Vec<(Entity, usize, Vec2)> = world
        .query::<&Tank>()
        .iter()
        .filter(|(_, t)| t.alive)
        .map(|(e, t)| (e, t.player, t.pos))
        .collect();
    let reach = DRONE_CONTACT_RADIUS + env.tuning.tank.radius;
    let (w, h) = (env.tuning.arena.width, env.tuning.arena.height);

    let mut rammed: Vec<(Entity, Option<usize>)> = Vec::new();
    for (entity, drone) in world.query_mut::<&mut Drone>() {
        if drone.alive {
            drone.lifetime = drone.lifetime.saturating_sub(1);
            if drone.lifetime == 0 {
                drone.alive = false;
            }
        }
        if !drone.alive {
            despawn_buffer.push(entity);
            continue;
        }

        let target = tanks
            .iter()
            .filter(|(_, player, _)| Some(*player) != drone.owner)
            .min_by(|a, b| {
                drone
                    .pos
                    .distance_squared(a.2)
                    .total_cmp(&drone.pos.distance_squared(b.2))
            });
        if let Some(&(_, _, pos)) = target {
            let want = angle_to(drone.pos, pos);
            drone.angle = normalize_angle(rotate_towards(drone.angle, want, DRONE_TURN_RATE));
        }
        drone.pos = wrap_position(
            drone.pos + heading(drone.angle) * DRONE_SPEED,
            w,
            h,
            DRONE_BODY_RADIUS,
        );

        if env.damage.grace {
            continue;
        }
        if let Some(&(tank, _, pos)) = target {
            if drone.pos.distance(pos) <= reach {
                drone.alive = false;
                rammed.push((tank, drone.owner));
                despawn_buffer.push(entity);
            }
        }
    }

    for (tank, owner) in rammed {
        if let Ok(mut t) = world.get::<&mut Tank>(tank) {
            destroy_tank(&mut t, owner, &mut env.damage);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
