//! Power-up pickups: collection and periodic spawning.

use hecs::{Entity, World};
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::components::{PowerUp, Tank};
use arena_core::enums::WeaponType;
use arena_core::events::SimEvent;
use arena_core::tuning::Tuning;
use arena_terrain::TerrainProvider;
use glam::Vec2;

use super::tick_env::TickEnv;
use crate::world_setup::{obstacle_footprints, safe_position, Placement, SpawnKind};

/// Arm a tank with `weapon`: full special ammo and a fresh duration.
pub fn apply(tank: &mut Tank, weapon: WeaponType, tuning: &Tuning) {
    tank.power_up = Some(weapon);
    tank.special_ammo = tuning.power_ups.max_special_ammo;
    tank.power_up_timer = tuning.power_ups.duration_ticks;
}

/// Collection checks against every tank, then the periodic spawn.
pub fn run(
    world: &mut World,
    env: &mut TickEnv<'_>,
    spawn_timer: &mut u32,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();
    let radius = env.tuning.power_ups.pickup_radius;

    let items: Vec<(Entity, WeaponType, Vec2)> = world
        .query::<&PowerUp>()
        .iter()
        .map(|(e, p)| (e, p.weapon, p.pos))
        .collect();

    for (entity, weapon, pos) in items {
        let taker = world
            .query_mut::<&mut Tank>()
            .into_iter()
            .map(|(_, t)| t)
            .find(|t| t.alive && t.pos.distance(pos) <= radius);
        if let Some(tank) = taker {
            apply(tank, weapon, env.tuning);
            env.damage.events.push(SimEvent::PowerUpCollected {
                player: tank.player,
                weapon,
            });
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    *spawn_timer += 1;
    if *spawn_timer >= env.tuning.power_ups.spawn_interval_ticks {
        *spawn_timer = 0;
        let count = world.query::<&PowerUp>().iter().count();
        if count < env.tuning.power_ups.max_count {
            spawn_random(world, env.rng, &*env.terrain, env.tuning);
        }
    }
}

/// Drop a random power-up at a safe item position.
pub fn spawn_random(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    terrain: &dyn TerrainProvider,
    tuning: &Tuning,
) -> Entity {
    let choices: Vec<WeaponType> = WeaponType::power_ups().collect();
    let weapon = choices
        .get(rng.gen_range(0..choices.len().max(1)))
        .copied()
        .unwrap_or(WeaponType::Regular);

    let obstacles = obstacle_footprints(world);
    let rules = Placement {
        kind: SpawnKind::Item,
        obstacles: &obstacles,
        terrain,
        avoid: &[],
        tuning,
    };
    let pos = safe_position(rng, &rules, 0);
    debug!("power-up {} placed at {pos}", weapon.as_str());
    world.spawn((PowerUp { weapon, pos },))
}

/// Place the per-round allotment of power-ups.
pub fn seed(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    terrain: &dyn TerrainProvider,
    tuning: &Tuning,
) {
    for _ in 0..tuning.power_ups.per_round {
        spawn_random(world, rng, terrain, tuning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_setup::new_tank;

    #[test]
    fn test_apply_resets_ammo_and_timer() {
        let t = Tuning::default();
        let mut tank = new_tank(0, Vec2::ZERO, 0.0, &t);
        tank.special_ammo = 1;
        apply(&mut tank, WeaponType::Rocket, &t);
        assert_eq!(tank.power_up, Some(WeaponType::Rocket));
        assert_eq!(tank.special_ammo, t.power_ups.max_special_ammo);
        assert_eq!(tank.power_up_timer, t.power_ups.duration_ticks);
    }
}
