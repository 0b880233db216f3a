//! Turning a fire request into entities.

use std::f32::consts::{PI, TAU};

use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::WeaponType;
use arena_core::tuning::Tuning;
use arena_core::types::{heading, normalize_angle, wrap_point, Charges};
use arena_hazards::{lightning, mine, shield};
use glam::Vec2;
use log::debug;

use super::registry::{self, FirePattern, MotionProfile, WeaponSpec};

/// An entity produced by a fire request, ready to be spawned.
#[derive(Debug, Clone)]
pub enum Spawn {
    Projectile(Projectile),
    Mine(Mine),
    Lightning(LightningStrike),
    Shield(ShieldWall),
    Drone(Drone),
}

/// Build the entity set for one trigger pull and charge the tank's ammo.
///
/// `Regular` is free; every other variant costs one unit of special ammo and
/// clears the power-up when the pool reaches zero.
pub fn fire(
    origin: Vec2,
    angle: f32,
    owner: Option<usize>,
    weapon: WeaponType,
    tank: &mut Tank,
    tuning: &Tuning,
) -> Vec<Spawn> {
    let spec = registry::spec(weapon);
    let spawns = match spec.pattern {
        FirePattern::Single => vec![Spawn::Projectile(new_projectile(
            weapon, &spec, origin, angle, owner, tuning,
        ))],
        FirePattern::Spread(offsets) => offsets
            .iter()
            .map(|off| {
                Spawn::Projectile(new_projectile(
                    weapon,
                    &spec,
                    origin,
                    normalize_angle(angle + off),
                    owner,
                    tuning,
                ))
            })
            .collect(),
        FirePattern::Mirror => [angle, normalize_angle(angle + PI)]
            .into_iter()
            .map(|a| Spawn::Projectile(new_projectile(weapon, &spec, origin, a, owner, tuning)))
            .collect(),
        FirePattern::Burst(spacing) => spacing
            .iter()
            .map(|d| {
                let pos = origin + heading(angle) * *d;
                Spawn::Projectile(new_projectile(weapon, &spec, pos, angle, owner, tuning))
            })
            .collect(),
        FirePattern::PlaceMine => vec![Spawn::Mine(Mine {
            pos: tank.pos,
            owner,
            phase: mine::placed(&tuning.mine),
        })],
        FirePattern::Lightning => {
            let target = wrap_point(
                origin + heading(angle) * tuning.lightning.offset,
                tuning.arena.width,
                tuning.arena.height,
            );
            vec![Spawn::Lightning(LightningStrike {
                pos: target,
                owner,
                phase: lightning::charging(&tuning.lightning),
            })]
        }
        FirePattern::Shield => vec![Spawn::Shield(ShieldWall {
            pos: tank.pos + heading(angle) * tuning.shield.offset,
            facing: angle,
            health: tuning.shield.health,
            owner,
            phase: shield::raised(&tuning.shield),
        })],
        FirePattern::Drone => vec![Spawn::Drone(Drone {
            pos: origin,
            angle,
            owner,
            lifetime: DRONE_LIFETIME_TICKS,
            alive: true,
        })],
    };
    consume_ammo(tank, weapon);
    spawns
}

/// Fire by string id. Unknown ids fall back to the regular weapon.
pub fn fire_by_id(
    origin: Vec2,
    angle: f32,
    owner: Option<usize>,
    id: &str,
    tank: &mut Tank,
    tuning: &Tuning,
) -> Vec<Spawn> {
    let weapon = WeaponType::lookup(id).unwrap_or_else(|| {
        debug!("unknown weapon id {id:?}, firing regular");
        WeaponType::Regular
    });
    fire(origin, angle, owner, weapon, tank, tuning)
}

fn consume_ammo(tank: &mut Tank, weapon: WeaponType) {
    if !weapon.consumes_ammo() {
        return;
    }
    tank.special_ammo = tank.special_ammo.saturating_sub(1);
    if tank.special_ammo == 0 {
        tank.power_up = None;
        tank.power_up_timer = 0;
    }
}

pub fn new_projectile(
    kind: WeaponType,
    spec: &WeaponSpec,
    pos: Vec2,
    angle: f32,
    owner: Option<usize>,
    tuning: &Tuning,
) -> Projectile {
    let base = &tuning.projectile;
    let speed = base.speed * spec.speed_mult;
    let lifetime = ((base.lifetime_ticks as f32 * spec.lifetime_mult).round() as u32).max(1);
    let motion = match spec.motion {
        MotionProfile::Straight => MotionState::Straight,
        MotionProfile::Spiral => MotionState::Spiral {
            anchor: pos,
            phase: 0.0,
            radius: 0.0,
        },
        MotionProfile::Homing => MotionState::Homing {
            delay: HOMING_DELAY_TICKS,
        },
        MotionProfile::Boomerang => MotionState::Boomerang { returned: false },
        MotionProfile::Accelerating => MotionState::Accelerating {
            max_speed: speed * ROCKET_MAX_SPEED_FACTOR,
        },
    };
    Projectile {
        kind,
        pos,
        prev_pos: pos,
        angle,
        speed,
        size: base.size * spec.size_mult,
        lifetime,
        max_lifetime: lifetime,
        age: 0,
        owner,
        pierce: spec.pierce,
        bounces: spec.bounces,
        motion,
        is_child: false,
        phasing: Vec::new(),
    }
}

/// Children radiating evenly from a cluster impact.
pub fn cluster_children(pos: Vec2, owner: Option<usize>, tuning: &Tuning) -> Vec<Projectile> {
    let spec = registry::flight_spec(WeaponType::Cluster, true);
    (0..CLUSTER_CHILD_COUNT)
        .map(|i| {
            let angle = normalize_angle(i as f32 * TAU / CLUSTER_CHILD_COUNT as f32);
            let mut child = new_projectile(WeaponType::Cluster, &spec, pos, angle, owner, tuning);
            child.is_child = true;
            child.lifetime = CLUSTER_CHILD_LIFETIME_TICKS;
            child.max_lifetime = CLUSTER_CHILD_LIFETIME_TICKS;
            child.bounces = Charges::Unlimited;
            child
        })
        .collect()
}
