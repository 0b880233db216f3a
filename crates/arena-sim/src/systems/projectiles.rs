//! Projectile resolver: motion, wrap, lifetime and impact.
//!
//! Each projectile is advanced, then tested against three collision
//! categories in order: solid obstacles (walls, destructible walls, blocking
//! gates, blocking tiles), bodies (tanks, targets, drones) and hazards
//! (shields, armed mines). The first qualifying hit wins and the projectile
//! resolves at most one hit per tick. Behaviour comes from the weapon's
//! `WeaponSpec`; there is no per-variant branching here.

use std::f32::consts::PI;

use hecs::{Entity, World};
use log::{debug, warn};

use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::ShieldPhase;
use arena_core::error::{ensure_finite, SimError, SimResult};
use arena_core::events::SimEvent;
use arena_core::tuning::Tuning;
use arena_core::types::*;
use arena_hazards::{gate, mine, shield};
use glam::Vec2;

use super::damage::{destroy_tank, destroy_target, freeze_tank};
use super::explosions::explode;
use super::obstacles::damage_destructible;
use super::tick_env::TickEnv;
use crate::weapons::fire::cluster_children;
use crate::weapons::registry::{flight_spec, TankPolicy, TerminalEffect, WallPolicy, WeaponSpec};
use crate::world_setup::{is_safe_position, obstacle_footprints, Placement, SpawnKind};

/// First thing a projectile touched this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Wall(Rect),
    Destructible(Entity, Rect),
    Gate(Rect),
    Tile(Rect),
    Tank(Entity),
    Target(Entity),
    Drone(Entity),
    Shield(Entity),
    Mine(Entity),
}

/// Advance and resolve every projectile for one tick.
pub fn run(world: &mut World, env: &mut TickEnv<'_>) {
    let ids: Vec<Entity> = world.query::<&Projectile>().iter().map(|(e, _)| e).collect();
    let tanks: Vec<(usize, Vec2)> = world
        .query::<&Tank>()
        .iter()
        .filter(|(_, t)| t.alive)
        .map(|(_, t)| (t.player, t.pos))
        .collect();

    for id in ids {
        let mut p = match world.get::<&Projectile>(id) {
            Ok(p) => Projectile::clone(&p),
            Err(_) => continue,
        };

        match advance(&mut p, &tanks, env.tuning, env.tick) {
            Ok(true) => {}
            Ok(false) => {
                let _ = world.despawn(id);
                continue;
            }
            Err(e) => {
                warn!("tick {}: dropping {:?} projectile: {e}", env.tick, p.kind);
                env.damage.events.push(SimEvent::EntityFault {
                    what: format!("projectile: {e}"),
                    tick: env.tick,
                });
                let _ = world.despawn(id);
                continue;
            }
        }

        let keep = match detect_hit(world, env, &p) {
            Some(hit) => resolve(world, env, &mut p, hit),
            None => true,
        };

        if keep {
            if let Ok(mut slot) = world.get::<&mut Projectile>(id) {
                *slot = p;
            }
        } else {
            let _ = world.despawn(id);
        }
    }
}

/// Move one projectile. Returns `Ok(false)` once its lifetime is spent.
pub fn advance(
    p: &mut Projectile,
    tanks: &[(usize, Vec2)],
    tuning: &Tuning,
    tick: u64,
) -> SimResult<bool> {
    p.prev_pos = p.pos;
    p.age += 1;

    match &mut p.motion {
        MotionState::Straight => {}
        MotionState::Spiral { .. } => {}
        MotionState::Homing { delay } => {
            if *delay > 0 {
                *delay -= 1;
            } else if let Some(target) = nearest_enemy(p.pos, p.owner, tanks) {
                let want = angle_to(p.pos, target);
                p.angle = normalize_angle(rotate_towards(p.angle, want, HOMING_TURN_RATE));
            }
        }
        MotionState::Boomerang { returned } => {
            if !*returned && p.age >= p.max_lifetime / 2 {
                *returned = true;
                p.angle = normalize_angle(p.angle + PI);
            }
        }
        MotionState::Accelerating { max_speed } => {
            p.speed = (p.speed * ROCKET_ACCELERATION).min(*max_speed);
        }
    }

    let dir = heading(p.angle);
    match &mut p.motion {
        MotionState::Spiral {
            anchor,
            phase,
            radius,
        } => {
            *anchor += dir * p.speed;
            *phase += TORNADO_SPIN_RATE;
            *radius = (*radius + TORNADO_RADIUS_GROWTH).min(TORNADO_MAX_RADIUS);
            p.pos = *anchor + dir.perp() * phase.sin() * *radius;
        }
        _ => p.pos += dir * p.speed,
    }

    let half = p.size * 0.5;
    let wrapped = wrap_position(p.pos, tuning.arena.width, tuning.arena.height, half);
    let shift = wrapped - p.pos;
    if shift != Vec2::ZERO {
        p.pos = wrapped;
        p.prev_pos += shift;
        if let MotionState::Spiral { anchor, .. } = &mut p.motion {
            *anchor += shift;
        }
    }

    ensure_finite(p.pos, "projectile position", tick)?;
    if !p.angle.is_finite() || !p.speed.is_finite() {
        return Err(SimError::NonFiniteState {
            what: "projectile heading",
            tick,
        });
    }

    let pos = p.pos;
    p.phasing.retain(|rect| rect.intersects_circle(pos, half));

    p.lifetime = p.lifetime.saturating_sub(1);
    Ok(p.lifetime > 0)
}

fn nearest_enemy(pos: Vec2, owner: Option<usize>, tanks: &[(usize, Vec2)]) -> Option<Vec2> {
    tanks
        .iter()
        .filter(|(player, _)| Some(*player) != owner)
        .map(|(_, p)| *p)
        .min_by(|a, b| pos.distance_squared(*a).total_cmp(&pos.distance_squared(*b)))
}

fn rect_contact(rect: &Rect, pos: Vec2, radius: f32, what: &'static str) -> SimResult<bool> {
    if rect.is_degenerate() {
        return Err(SimError::DegenerateGeometry { what });
    }
    Ok(rect.intersects_circle(pos, radius))
}

/// A failed check counts as no contact.
fn checked(result: SimResult<bool>, tick: u64) -> bool {
    match result {
        Ok(hit) => hit,
        Err(e) => {
            warn!("tick {tick}: collision check skipped: {e}");
            false
        }
    }
}

/// Find the first qualifying contact: obstacles, then bodies, then hazards.
pub fn detect_hit(world: &World, env: &TickEnv<'_>, p: &Projectile) -> Option<Hit> {
    let r = p.size * 0.5;
    let tick = env.tick;
    let phasing = |rect: &Rect| p.phasing.contains(rect);

    for (_, wall) in world.query::<&Wall>().iter() {
        if !phasing(&wall.rect) && checked(rect_contact(&wall.rect, p.pos, r, "wall"), tick) {
            return Some(Hit::Wall(wall.rect));
        }
    }
    for (e, wall) in world.query::<&DestructibleWall>().iter() {
        if !phasing(&wall.rect)
            && checked(rect_contact(&wall.rect, p.pos, r, "destructible wall"), tick)
        {
            return Some(Hit::Destructible(e, wall.rect));
        }
    }
    for (_, g) in world.query::<&Gate>().iter() {
        if gate::blocks_movement(g, &env.tuning.gate)
            && !phasing(&g.rect)
            && checked(rect_contact(&g.rect, p.pos, r, "gate"), tick)
        {
            return Some(Hit::Gate(g.rect));
        }
    }
    if let Some(tile) = env.terrain.blocking_tile_at(p.pos) {
        if !phasing(&tile) {
            return Some(Hit::Tile(tile));
        }
    }

    // Tanks cannot be hit at all while the grace period runs.
    if !env.damage.grace {
        let grace = env.tuning.projectile.owner_grace_ticks;
        let reach = env.tuning.tank.radius + r;
        for (e, tank) in world.query::<&Tank>().iter() {
            if !tank.alive || (Some(tank.player) == p.owner && p.age < grace) {
                continue;
            }
            if tank.pos.distance(p.pos) <= reach {
                return Some(Hit::Tank(e));
            }
        }
    }
    for (e, target) in world.query::<&Target>().iter() {
        if target.alive && target.pos.distance(p.pos) <= TARGET_RADIUS + r {
            return Some(Hit::Target(e));
        }
    }
    for (e, drone) in world.query::<&Drone>().iter() {
        if drone.alive
            && (drone.owner.is_none() || drone.owner != p.owner)
            && drone.pos.distance(p.pos) <= DRONE_BODY_RADIUS + r
        {
            return Some(Hit::Drone(e));
        }
    }

    let dir = heading(p.angle);
    for (e, s) in world.query::<&ShieldWall>().iter() {
        let active = matches!(s.phase, ShieldPhase::Active { .. });
        if active
            && (s.owner.is_none() || s.owner != p.owner)
            && shield::blocks(s.pos, s.facing, &env.tuning.shield, p.pos, r, dir)
        {
            return Some(Hit::Shield(e));
        }
    }
    for (e, m) in world.query::<&Mine>().iter() {
        if mine::is_armed(m.phase) && m.pos.distance(p.pos) <= MINE_BODY_RADIUS + r {
            return Some(Hit::Mine(e));
        }
    }
    None
}

/// Apply the weapon's policy for `hit`. Returns false if the projectile is spent.
pub fn resolve(world: &mut World, env: &mut TickEnv<'_>, p: &mut Projectile, hit: Hit) -> bool {
    let spec = flight_spec(p.kind, p.is_child);
    match hit {
        Hit::Wall(rect) | Hit::Gate(rect) | Hit::Tile(rect) => {
            solid_contact(world, env, p, &spec, rect)
        }
        Hit::Destructible(entity, rect) => {
            damage_destructible(world, env, entity, spec.wall_damage);
            solid_contact(world, env, p, &spec, rect)
        }
        Hit::Tank(entity) => {
            let owner = p.owner;
            let continues = {
                let Ok(mut tank) = world.get::<&mut Tank>(entity) else {
                    return true;
                };
                match spec.tank {
                    TankPolicy::Destroy => {
                        destroy_tank(&mut tank, owner, &mut env.damage);
                        false
                    }
                    TankPolicy::DestroyPierce => {
                        destroy_tank(&mut tank, owner, &mut env.damage);
                        !p.pierce.is_empty()
                    }
                    TankPolicy::Freeze => {
                        freeze_tank(&mut tank, env.tuning.projectile.freeze_ticks, &mut env.damage);
                        false
                    }
                    TankPolicy::Detonate => false,
                }
            };
            body_contact(world, env, p, &spec, continues)
        }
        Hit::Target(entity) => {
            let owner = p.owner;
            let continues = {
                let Ok(mut target) = world.get::<&mut Target>(entity) else {
                    return true;
                };
                match spec.tank {
                    TankPolicy::Destroy | TankPolicy::Freeze => {
                        destroy_target(&mut target, owner, &mut env.damage);
                        false
                    }
                    TankPolicy::DestroyPierce => {
                        destroy_target(&mut target, owner, &mut env.damage);
                        !p.pierce.is_empty()
                    }
                    TankPolicy::Detonate => false,
                }
            };
            body_contact(world, env, p, &spec, continues)
        }
        Hit::Drone(entity) => {
            let continues = {
                let Ok(mut drone) = world.get::<&mut Drone>(entity) else {
                    return true;
                };
                match spec.tank {
                    TankPolicy::Detonate => false,
                    TankPolicy::DestroyPierce => {
                        drone.alive = false;
                        !p.pierce.is_empty()
                    }
                    TankPolicy::Destroy | TankPolicy::Freeze => {
                        drone.alive = false;
                        false
                    }
                }
            };
            body_contact(world, env, p, &spec, continues)
        }
        Hit::Shield(entity) => {
            if let Ok(mut s) = world.get::<&mut ShieldWall>(entity) {
                s.health = shield::absorb(s.health);
                if s.health == 0 {
                    s.phase = ShieldPhase::Collapsed;
                    env.damage
                        .events
                        .push(SimEvent::ShieldCollapsed { pos: s.pos });
                }
            }
            terminal(world, env, p, &spec);
            false
        }
        Hit::Mine(entity) => {
            if let Ok(mut m) = world.get::<&mut Mine>(entity) {
                if let Some(phase) = mine::external_trigger(m.phase, &env.tuning.mine) {
                    m.phase = phase;
                    env.damage
                        .events
                        .push(SimEvent::MineTriggered { pos: m.pos });
                }
            }
            terminal(world, env, p, &spec);
            false
        }
    }
}

fn solid_contact(
    world: &mut World,
    env: &mut TickEnv<'_>,
    p: &mut Projectile,
    spec: &WeaponSpec,
    rect: Rect,
) -> bool {
    if spec.wall == WallPolicy::Pierce && p.pierce.try_spend() {
        p.phasing.push(rect);
        return true;
    }
    // Started the tick already inside: stepping back cannot leave the rect.
    let embedded = rect.intersects_circle(p.prev_pos, p.size * 0.5);
    if spec.wall != WallPolicy::Stop && !embedded && p.bounces.try_spend() {
        reflect(p, &rect);
        return true;
    }
    terminal(world, env, p, spec);
    false
}

fn body_contact(
    world: &mut World,
    env: &mut TickEnv<'_>,
    p: &mut Projectile,
    spec: &WeaponSpec,
    continues: bool,
) -> bool {
    if continues {
        return true;
    }
    terminal(world, env, p, spec);
    false
}

/// Mirror the heading across the face that was crossed and step back out.
pub fn reflect(p: &mut Projectile, rect: &Rect) {
    let axis = crossing_axis(rect, p.prev_pos, p.size * 0.5);
    p.angle = reflect_angle(p.angle, axis);
    let back = p.prev_pos - p.pos;
    p.pos = p.prev_pos;
    if let MotionState::Spiral { anchor, .. } = &mut p.motion {
        *anchor += back;
    }
}

fn terminal(world: &mut World, env: &mut TickEnv<'_>, p: &Projectile, spec: &WeaponSpec) {
    match spec.terminal {
        TerminalEffect::None => {}
        TerminalEffect::Explode {
            radius,
            damage,
            shake,
        } => explode(world, env, p.pos, radius, damage, p.owner, shake),
        TerminalEffect::Cluster => {
            if !p.is_child {
                for child in cluster_children(p.pos, p.owner, env.tuning) {
                    world.spawn((child,));
                }
            }
        }
        TerminalEffect::Teleport => teleport_owner(world, env, p.owner, p.pos, p.angle),
    }
}

/// Move the shooter to the impact point, backing off along the flight path
/// until the spot is a safe tank position.
fn teleport_owner(
    world: &mut World,
    env: &mut TickEnv<'_>,
    owner: Option<usize>,
    impact: Vec2,
    angle: f32,
) {
    let Some(player) = owner else {
        return;
    };
    let Some(entity) = world
        .query::<&Tank>()
        .iter()
        .find(|(_, t)| t.player == player && t.alive)
        .map(|(e, _)| e)
    else {
        return;
    };

    let obstacles = obstacle_footprints(world);
    let others: Vec<Vec2> = world
        .query::<&Tank>()
        .iter()
        .filter(|(_, t)| t.alive && t.player != player)
        .map(|(_, t)| t.pos)
        .collect();
    let rules = Placement {
        kind: SpawnKind::Tank,
        obstacles: &obstacles,
        terrain: &*env.terrain,
        avoid: &others,
        tuning: env.tuning,
    };
    let back = -heading(angle) * env.tuning.tank.radius;
    let Some(dest) = (0..=TELEPORT_BACKOFF_STEPS)
        .map(|i| impact + back * i as f32)
        .find(|pos| is_safe_position(*pos, &rules))
    else {
        debug!("teleport for player {player} aborted: no safe spot near {impact}");
        return;
    };

    let from = match world.get::<&mut Tank>(entity) {
        Ok(mut tank) => {
            let from = tank.pos;
            tank.pos = dest;
            from
        }
        Err(_) => return,
    };
    for pos in [from, dest] {
        world.spawn((TeleportEffect {
            pos,
            remaining: TELEPORT_EFFECT_TICKS,
            alive: true,
        },));
    }
    env.damage.events.push(SimEvent::Teleported {
        player,
        from,
        to: dest,
    });
}
