//! Damage application shared by every system that hurts tanks or targets.
//!
//! Tanks are never removed: death only clears `alive`. Kill credit goes to
//! the attacker unless it was self-inflicted or ownerless.

use arena_core::components::{Drone, Target, Tank};
use arena_core::constants::TARGET_RESPAWN_TICKS;
use arena_core::events::SimEvent;
use arena_core::types::falloff_damage;
use glam::Vec2;

/// Per-tick damage bookkeeping.
pub struct DamageCtx<'a> {
    /// Grace period running: tanks are immune.
    pub grace: bool,
    pub kills: &'a mut [u32],
    pub events: &'a mut Vec<SimEvent>,
}

impl DamageCtx<'_> {
    fn credit(&mut self, killer: Option<usize>, victim: Option<usize>) {
        if let Some(k) = killer {
            if Some(k) != victim {
                if let Some(count) = self.kills.get_mut(k) {
                    *count += 1;
                }
            }
        }
    }
}

/// Apply `amount` to a tank. Returns true if this call killed it.
pub fn damage_tank(tank: &mut Tank, amount: f32, killer: Option<usize>, ctx: &mut DamageCtx<'_>) -> bool {
    if !tank.alive || ctx.grace || amount <= 0.0 {
        return false;
    }
    tank.health -= amount;
    if tank.health <= 0.0 {
        tank.health = 0.0;
        tank.alive = false;
        tank.speed = 0.0;
        ctx.credit(killer, Some(tank.player));
        ctx.events.push(SimEvent::TankDestroyed {
            player: tank.player,
            killer,
        });
        return true;
    }
    false
}

/// Instant kill regardless of remaining health.
pub fn destroy_tank(tank: &mut Tank, killer: Option<usize>, ctx: &mut DamageCtx<'_>) -> bool {
    let health = tank.health.max(1.0);
    damage_tank(tank, health, killer, ctx)
}

pub fn freeze_tank(tank: &mut Tank, ticks: u32, ctx: &mut DamageCtx<'_>) {
    if !tank.alive || ctx.grace {
        return;
    }
    tank.frozen = true;
    tank.frozen_timer = ticks;
    tank.speed = 0.0;
    ctx.events.push(SimEvent::TankFrozen {
        player: tank.player,
    });
}

/// Targets ignore the grace period.
pub fn damage_target(target: &mut Target, amount: f32, killer: Option<usize>, ctx: &mut DamageCtx<'_>) -> bool {
    if !target.alive || amount <= 0.0 {
        return false;
    }
    target.health -= amount;
    if target.health <= 0.0 {
        target.health = 0.0;
        target.alive = false;
        target.respawn_timer = TARGET_RESPAWN_TICKS;
        ctx.credit(killer, None);
        ctx.events.push(SimEvent::TargetDestroyed { killer });
        return true;
    }
    false
}

pub fn destroy_target(target: &mut Target, killer: Option<usize>, ctx: &mut DamageCtx<'_>) -> bool {
    let health = target.health.max(1.0);
    damage_target(target, health, killer, ctx)
}

/// Radius-falloff damage to every living tank, target and drone around `center`.
pub fn area_damage(
    center: Vec2,
    radius: f32,
    max_damage: f32,
    killer: Option<usize>,
    tanks: &mut [&mut Tank],
    targets: &mut [&mut Target],
    drones: &mut [&mut Drone],
    ctx: &mut DamageCtx<'_>,
) {
    for tank in tanks.iter_mut() {
        let dmg = falloff_damage(max_damage, center.distance(tank.pos), radius);
        damage_tank(tank, dmg, killer, ctx);
    }
    for target in targets.iter_mut() {
        let dmg = falloff_damage(max_damage, center.distance(target.pos), radius);
        damage_target(target, dmg, killer, ctx);
    }
    for drone in drones.iter_mut() {
        if drone.alive && center.distance(drone.pos) < radius {
            drone.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::tuning::Tuning;

    use crate::world_setup::new_tank;

    #[test]
    fn test_kill_credit_and_self_kill() {
        let t = Tuning::default();
        let mut kills = vec![0, 0];
        let mut events = Vec::new();
        let mut ctx = DamageCtx {
            grace: false,
            kills: &mut kills,
            events: &mut events,
        };
        let mut a = new_tank(0, Vec2::ZERO, 0.0, &t);
        let mut b = new_tank(1, Vec2::ZERO, 0.0, &t);
        assert!(destroy_tank(&mut b, Some(0), &mut ctx));
        assert!(destroy_tank(&mut a, Some(0), &mut ctx));
        assert!(!destroy_tank(&mut a, Some(1), &mut ctx), "already dead");
        assert_eq!(kills, vec![1, 0]);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_grace_blocks_all_tank_damage() {
        let t = Tuning::default();
        let mut kills = vec![0];
        let mut events = Vec::new();
        let mut ctx = DamageCtx {
            grace: true,
            kills: &mut kills,
            events: &mut events,
        };
        let mut a = new_tank(0, Vec2::ZERO, 0.0, &t);
        assert!(!damage_tank(&mut a, 500.0, None, &mut ctx));
        freeze_tank(&mut a, 100, &mut ctx);
        assert!(a.alive && !a.frozen);
        assert_eq!(a.health, 100.0);
    }

    #[test]
    fn test_area_damage_falloff() {
        let t = Tuning::default();
        let mut kills = vec![0, 0];
        let mut events = Vec::new();
        let mut ctx = DamageCtx {
            grace: false,
            kills: &mut kills,
            events: &mut events,
        };
        let mut near = new_tank(0, Vec2::new(30.0, 0.0), 0.0, &t);
        let mut far = new_tank(1, Vec2::new(90.0, 0.0), 0.0, &t);
        area_damage(
            Vec2::ZERO,
            60.0,
            100.0,
            None,
            &mut [&mut near, &mut far],
            &mut [],
            &mut [],
            &mut ctx,
        );
        assert!((near.health - 50.0).abs() < 1e-3);
        assert_eq!(far.health, 100.0);
    }
}
