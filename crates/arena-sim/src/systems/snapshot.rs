//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use arena_core::components::*;
use arena_core::enums::*;
use arena_core::events::SimEvent;
use arena_core::state::*;
use arena_core::tuning::Tuning;
use arena_core::types::SimTime;

use crate::round::RoundState;

/// Engine-level state that is not stored in the world.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub round: &'a RoundState,
    pub camera: &'a Camera,
    pub ring: Option<&'a RingOfFire>,
    pub tuning: &'a Tuning,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    ctx: &SnapshotContext<'_>,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        mode: ctx.mode,
        round: ctx.round.round,
        tanks: build_tanks(world, ctx.tuning),
        projectiles: build_projectiles(world),
        obstacles: build_obstacles(world),
        hazards: build_hazards(world),
        power_ups: world
            .query::<&PowerUp>()
            .iter()
            .map(|(_, p)| PowerUpView {
                weapon: p.weapon,
                pos: p.pos,
            })
            .collect(),
        drones: world
            .query::<&Drone>()
            .iter()
            .filter(|(_, d)| d.alive)
            .map(|(_, d)| DroneView {
                pos: d.pos,
                angle: d.angle,
                owner: d.owner,
            })
            .collect(),
        targets: world
            .query::<&Target>()
            .iter()
            .map(|(_, t)| TargetView {
                pos: t.pos,
                health: t.health,
                alive: t.alive,
            })
            .collect(),
        effects: build_effects(world),
        scores: ctx.round.scores.clone(),
        kills: ctx.round.kills.clone(),
        winner: ctx.round.winner,
        grace: ctx.round.grace,
        camera: CameraView::from(*ctx.camera),
        ring: ctx.ring.copied(),
        events,
    }
}

/// Tanks in player order, with HUD percentages.
fn build_tanks(world: &World, tuning: &Tuning) -> Vec<TankView> {
    let max_ammo = tuning.power_ups.max_special_ammo.max(1) as f32;
    let reload = tuning.tank.reload_ticks.max(1) as f32;

    let mut tanks: Vec<TankView> = world
        .query::<&Tank>()
        .iter()
        .map(|(_, t)| TankView {
            player: t.player,
            pos: t.pos,
            angle: t.angle,
            health: t.health,
            alive: t.alive,
            frozen: t.frozen,
            power_up: t.power_up,
            special_ammo: t.special_ammo,
            ammo_pct: if t.power_up.is_some() {
                (t.special_ammo as f32 / max_ammo).clamp(0.0, 1.0)
            } else {
                0.0
            },
            reload_pct: (1.0 - t.reload_timer as f32 / reload).clamp(0.0, 1.0),
        })
        .collect();
    tanks.sort_by_key(|t| t.player);
    tanks
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<&Projectile>()
        .iter()
        .map(|(_, p)| ProjectileView {
            kind: p.kind,
            pos: p.pos,
            angle: p.angle,
            size: p.size,
            owner: p.owner,
        })
        .collect()
}

fn build_obstacles(world: &World) -> Vec<ObstacleView> {
    let mut out: Vec<ObstacleView> = world
        .query::<&Wall>()
        .iter()
        .map(|(_, w)| ObstacleView::Wall { rect: w.rect })
        .collect();
    out.extend(
        world
            .query::<&DestructibleWall>()
            .iter()
            .map(|(_, w)| ObstacleView::Destructible {
                rect: w.rect,
                hp: w.hp,
            }),
    );
    out.extend(world.query::<&Gate>().iter().map(|(_, g)| ObstacleView::Gate {
        rect: g.rect,
        phase: g.phase,
        open_fraction: g.open_fraction,
    }));
    out
}

fn build_hazards(world: &World) -> Vec<HazardView> {
    let mut out: Vec<HazardView> = world
        .query::<&Mine>()
        .iter()
        .map(|(_, m)| HazardView::Mine {
            pos: m.pos,
            owner: m.owner,
            phase: m.phase,
        })
        .collect();
    out.extend(
        world
            .query::<&LightningStrike>()
            .iter()
            .map(|(_, l)| HazardView::Lightning {
                pos: l.pos,
                phase: l.phase,
            }),
    );
    out.extend(
        world
            .query::<&ShieldWall>()
            .iter()
            .map(|(_, s)| HazardView::Shield {
                pos: s.pos,
                facing: s.facing,
                health: s.health,
            }),
    );
    out
}

/// Living cosmetic effects only.
fn build_effects(world: &World) -> Vec<EffectView> {
    let mut out: Vec<EffectView> = world
        .query::<&Particle>()
        .iter()
        .filter(|(_, p)| p.alive)
        .map(|(_, p)| EffectView::Particle { pos: p.pos })
        .collect();
    out.extend(
        world
            .query::<&Explosion>()
            .iter()
            .filter(|(_, x)| x.alive)
            .map(|(_, x)| EffectView::Explosion {
                pos: x.pos,
                radius: x.radius,
                remaining: x.remaining,
            }),
    );
    out.extend(
        world
            .query::<&TeleportEffect>()
            .iter()
            .filter(|(_, t)| t.alive)
            .map(|(_, t)| EffectView::Teleport {
                pos: t.pos,
                remaining: t.remaining,
            }),
    );
    out
}
