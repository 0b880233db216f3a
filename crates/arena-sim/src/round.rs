//! Round lifecycle: grace period, win detection, scoring and reset.

use hecs::{Entity, World};
use log::info;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use arena_core::components::*;
use arena_core::enums::GameMode;
use arena_core::events::SimEvent;
use arena_core::tuning::Tuning;
use arena_core::types::angle_to;
use arena_terrain::TerrainProvider;
use glam::Vec2;

use crate::systems::{camera, powerups, ring};
use crate::world_setup::{new_tank, obstacle_footprints, safe_position, Placement, SpawnKind};

/// Scores and round bookkeeping owned by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundState {
    /// Rounds started so far (1 after the first reset).
    pub round: u32,
    pub scores: Vec<u32>,
    pub kills: Vec<u32>,
    /// Remaining grace ticks. `None` once the grace period is over.
    pub grace: Option<u32>,
    pub winner: Option<usize>,
    /// Set while a finished round waits for its reset. Guards against
    /// scoring the same win twice.
    pub resetting: bool,
    pub reset_timer: Option<u32>,
}

impl RoundState {
    pub fn new(players: usize) -> Self {
        Self {
            scores: vec![0; players],
            kills: vec![0; players],
            ..Self::default()
        }
    }

    pub fn in_grace(&self) -> bool {
        self.grace.is_some()
    }
}

/// Count the grace timer down; it clears itself at zero.
pub fn tick_grace(state: &mut RoundState) {
    state.grace = match state.grace {
        Some(n) if n > 1 => Some(n - 1),
        _ => None,
    };
}

/// Living tanks as `(player, pos)`.
pub fn survivors(world: &World) -> Vec<(usize, Vec2)> {
    world
        .query::<&Tank>()
        .iter()
        .filter(|(_, t)| t.alive)
        .map(|(_, t)| (t.player, t.pos))
        .collect()
}

/// Win detection. In competitive mode, exactly one survivor wins the round;
/// no survivors ends it as a draw. Returns the winner recorded by this call.
///
/// Does nothing while a grace period runs or a finished round is pending reset.
pub fn evaluate(
    world: &World,
    state: &mut RoundState,
    mode: GameMode,
    cam: &mut Camera,
    events: &mut Vec<SimEvent>,
    tuning: &Tuning,
) -> Option<usize> {
    if !mode.is_competitive() || state.resetting || state.in_grace() || state.scores.len() < 2 {
        return None;
    }
    let alive = survivors(world);
    match alive.as_slice() {
        [(player, pos)] => {
            let (player, pos) = (*player, *pos);
            state.resetting = true;
            state.winner = Some(player);
            let score = match state.scores.get_mut(player) {
                Some(s) => {
                    *s += 1;
                    *s
                }
                None => 0,
            };
            state.reset_timer = Some(tuning.round.reset_delay_ticks);
            camera::focus(cam, pos);
            info!("round {} won by player {player} (score {score})", state.round);
            events.push(SimEvent::RoundWon { player, score });
            Some(player)
        }
        [] => {
            state.resetting = true;
            state.reset_timer = Some(tuning.round.reset_delay_ticks);
            info!("round {} ended in a draw", state.round);
            None
        }
        _ => None,
    }
}

/// Count down to the reset. Returns true on the tick the reset is due.
pub fn tick_reset_timer(state: &mut RoundState) -> bool {
    match state.reset_timer {
        Some(n) if n > 1 => {
            state.reset_timer = Some(n - 1);
            false
        }
        Some(_) => {
            state.reset_timer = None;
            true
        }
        None => false,
    }
}

/// Everything a round reset touches outside `RoundState`.
pub struct ResetCtx<'a> {
    pub world: &'a mut World,
    pub terrain: &'a mut dyn TerrainProvider,
    pub rng: &'a mut ChaCha8Rng,
    pub tuning: &'a Tuning,
    pub camera: &'a mut Camera,
    pub ring: Option<&'a mut RingOfFire>,
    pub events: &'a mut Vec<SimEvent>,
}

/// Clear transient entities, start a grace period, regenerate terrain,
/// reset the ring, seed power-ups and respawn every tank.
pub fn reset(ctx: ResetCtx<'_>, state: &mut RoundState) {
    let ResetCtx {
        world,
        terrain,
        rng,
        tuning,
        camera: cam,
        ring: ring_of_fire,
        events,
    } = ctx;

    clear_transients(world);

    let grace = tuning.round.grace_ticks;
    state.grace = (grace > 0).then_some(grace);
    state.winner = None;
    state.resetting = false;
    state.reset_timer = None;
    camera::reset(cam);

    terrain.regenerate(rng);
    if let Some(r) = ring_of_fire {
        *r = ring::new_ring(tuning);
    }
    powerups::seed(world, rng, &*terrain, tuning);
    respawn_tanks(world, &*terrain, rng, tuning);

    state.round += 1;
    info!("round {} started", state.round);
    events.push(SimEvent::RoundReset { round: state.round });
}

fn clear_transients(world: &mut World) {
    let mut doomed: Vec<Entity> = Vec::new();
    doomed.extend(world.query::<&Projectile>().iter().map(|(e, _)| e));
    doomed.extend(world.query::<&Particle>().iter().map(|(e, _)| e));
    doomed.extend(world.query::<&Explosion>().iter().map(|(e, _)| e));
    doomed.extend(world.query::<&Mine>().iter().map(|(e, _)| e));
    doomed.extend(world.query::<&Drone>().iter().map(|(e, _)| e));
    doomed.extend(world.query::<&PowerUp>().iter().map(|(e, _)| e));
    doomed.extend(world.query::<&TeleportEffect>().iter().map(|(e, _)| e));
    doomed.extend(world.query::<&LightningStrike>().iter().map(|(e, _)| e));
    doomed.extend(world.query::<&ShieldWall>().iter().map(|(e, _)| e));
    for e in doomed {
        let _ = world.despawn(e);
    }
}

/// Place each tank at a safe spot, facing the arena centre, at full health
/// and with no power-up. Tanks are placed in player order so each one keeps
/// its distance from the ones already placed.
fn respawn_tanks(
    world: &mut World,
    terrain: &dyn TerrainProvider,
    rng: &mut ChaCha8Rng,
    tuning: &Tuning,
) {
    let mut tanks: Vec<(Entity, usize)> = world
        .query::<&Tank>()
        .iter()
        .map(|(e, t)| (e, t.player))
        .collect();
    tanks.sort_by_key(|(_, player)| *player);

    let obstacles = obstacle_footprints(world);
    let center = Vec2::new(tuning.arena.width * 0.5, tuning.arena.height * 0.5);
    let mut placed: Vec<Vec2> = Vec::new();

    for (entity, player) in tanks {
        let rules = Placement {
            kind: SpawnKind::Tank,
            obstacles: &obstacles,
            terrain,
            avoid: &placed,
            tuning,
        };
        let pos = safe_position(rng, &rules, player);
        placed.push(pos);

        if let Ok(mut tank) = world.get::<&mut Tank>(entity) {
            let intent = tank.intent;
            *tank = new_tank(player, pos, angle_to(pos, center), tuning);
            tank.intent = intent;
        }
    }
}
