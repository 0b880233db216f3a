//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems in a fixed order, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_core::commands::{PlayerCommand, TankIntent};
use arena_core::components::{Camera, RingOfFire, Tank};
use arena_core::enums::{GameMode, GamePhase, WeaponType};
use arena_core::error::{SimError, SimResult};
use arena_core::events::SimEvent;
use arena_core::state::GameStateSnapshot;
use arena_core::tuning::Tuning;
use arena_core::types::{Rect, SimTime};
use arena_terrain::{ScatterDensity, TerrainProvider, TileGrid};
use glam::Vec2;

use crate::round::{self, ResetCtx, RoundState};
use crate::systems;
use crate::systems::damage::DamageCtx;
use crate::systems::tick_env::TickEnv;
use crate::weapons;
use crate::world_setup::{self, ArenaLayout};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub mode: GameMode,
    pub player_count: usize,
    pub tuning: Tuning,
    /// Enable the shrinking ring of fire.
    pub ring_of_fire: bool,
    pub layout: ArenaLayout,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mode: GameMode::default(),
            player_count: 2,
            tuning: Tuning::default(),
            ring_of_fire: false,
            layout: ArenaLayout::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    terrain: Box<dyn TerrainProvider>,
    tuning: Tuning,
    layout: ArenaLayout,
    mode: GameMode,
    player_count: usize,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
    round: RoundState,
    camera: Camera,
    ring: Option<RingOfFire>,
    power_up_timer: u32,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.tuning.validate()?;
        if config.player_count == 0 {
            return Err(SimError::InvalidConfig(
                "player_count must be at least 1".into(),
            ));
        }

        let (cols, rows) = config.tuning.grid_dims();
        let density = match config.layout {
            ArenaLayout::Standard => ScatterDensity::default(),
            ArenaLayout::Empty => ScatterDensity {
                blocking: 0.0,
                sand: 0.0,
                mud: 0.0,
            },
        };
        let terrain = TileGrid::new(cols, rows, config.tuning.arena.tile_size).with_density(density);

        Ok(Self {
            world: World::new(),
            terrain: Box::new(terrain),
            ring: config.ring_of_fire.then(|| systems::ring::new_ring(&config.tuning)),
            tuning: config.tuning,
            layout: config.layout,
            mode: config.mode,
            player_count: config.player_count,
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            round: RoundState::new(config.player_count),
            camera: Camera::default(),
            power_up_timer: 0,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        self.snapshot()
    }

    /// Current state without advancing. Drains pending events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        let ctx = systems::snapshot::SnapshotContext {
            time: self.time,
            phase: self.phase,
            mode: self.mode,
            round: &self.round,
            camera: &self.camera,
            ring: self.ring.as_ref(),
            tuning: &self.tuning,
        };
        systems::snapshot::build_snapshot(&self.world, &ctx, events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn terrain(&self) -> &dyn TerrainProvider {
        self.terrain.as_ref()
    }

    /// The tank entity for `player`, if spawned.
    pub fn tank_entity(&self, player: usize) -> Option<Entity> {
        self.world
            .query::<&Tank>()
            .iter()
            .find(|(_, t)| t.player == player)
            .map(|(e, _)| e)
    }

    /// Copy of the tank for `player`.
    pub fn tank(&self, player: usize) -> Option<Tank> {
        let entity = self.tank_entity(player)?;
        self.world.get::<&Tank>(entity).ok().map(|t| Tank::clone(&t))
    }

    /// Mutate the tank for `player` in place. Returns false if it does not exist.
    pub fn with_tank(&mut self, player: usize, f: impl FnOnce(&mut Tank)) -> bool {
        let Some(entity) = self.tank_entity(player) else {
            return false;
        };
        match self.world.get::<&mut Tank>(entity) {
            Ok(mut tank) => {
                f(&mut tank);
                true
            }
            Err(_) => false,
        }
    }

    /// Move a tank to `pos` facing `angle`.
    pub fn place_tank(&mut self, player: usize, pos: Vec2, angle: f32) -> bool {
        self.with_tank(player, |t| {
            t.pos = pos;
            t.angle = angle;
        })
    }

    /// Hand `weapon` to a tank as if it had picked it up.
    pub fn grant_power_up(&mut self, player: usize, weapon: WeaponType) -> bool {
        let tuning = self.tuning.clone();
        self.with_tank(player, |t| systems::powerups::apply(t, weapon, &tuning))
    }

    /// Fire `weapon` for `player` from an explicit origin and angle, bypassing
    /// reload. Ammo is charged as usual.
    pub fn fire_from(
        &mut self,
        player: usize,
        origin: Vec2,
        angle: f32,
        weapon: WeaponType,
    ) -> SimResult<()> {
        let entity = self
            .tank_entity(player)
            .ok_or(SimError::MissingEntity { what: "tank" })?;
        let spawns = {
            let mut tank = self
                .world
                .get::<&mut Tank>(entity)
                .map_err(|_| SimError::MissingEntity { what: "tank" })?;
            weapons::fire(origin, angle, Some(player), weapon, &mut tank, &self.tuning)
        };
        self.events.push(SimEvent::Fired { player, weapon });
        world_setup::spawn_all(&mut self.world, spawns);
        Ok(())
    }

    pub fn spawn_wall(&mut self, rect: Rect) -> Entity {
        world_setup::spawn_wall(&mut self.world, rect)
    }

    pub fn spawn_destructible(&mut self, rect: Rect) -> Entity {
        world_setup::spawn_destructible(&mut self.world, self.terrain.as_mut(), rect)
    }

    pub fn spawn_gate(&mut self, rect: Rect) -> Entity {
        world_setup::spawn_gate(&mut self.world, rect, &self.tuning)
    }

    pub fn spawn_target(&mut self, pos: Vec2) -> Entity {
        world_setup::spawn_target(&mut self.world, pos)
    }

    /// End the grace period immediately.
    pub fn skip_grace(&mut self) {
        self.round.grace = None;
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartMatch { mode } => {
                if self.phase == GamePhase::Lobby {
                    self.start_match(mode);
                }
            }
            PlayerCommand::SetIntent { player, intent } => {
                let intent: TankIntent = intent.clamped();
                if !self.with_tank(player, |t| t.intent = intent) {
                    debug!("intent for unknown player {player} ignored");
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::ForceReset => {
                if self.phase != GamePhase::Lobby {
                    self.reset_round();
                }
            }
        }
    }

    fn start_match(&mut self, mode: GameMode) {
        self.mode = mode;
        world_setup::build_arena(
            &mut self.world,
            self.terrain.as_mut(),
            self.layout,
            &self.tuning,
        );
        world_setup::spawn_tanks(&mut self.world, self.player_count, &self.tuning);
        if mode == GameMode::Training {
            world_setup::spawn_training_targets(
                &mut self.world,
                self.terrain.as_ref(),
                &mut self.rng,
                &self.tuning,
            );
        }
        self.round = RoundState::new(self.player_count);
        self.time = SimTime::default();
        self.reset_round();
        self.phase = GamePhase::Active;
        info!(
            "match started: {:?}, {} players, layout {:?}",
            mode, self.player_count, self.layout
        );
    }

    fn reset_round(&mut self) {
        self.power_up_timer = 0;
        let ctx = ResetCtx {
            world: &mut self.world,
            terrain: self.terrain.as_mut(),
            rng: &mut self.rng,
            tuning: &self.tuning,
            camera: &mut self.camera,
            ring: self.ring.as_mut(),
            events: &mut self.events,
        };
        round::reset(ctx, &mut self.round);
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;

        // 1. Grace timer
        round::tick_grace(&mut self.round);
        let grace = self.round.in_grace();

        {
            let mut env = TickEnv {
                tick,
                tuning: &self.tuning,
                damage: DamageCtx {
                    grace,
                    kills: &mut self.round.kills,
                    events: &mut self.events,
                },
                rng: &mut self.rng,
                camera: &mut self.camera,
                terrain: self.terrain.as_mut(),
            };
            // 2. Tanks, targets, drones
            systems::tanks::run(&mut self.world, &mut env);
            systems::targets::run(&mut self.world);
            systems::drones::run(&mut self.world, &mut env, &mut self.despawn_buffer);
            // 3. Ring of fire
            if let Some(ring) = self.ring.as_mut() {
                systems::ring::run(ring, &mut self.world, &mut env);
            }
            // 4. Camera
            systems::camera::run(env.camera, env.rng, env.tuning);
        }

        // 5. Game over
        round::evaluate(
            &self.world,
            &mut self.round,
            self.mode,
            &mut self.camera,
            &mut self.events,
            &self.tuning,
        );

        {
            let mut env = TickEnv {
                tick,
                tuning: &self.tuning,
                damage: DamageCtx {
                    grace,
                    kills: &mut self.round.kills,
                    events: &mut self.events,
                },
                rng: &mut self.rng,
                camera: &mut self.camera,
                terrain: self.terrain.as_mut(),
            };
            // 6. Projectiles
            systems::projectiles::run(&mut self.world, &mut env);
            // 7. Power-ups
            systems::powerups::run(
                &mut self.world,
                &mut env,
                &mut self.power_up_timer,
                &mut self.despawn_buffer,
            );
            // 8. Cosmetic effects
            systems::effects::run(&mut self.world, &mut self.despawn_buffer);
            // 9. Hazards and gates
            systems::hazards::run_mines(&mut self.world, &mut env, &mut self.despawn_buffer);
            systems::hazards::run_lightning(&mut self.world, &mut env, &mut self.despawn_buffer);
            systems::hazards::run_shields(&mut self.world, &mut self.despawn_buffer);
            systems::obstacles::run(&mut self.world, &mut env);
        }

        // 10. Pending round reset
        if round::tick_reset_timer(&mut self.round) {
            self.reset_round();
        }
    }
}
