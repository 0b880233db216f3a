//! Scripted demo match: command-line options and a simple bot driver.

use arena_core::commands::{PlayerCommand, TankIntent};
use arena_core::state::{GameStateSnapshot, TankView};
use arena_core::tuning::Tuning;
use arena_core::types::{angle_to, normalize_angle};
use arena_sim::engine::SimConfig;

/// Aim error (radians) below which a bot pulls the trigger.
const FIRE_CONE: f32 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoArgs {
    pub tuning_path: Option<String>,
    pub seed: u64,
    pub players: usize,
    /// Simulation ticks to run before shutting down.
    pub ticks: u64,
    pub ring_of_fire: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            tuning_path: None,
            seed: 42,
            players: 2,
            ticks: 1200,
            ring_of_fire: false,
        }
    }
}

impl DemoArgs {
    /// Parse `--tuning <path> --seed <n> --players <n> --ticks <n> --ring`.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut out = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--ring" => out.ring_of_fire = true,
                "--tuning" => out.tuning_path = Some(value(&flag, args.next())?),
                "--seed" => out.seed = number(&flag, args.next())?,
                "--players" => out.players = number(&flag, args.next())?,
                "--ticks" => out.ticks = number(&flag, args.next())?,
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(out)
    }

    /// Engine config for these options. Loads the tuning file if one was given.
    pub fn config(&self) -> Result<SimConfig, String> {
        let tuning = match &self.tuning_path {
            Some(path) => Tuning::load(path).map_err(|e| format!("{path}: {e}"))?,
            None => Tuning::default(),
        };
        Ok(SimConfig {
            seed: self.seed,
            player_count: self.players,
            tuning,
            ring_of_fire: self.ring_of_fire,
            ..Default::default()
        })
    }
}

fn value(flag: &str, v: Option<String>) -> Result<String, String> {
    v.ok_or_else(|| format!("{flag} needs a value"))
}

fn number<T: std::str::FromStr>(flag: &str, v: Option<String>) -> Result<T, String> {
    let v = value(flag, v)?;
    v.parse()
        .map_err(|_| format!("{flag}: not a number: {v}"))
}

/// One intent per living tank: turn toward the nearest enemy, creep forward
/// and fire once roughly on target.
pub fn bot_commands(snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
    snapshot
        .tanks
        .iter()
        .filter(|t| t.alive)
        .map(|tank| PlayerCommand::SetIntent {
            player: tank.player,
            intent: bot_intent(tank, &snapshot.tanks),
        })
        .collect()
}

fn bot_intent(tank: &TankView, all: &[TankView]) -> TankIntent {
    let nearest = all
        .iter()
        .filter(|t| t.alive && t.player != tank.player)
        .min_by(|a, b| {
            tank.pos
                .distance_squared(a.pos)
                .total_cmp(&tank.pos.distance_squared(b.pos))
        });
    let Some(enemy) = nearest else {
        return TankIntent::default();
    };
    let error = normalize_angle(angle_to(tank.pos, enemy.pos) - tank.angle);
    TankIntent {
        forward: 0.6,
        turn: (error * 4.0).clamp(-1.0, 1.0),
        fire: error.abs() < FIRE_CONE,
    }
}
