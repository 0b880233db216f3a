//! Runtime tuning table.
//!
//! Every tunable defaults to its value in [`crate::constants`]. A JSON file may
//! override any subset; missing fields keep their defaults. The table is
//! resolved once when an engine is built and never mutated afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub tank: TankTuning,
    pub projectile: ProjectileTuning,
    pub power_ups: PowerUpTuning,
    pub gate: GateTuning,
    pub mine: MineTuning,
    pub lightning: LightningTuning,
    pub shield: ShieldTuning,
    pub round: RoundTuning,
    pub spawn: SpawnTuning,
    pub ring: RingTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
    pub tile_size: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            tile_size: TILE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    pub radius: f32,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub max_health: f32,
    pub reload_ticks: u32,
    pub barrel_length: f32,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            radius: TANK_RADIUS,
            move_speed: TANK_MOVE_SPEED,
            turn_speed: TANK_TURN_SPEED,
            max_health: TANK_MAX_HEALTH,
            reload_ticks: TANK_RELOAD_TICKS,
            barrel_length: BARREL_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Base speed before the weapon multiplier.
    pub speed: f32,
    pub size: f32,
    pub lifetime_ticks: u32,
    pub owner_grace_ticks: u32,
    pub freeze_ticks: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_SPEED,
            size: PROJECTILE_SIZE,
            lifetime_ticks: PROJECTILE_LIFETIME_TICKS,
            owner_grace_ticks: OWNER_GRACE_TICKS,
            freeze_ticks: FREEZE_DURATION_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub max_special_ammo: u32,
    pub duration_ticks: u32,
    pub pickup_radius: f32,
    pub per_round: usize,
    pub max_count: usize,
    pub spawn_interval_ticks: u32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            max_special_ammo: MAX_SPECIAL_AMMO,
            duration_ticks: POWER_UP_DURATION_TICKS,
            pickup_radius: POWER_UP_PICKUP_RADIUS,
            per_round: POWER_UPS_PER_ROUND,
            max_count: POWER_UP_MAX_COUNT,
            spawn_interval_ticks: POWER_UP_SPAWN_INTERVAL_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateTuning {
    pub open_ticks: u32,
    pub warning_ticks: u32,
    pub closing_ticks: u32,
    pub closed_ticks: u32,
    pub opening_ticks: u32,
    pub crush_damage: f32,
    /// Open fraction below which a closing gate blocks movement.
    pub blocking_threshold: f32,
}

impl Default for GateTuning {
    fn default() -> Self {
        Self {
            open_ticks: GATE_OPEN_TICKS,
            warning_ticks: GATE_WARNING_TICKS,
            closing_ticks: GATE_CLOSING_TICKS,
            closed_ticks: GATE_CLOSED_TICKS,
            opening_ticks: GATE_OPENING_TICKS,
            crush_damage: GATE_CRUSH_DAMAGE,
            blocking_threshold: GATE_BLOCKING_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineTuning {
    pub arm_ticks: u32,
    pub trigger_radius: f32,
    pub detonation_ticks: u32,
    pub explosion_radius: f32,
    pub max_damage: f32,
}

impl Default for MineTuning {
    fn default() -> Self {
        Self {
            arm_ticks: MINE_ARM_TICKS,
            trigger_radius: MINE_TRIGGER_RADIUS,
            detonation_ticks: MINE_DETONATION_TICKS,
            explosion_radius: MINE_EXPLOSION_RADIUS,
            max_damage: MINE_MAX_DAMAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningTuning {
    /// Distance ahead of the barrel where the strike lands.
    pub offset: f32,
    pub charge_ticks: u32,
    pub strike_ticks: u32,
    pub radius: f32,
    pub damage: f32,
}

impl Default for LightningTuning {
    fn default() -> Self {
        Self {
            offset: LIGHTNING_OFFSET,
            charge_ticks: LIGHTNING_CHARGE_TICKS,
            strike_ticks: LIGHTNING_STRIKE_TICKS,
            radius: LIGHTNING_RADIUS,
            damage: LIGHTNING_DAMAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldTuning {
    pub offset: f32,
    pub length: f32,
    pub thickness: f32,
    pub health: u32,
    pub lifetime_ticks: u32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            offset: SHIELD_OFFSET,
            length: SHIELD_LENGTH,
            thickness: SHIELD_THICKNESS,
            health: SHIELD_HEALTH,
            lifetime_ticks: SHIELD_LIFETIME_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    pub grace_ticks: u32,
    pub reset_delay_ticks: u32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            grace_ticks: GRACE_PERIOD_TICKS,
            reset_delay_ticks: ROUND_RESET_DELAY_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub wall_clearance: f32,
    pub min_tank_distance: f32,
    pub attempts: usize,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            wall_clearance: SPAWN_WALL_CLEARANCE,
            min_tank_distance: SPAWN_MIN_TANK_DISTANCE,
            attempts: SPAWN_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingTuning {
    pub start_delay_ticks: u32,
    pub shrink_per_tick: f32,
    pub min_radius: f32,
    pub damage_per_tick: f32,
}

impl Default for RingTuning {
    fn default() -> Self {
        Self {
            start_delay_ticks: RING_START_DELAY_TICKS,
            shrink_per_tick: RING_SHRINK_PER_TICK,
            min_radius: RING_MIN_RADIUS,
            damage_per_tick: RING_DAMAGE_PER_TICK,
        }
    }
}

fn positive(value: f32, name: &str) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(value: f32, name: &str) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be >= 0, got {value}")))
    }
}

fn nonzero_ticks(value: u32, name: &str) -> SimResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be at least one tick")))
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a JSON tuning file from disk.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> SimResult<()> {
        positive(self.arena.width, "arena.width")?;
        positive(self.arena.height, "arena.height")?;
        positive(self.arena.tile_size, "arena.tile_size")?;
        if self.arena.tile_size > self.arena.width.min(self.arena.height) {
            return Err(SimError::InvalidConfig(
                "arena.tile_size exceeds the arena".into(),
            ));
        }

        positive(self.tank.radius, "tank.radius")?;
        non_negative(self.tank.move_speed, "tank.move_speed")?;
        non_negative(self.tank.turn_speed, "tank.turn_speed")?;
        positive(self.tank.max_health, "tank.max_health")?;
        non_negative(self.tank.barrel_length, "tank.barrel_length")?;

        positive(self.projectile.speed, "projectile.speed")?;
        positive(self.projectile.size, "projectile.size")?;
        nonzero_ticks(self.projectile.lifetime_ticks, "projectile.lifetime_ticks")?;

        positive(self.power_ups.pickup_radius, "power_ups.pickup_radius")?;
        if self.power_ups.max_special_ammo == 0 {
            return Err(SimError::InvalidConfig(
                "power_ups.max_special_ammo must be at least 1".into(),
            ));
        }

        let g = &self.gate;
        nonzero_ticks(g.open_ticks, "gate.open_ticks")?;
        nonzero_ticks(g.warning_ticks, "gate.warning_ticks")?;
        nonzero_ticks(g.closing_ticks, "gate.closing_ticks")?;
        nonzero_ticks(g.closed_ticks, "gate.closed_ticks")?;
        nonzero_ticks(g.opening_ticks, "gate.opening_ticks")?;
        non_negative(g.crush_damage, "gate.crush_damage")?;
        if !(0.0..=1.0).contains(&g.blocking_threshold) {
            return Err(SimError::InvalidConfig(format!(
                "gate.blocking_threshold must be within [0, 1], got {}",
                g.blocking_threshold
            )));
        }

        positive(self.mine.trigger_radius, "mine.trigger_radius")?;
        positive(self.mine.explosion_radius, "mine.explosion_radius")?;
        non_negative(self.mine.max_damage, "mine.max_damage")?;

        positive(self.lightning.radius, "lightning.radius")?;
        non_negative(self.lightning.damage, "lightning.damage")?;

        positive(self.shield.length, "shield.length")?;
        positive(self.shield.thickness, "shield.thickness")?;

        if self.spawn.attempts == 0 {
            return Err(SimError::InvalidConfig("spawn.attempts must be at least 1".into()));
        }
        non_negative(self.spawn.wall_clearance, "spawn.wall_clearance")?;
        non_negative(self.spawn.min_tank_distance, "spawn.min_tank_distance")?;

        non_negative(self.ring.shrink_per_tick, "ring.shrink_per_tick")?;
        non_negative(self.ring.min_radius, "ring.min_radius")?;
        non_negative(self.ring.damage_per_tick, "ring.damage_per_tick")?;
        Ok(())
    }

    /// Tiles along x and y.
    pub fn grid_dims(&self) -> (usize, usize) {
        (
            (self.arena.width / self.arena.tile_size).floor() as usize,
            (self.arena.height / self.arena.tile_size).floor() as usize,
        )
    }
}
