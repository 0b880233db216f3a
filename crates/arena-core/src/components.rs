//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::commands::TankIntent;
use crate::enums::*;
use crate::types::{Charges, Rect};

/// A player-controlled tank. Never despawned; death only clears `alive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    /// Owning player index (0-based).
    pub player: usize,
    pub pos: Vec2,
    /// Facing angle (radians).
    pub angle: f32,
    /// Speed applied on the last movement step; zeroed on a rejected move.
    pub speed: f32,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub health: f32,
    pub alive: bool,
    /// Active power-up weapon, if any.
    pub power_up: Option<WeaponType>,
    pub special_ammo: u32,
    /// Ticks until the active power-up expires.
    pub power_up_timer: u32,
    pub reload_timer: u32,
    pub frozen: bool,
    pub frozen_timer: u32,
    /// Latest intent from the input/AI provider.
    pub intent: TankIntent,
}

/// Per-projectile motion state for variants that do not fly straight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionState {
    Straight,
    /// Tornado: circles a centre point that itself advances along the heading.
    Spiral { anchor: Vec2, phase: f32, radius: f32 },
    /// Steers toward the nearest enemy once `delay` reaches zero.
    Homing { delay: u32 },
    /// Reverses heading once at half lifetime.
    Boomerang { returned: bool },
    /// Speed grows geometrically up to `max_speed`.
    Accelerating { max_speed: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: WeaponType,
    pub pos: Vec2,
    /// Position at the start of the current tick (for reflection normals).
    pub prev_pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub size: f32,
    /// Remaining ticks.
    pub lifetime: u32,
    pub max_lifetime: u32,
    /// Ticks since firing.
    pub age: u32,
    pub owner: Option<usize>,
    pub pierce: Charges,
    pub bounces: Charges,
    pub motion: MotionState,
    /// Cluster children never split again.
    pub is_child: bool,
    /// Walls currently being pierced. Each is ignored until the projectile
    /// has fully left it.
    pub phasing: Vec<Rect>,
}

/// Permanent wall. Blocks movement and projectiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DestructibleWall {
    pub rect: Rect,
    pub hp: u8,
}

/// Timed gate. `open_fraction` is 1.0 fully open and 0.0 fully shut.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Gate {
    /// Full footprint of the closed gate.
    pub rect: Rect,
    pub phase: GatePhase,
    /// Ticks remaining in the current phase.
    pub timer: u32,
    pub open_fraction: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mine {
    pub pos: Vec2,
    pub owner: Option<usize>,
    pub phase: MinePhase,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightningStrike {
    pub pos: Vec2,
    pub owner: Option<usize>,
    pub phase: LightningPhase,
}

/// Directional barrier placed ahead of a tank. Blocks projectiles travelling
/// against `facing`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShieldWall {
    pub pos: Vec2,
    pub facing: f32,
    pub health: u32,
    pub owner: Option<usize>,
    pub phase: ShieldPhase,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub weapon: WeaponType,
    pub pos: Vec2,
}

/// Autonomous seeker launched by the drone weapon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Drone {
    pub pos: Vec2,
    pub angle: f32,
    pub owner: Option<usize>,
    pub lifetime: u32,
    pub alive: bool,
}

/// Training dummy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    pub health: f32,
    pub alive: bool,
    /// Ticks until a destroyed target comes back.
    pub respawn_timer: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub lifetime: u32,
    pub alive: bool,
}

/// Visual explosion ring. Damage is applied once, at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub remaining: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TeleportEffect {
    pub pos: Vec2,
    pub remaining: u32,
    pub alive: bool,
}

/// Camera parameters owned by the engine (not an entity).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub scale: f32,
    pub offset: Vec2,
    pub shake: f32,
    /// Zoom target while celebrating a winner.
    pub focus: Option<Vec2>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            shake: 0.0,
            focus: None,
        }
    }
}

/// Shrinking damage circle centred on the arena.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RingOfFire {
    pub center: Vec2,
    pub radius: f32,
    /// Ticks before shrinking starts.
    pub delay: u32,
}
