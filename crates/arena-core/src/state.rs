//! Game state snapshot: the complete visible state pulled by renderers and UI
//! after each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{Camera, RingOfFire};
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Rect, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub round: u32,
    pub tanks: Vec<TankView>,
    pub projectiles: Vec<ProjectileView>,
    pub obstacles: Vec<ObstacleView>,
    pub hazards: Vec<HazardView>,
    pub power_ups: Vec<PowerUpView>,
    pub drones: Vec<DroneView>,
    pub targets: Vec<TargetView>,
    pub effects: Vec<EffectView>,
    pub scores: Vec<u32>,
    pub kills: Vec<u32>,
    pub winner: Option<usize>,
    /// Remaining grace ticks, if a grace period is running.
    pub grace: Option<u32>,
    pub camera: CameraView,
    pub ring: Option<RingOfFire>,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankView {
    pub player: usize,
    pub pos: Vec2,
    pub angle: f32,
    pub health: f32,
    pub alive: bool,
    pub frozen: bool,
    pub power_up: Option<WeaponType>,
    pub special_ammo: u32,
    /// Remaining special ammo as a fraction of the maximum (0.0 - 1.0).
    pub ammo_pct: f32,
    /// Reload progress (1.0 = ready to fire).
    pub reload_pct: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub kind: WeaponType,
    pub pos: Vec2,
    pub angle: f32,
    pub size: f32,
    pub owner: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObstacleView {
    Wall { rect: Rect },
    Destructible { rect: Rect, hp: u8 },
    Gate { rect: Rect, phase: GatePhase, open_fraction: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HazardView {
    Mine { pos: Vec2, owner: Option<usize>, phase: MinePhase },
    Lightning { pos: Vec2, phase: LightningPhase },
    Shield { pos: Vec2, facing: f32, health: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub weapon: WeaponType,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneView {
    pub pos: Vec2,
    pub angle: f32,
    pub owner: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub pos: Vec2,
    pub health: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectView {
    Particle { pos: Vec2 },
    Explosion { pos: Vec2, radius: f32, remaining: u32 },
    Teleport { pos: Vec2, remaining: u32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraView {
    pub scale: f32,
    pub offset: Vec2,
    pub shake: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        CameraView::from(Camera::default())
    }
}

impl From<Camera> for CameraView {
    fn from(c: Camera) -> Self {
        Self {
            scale: c.scale,
            offset: c.offset,
            shake: c.shake,
        }
    }
}
