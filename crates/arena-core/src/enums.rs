//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Every weapon variant a tank can fire.
///
/// `Regular` is the default weapon and the fallback for unknown ids; every
/// other variant is a power-up that consumes special ammo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    #[default]
    Regular,
    Scatter,
    Laser,
    Explosive,
    Rocket,
    Piercing,
    Railgun,
    Freeze,
    Mine,
    Bouncer,
    Ricochet,
    Mirror,
    Cluster,
    Lightning,
    Shield,
    Tornado,
    Homing,
    Flame,
    Sniper,
    Boomerang,
    Plasma,
    Teleport,
    Drone,
    Burst,
    Incendiary,
}

impl WeaponType {
    pub const ALL: [WeaponType; 25] = [
        WeaponType::Regular,
        WeaponType::Scatter,
        WeaponType::Laser,
        WeaponType::Explosive,
        WeaponType::Rocket,
        WeaponType::Piercing,
        WeaponType::Railgun,
        WeaponType::Freeze,
        WeaponType::Mine,
        WeaponType::Bouncer,
        WeaponType::Ricochet,
        WeaponType::Mirror,
        WeaponType::Cluster,
        WeaponType::Lightning,
        WeaponType::Shield,
        WeaponType::Tornado,
        WeaponType::Homing,
        WeaponType::Flame,
        WeaponType::Sniper,
        WeaponType::Boomerang,
        WeaponType::Plasma,
        WeaponType::Teleport,
        WeaponType::Drone,
        WeaponType::Burst,
        WeaponType::Incendiary,
    ];

    /// Power-up variants (everything except `Regular`).
    pub fn power_ups() -> impl Iterator<Item = WeaponType> {
        Self::ALL.into_iter().skip(1)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponType::Regular => "regular",
            WeaponType::Scatter => "scatter",
            WeaponType::Laser => "laser",
            WeaponType::Explosive => "explosive",
            WeaponType::Rocket => "rocket",
            WeaponType::Piercing => "piercing",
            WeaponType::Railgun => "railgun",
            WeaponType::Freeze => "freeze",
            WeaponType::Mine => "mine",
            WeaponType::Bouncer => "bouncer",
            WeaponType::Ricochet => "ricochet",
            WeaponType::Mirror => "mirror",
            WeaponType::Cluster => "cluster",
            WeaponType::Lightning => "lightning",
            WeaponType::Shield => "shield",
            WeaponType::Tornado => "tornado",
            WeaponType::Homing => "homing",
            WeaponType::Flame => "flame",
            WeaponType::Sniper => "sniper",
            WeaponType::Boomerang => "boomerang",
            WeaponType::Plasma => "plasma",
            WeaponType::Teleport => "teleport",
            WeaponType::Drone => "drone",
            WeaponType::Burst => "burst",
            WeaponType::Incendiary => "incendiary",
        }
    }

    /// Look up a weapon by id, case-insensitively. Numeric ids index `ALL`.
    pub fn lookup(id: &str) -> Option<Self> {
        let id = id.trim();
        if let Ok(index) = id.parse::<usize>() {
            return Self::ALL.get(index).copied();
        }
        Self::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(id))
    }

    /// Like [`WeaponType::lookup`], falling back to `Regular` for unknown ids.
    pub fn parse(id: &str) -> Self {
        Self::lookup(id).unwrap_or_default()
    }

    /// True for every variant that draws from the special-ammo pool.
    pub fn consumes_ammo(&self) -> bool {
        *self != WeaponType::Regular
    }
}

/// Match mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Last tank standing wins the round.
    #[default]
    Competitive,
    /// Target practice: no win detection.
    Training,
}

impl GameMode {
    pub fn is_competitive(&self) -> bool {
        *self == GameMode::Competitive
    }
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Lobby,
    Active,
    Paused,
}

/// Timed gate cycle. Cyclic, no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatePhase {
    #[default]
    Open,
    Warning,
    Closing,
    Closed,
    Opening,
}

impl GatePhase {
    pub fn next(&self) -> GatePhase {
        match self {
            GatePhase::Open => GatePhase::Warning,
            GatePhase::Warning => GatePhase::Closing,
            GatePhase::Closing => GatePhase::Closed,
            GatePhase::Closed => GatePhase::Opening,
            GatePhase::Opening => GatePhase::Open,
        }
    }
}

/// Mine lifecycle: arm → trigger → detonate, monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinePhase {
    /// Counting down to armed.
    Arming { remaining: u32 },
    /// Scanning for non-owner tanks.
    Armed,
    /// Tripped; counting down to detonation.
    Triggered { remaining: u32 },
    /// Exploded; awaiting removal.
    Detonated,
}

/// Lightning strike lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightningPhase {
    /// Telegraphed warning at the target point.
    Charging { remaining: u32 },
    /// Bolt visible after the damage has been applied.
    Striking { remaining: u32 },
    Done,
}

/// Shield barrier lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldPhase {
    Active { remaining: u32 },
    Collapsed,
}

/// Per-tile terrain classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainClass {
    #[default]
    Open,
    Sand,
    Mud,
    Blocking,
}

impl TerrainClass {
    /// Decode a raw tile code. Unknown codes read as `Open`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => TerrainClass::Open,
            1 => TerrainClass::Sand,
            2 => TerrainClass::Mud,
            3 => TerrainClass::Blocking,
            _ => TerrainClass::Open,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            TerrainClass::Open => 0,
            TerrainClass::Sand => 1,
            TerrainClass::Mud => 2,
            TerrainClass::Blocking => 3,
        }
    }

    pub fn is_blocking(&self) -> bool {
        *self == TerrainClass::Blocking
    }
}
