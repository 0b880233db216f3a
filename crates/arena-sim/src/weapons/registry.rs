//! Weapon registry: one strategy record per weapon variant.
//!
//! Every projectile behaviour is data here; the resolver in
//! `systems::projectiles` dispatches on these fields instead of per-variant
//! code paths.

use arena_core::constants::*;
use arena_core::enums::WeaponType;
use arena_core::types::Charges;

/// How a trigger pull turns into entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirePattern {
    Single,
    /// One projectile per angular offset.
    Spread(&'static [f32]),
    /// Primary plus a twin fired at angle + π.
    Mirror,
    /// Projectiles in a line along the aim, offset backwards by these distances.
    Burst(&'static [f32]),
    PlaceMine,
    Lightning,
    Shield,
    Drone,
}

/// Response to a wall, tile or blocking-gate contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPolicy {
    /// Mirror the heading while bounces remain, then terminal.
    Reflect,
    /// Pass through while pierces remain, then fall back to `Reflect`.
    Pierce,
    /// Terminal on first contact.
    Stop,
}

/// Response to a tank or target contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TankPolicy {
    /// Instant kill; projectile removed.
    Destroy,
    /// Instant kill; the projectile continues while pierces remain.
    DestroyPierce,
    /// Freeze instead of killing; projectile removed.
    Freeze,
    /// No direct hit; the terminal effect does the damage.
    Detonate,
}

/// What happens where a projectile ends on impact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerminalEffect {
    None,
    Explode { radius: f32, damage: f32, shake: f32 },
    Cluster,
    Teleport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionProfile {
    Straight,
    Spiral,
    Homing,
    Boomerang,
    Accelerating,
}

/// Strategy record for one weapon variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub speed_mult: f32,
    pub size_mult: f32,
    pub lifetime_mult: f32,
    pub pattern: FirePattern,
    pub wall: WallPolicy,
    pub tank: TankPolicy,
    pub terminal: TerminalEffect,
    pub bounces: Charges,
    pub pierce: Charges,
    pub motion: MotionProfile,
    /// Hit points removed from a destructible wall per contact.
    pub wall_damage: u8,
}

const REGULAR: WeaponSpec = WeaponSpec {
    speed_mult: 1.0,
    size_mult: 1.0,
    lifetime_mult: 1.0,
    pattern: FirePattern::Single,
    wall: WallPolicy::Reflect,
    tank: TankPolicy::Destroy,
    terminal: TerminalEffect::None,
    bounces: Charges::Unlimited,
    pierce: Charges::NONE,
    motion: MotionProfile::Straight,
    wall_damage: 1,
};

/// Spec for a weapon variant.
pub fn spec(weapon: WeaponType) -> WeaponSpec {
    match weapon {
        WeaponType::Regular | WeaponType::Mine | WeaponType::Lightning | WeaponType::Shield => {
            REGULAR
        }
        WeaponType::Scatter => WeaponSpec {
            size_mult: 0.75,
            lifetime_mult: 0.6,
            pattern: FirePattern::Spread(&SCATTER_OFFSETS),
            ..REGULAR
        },
        WeaponType::Laser => WeaponSpec {
            speed_mult: 2.5,
            size_mult: 0.5,
            lifetime_mult: 0.8,
            ..REGULAR
        },
        WeaponType::Explosive => WeaponSpec {
            speed_mult: 0.8,
            size_mult: 1.5,
            wall: WallPolicy::Stop,
            tank: TankPolicy::Detonate,
            terminal: TerminalEffect::Explode {
                radius: EXPLOSIVE_RADIUS,
                damage: EXPLOSIVE_DAMAGE,
                shake: 0.0,
            },
            ..REGULAR
        },
        WeaponType::Rocket => WeaponSpec {
            size_mult: 1.5,
            lifetime_mult: 1.2,
            wall: WallPolicy::Stop,
            tank: TankPolicy::Detonate,
            terminal: TerminalEffect::Explode {
                radius: ROCKET_RADIUS,
                damage: ROCKET_DAMAGE,
                shake: ROCKET_SHAKE,
            },
            motion: MotionProfile::Accelerating,
            ..REGULAR
        },
        WeaponType::Piercing => WeaponSpec {
            speed_mult: 1.2,
            wall: WallPolicy::Pierce,
            tank: TankPolicy::DestroyPierce,
            pierce: Charges::Limited(PIERCING_BUDGET),
            ..REGULAR
        },
        WeaponType::Railgun => WeaponSpec {
            speed_mult: 3.0,
            size_mult: 0.75,
            lifetime_mult: 0.8,
            wall: WallPolicy::Pierce,
            tank: TankPolicy::DestroyPierce,
            pierce: Charges::Unlimited,
            ..REGULAR
        },
        WeaponType::Freeze => WeaponSpec {
            tank: TankPolicy::Freeze,
            ..REGULAR
        },
        WeaponType::Bouncer => WeaponSpec {
            bounces: Charges::Limited(BOUNCER_BUDGET),
            ..REGULAR
        },
        WeaponType::Ricochet => WeaponSpec {
            speed_mult: 1.3,
            bounces: Charges::Limited(RICOCHET_BUDGET),
            ..REGULAR
        },
        WeaponType::Mirror => WeaponSpec {
            pattern: FirePattern::Mirror,
            ..REGULAR
        },
        WeaponType::Cluster => WeaponSpec {
            size_mult: 1.25,
            wall: WallPolicy::Stop,
            terminal: TerminalEffect::Cluster,
            ..REGULAR
        },
        WeaponType::Tornado => WeaponSpec {
            speed_mult: 0.8,
            size_mult: 1.25,
            lifetime_mult: 1.2,
            motion: MotionProfile::Spiral,
            ..REGULAR
        },
        WeaponType::Homing => WeaponSpec {
            speed_mult: 0.9,
            lifetime_mult: 1.5,
            motion: MotionProfile::Homing,
            ..REGULAR
        },
        WeaponType::Flame => WeaponSpec {
            speed_mult: 1.1,
            size_mult: 0.75,
            lifetime_mult: 0.25,
            pattern: FirePattern::Spread(&FLAME_OFFSETS),
            wall: WallPolicy::Stop,
            ..REGULAR
        },
        WeaponType::Sniper => WeaponSpec {
            speed_mult: 3.5,
            size_mult: 0.6,
            lifetime_mult: 2.0,
            wall: WallPolicy::Stop,
            ..REGULAR
        },
        WeaponType::Boomerang => WeaponSpec {
            speed_mult: 1.2,
            motion: MotionProfile::Boomerang,
            ..REGULAR
        },
        WeaponType::Plasma => WeaponSpec {
            speed_mult: 0.6,
            size_mult: 2.0,
            lifetime_mult: 1.2,
            wall_damage: PLASMA_WALL_DAMAGE,
            ..REGULAR
        },
        WeaponType::Teleport => WeaponSpec {
            speed_mult: 1.5,
            wall: WallPolicy::Stop,
            terminal: TerminalEffect::Teleport,
            ..REGULAR
        },
        WeaponType::Burst => WeaponSpec {
            pattern: FirePattern::Burst(&BURST_SPACING),
            ..REGULAR
        },
        WeaponType::Incendiary => WeaponSpec {
            speed_mult: 0.9,
            size_mult: 1.25,
            wall: WallPolicy::Stop,
            tank: TankPolicy::Detonate,
            terminal: TerminalEffect::Explode {
                radius: INCENDIARY_RADIUS,
                damage: INCENDIARY_DAMAGE,
                shake: 0.0,
            },
            ..REGULAR
        },
        WeaponType::Drone => WeaponSpec {
            pattern: FirePattern::Drone,
            ..REGULAR
        },
    }
    .with_pattern_override(weapon)
}

impl WeaponSpec {
    /// Non-projectile weapons share the regular flight table but fire differently.
    fn with_pattern_override(mut self, weapon: WeaponType) -> Self {
        self.pattern = match weapon {
            WeaponType::Mine => FirePattern::PlaceMine,
            WeaponType::Lightning => FirePattern::Lightning,
            WeaponType::Shield => FirePattern::Shield,
            _ => self.pattern,
        };
        self
    }
}

/// Spec governing a projectile in flight. Cluster children fly as regular shots.
pub fn flight_spec(weapon: WeaponType, is_child: bool) -> WeaponSpec {
    if is_child {
        REGULAR
    } else {
        spec(weapon)
    }
}
