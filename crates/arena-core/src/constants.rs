//! Simulation constants and tuning defaults.
//!
//! Durations are in ticks, distances in arena units, speeds in units per tick.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Arena ---

pub const ARENA_WIDTH: f32 = 1200.0;
pub const ARENA_HEIGHT: f32 = 800.0;

/// Side of one terrain tile.
pub const TILE_SIZE: f32 = 40.0;

// --- Tanks ---

pub const TANK_RADIUS: f32 = 15.0;
pub const TANK_MOVE_SPEED: f32 = 2.0;
/// Radians per tick at full turn input.
pub const TANK_TURN_SPEED: f32 = 0.06;
pub const TANK_MAX_HEALTH: f32 = 100.0;
pub const TANK_RELOAD_TICKS: u32 = 25;
/// Projectiles spawn this far ahead of the tank centre.
pub const BARREL_LENGTH: f32 = 20.0;
/// Number of circumference samples used by the movement resolver.
pub const TANK_COLLISION_SAMPLES: usize = 8;

// --- Power-ups ---

pub const MAX_SPECIAL_AMMO: u32 = 5;
pub const POWER_UP_DURATION_TICKS: u32 = 900;
pub const POWER_UP_PICKUP_RADIUS: f32 = 25.0;
pub const POWER_UPS_PER_ROUND: usize = 3;
pub const POWER_UP_MAX_COUNT: usize = 5;
pub const POWER_UP_SPAWN_INTERVAL_TICKS: u32 = 600;

// --- Projectiles ---

pub const PROJECTILE_SPEED: f32 = 5.0;
/// Full size; the collision radius is half of this.
pub const PROJECTILE_SIZE: f32 = 8.0;
pub const PROJECTILE_LIFETIME_TICKS: u32 = 300;
/// Ticks after firing during which a projectile cannot hit its owner.
pub const OWNER_GRACE_TICKS: u32 = 8;

pub const SCATTER_OFFSETS: [f32; 5] = [-0.8, -0.4, 0.0, 0.4, 0.8];
pub const FLAME_OFFSETS: [f32; 3] = [-0.12, 0.0, 0.12];
/// Spawn offsets along the aim line for burst fire.
pub const BURST_SPACING: [f32; 3] = [0.0, -10.0, -20.0];

pub const PIERCING_BUDGET: u32 = 3;
pub const BOUNCER_BUDGET: u32 = 10;
pub const RICOCHET_BUDGET: u32 = 15;

pub const CLUSTER_CHILD_COUNT: usize = 8;
pub const CLUSTER_CHILD_LIFETIME_TICKS: u32 = 45;

pub const FREEZE_DURATION_TICKS: u32 = 120;

pub const HOMING_DELAY_TICKS: u32 = 20;
pub const HOMING_TURN_RATE: f32 = 0.05;

pub const TORNADO_SPIN_RATE: f32 = 0.3;
pub const TORNADO_RADIUS_GROWTH: f32 = 0.5;
pub const TORNADO_MAX_RADIUS: f32 = 40.0;

pub const ROCKET_ACCELERATION: f32 = 1.04;
pub const ROCKET_MAX_SPEED_FACTOR: f32 = 2.0;

/// Destructible-wall hit points removed per plasma contact.
pub const PLASMA_WALL_DAMAGE: u8 = 3;

// --- Explosions ---

pub const EXPLOSIVE_RADIUS: f32 = 60.0;
pub const EXPLOSIVE_DAMAGE: f32 = 100.0;
pub const ROCKET_RADIUS: f32 = 80.0;
pub const ROCKET_DAMAGE: f32 = 120.0;
pub const ROCKET_SHAKE: f32 = 12.0;
pub const INCENDIARY_RADIUS: f32 = 35.0;
pub const INCENDIARY_DAMAGE: f32 = 45.0;
pub const EXPLOSION_VISUAL_TICKS: u32 = 30;
pub const EXPLOSION_PARTICLES: usize = 12;

// --- Obstacles ---

pub const DESTRUCTIBLE_WALL_HP: u8 = 3;

pub const GATE_OPEN_TICKS: u32 = 480;
pub const GATE_WARNING_TICKS: u32 = 120;
pub const GATE_CLOSING_TICKS: u32 = 30;
pub const GATE_CLOSED_TICKS: u32 = 120;
pub const GATE_OPENING_TICKS: u32 = 30;
pub const GATE_CRUSH_DAMAGE: f32 = 75.0;
/// A closing gate blocks movement once its open fraction drops below this.
pub const GATE_BLOCKING_THRESHOLD: f32 = 0.3;

// --- Hazards ---

pub const MINE_ARM_TICKS: u32 = 60;
pub const MINE_TRIGGER_RADIUS: f32 = 30.0;
pub const MINE_DETONATION_TICKS: u32 = 10;
pub const MINE_EXPLOSION_RADIUS: f32 = 60.0;
pub const MINE_MAX_DAMAGE: f32 = 50.0;
/// Radius of the mine body for projectile contact.
pub const MINE_BODY_RADIUS: f32 = 8.0;

pub const LIGHTNING_OFFSET: f32 = 120.0;
pub const LIGHTNING_CHARGE_TICKS: u32 = 30;
pub const LIGHTNING_STRIKE_TICKS: u32 = 15;
pub const LIGHTNING_RADIUS: f32 = 40.0;
pub const LIGHTNING_DAMAGE: f32 = 60.0;

pub const SHIELD_OFFSET: f32 = 28.0;
pub const SHIELD_LENGTH: f32 = 60.0;
pub const SHIELD_THICKNESS: f32 = 8.0;
pub const SHIELD_HEALTH: u32 = 5;
pub const SHIELD_LIFETIME_TICKS: u32 = 600;

pub const DRONE_SPEED: f32 = 2.2;
pub const DRONE_LIFETIME_TICKS: u32 = 600;
pub const DRONE_CONTACT_RADIUS: f32 = 18.0;
pub const DRONE_TURN_RATE: f32 = 0.08;
/// Radius of the drone body for projectile contact.
pub const DRONE_BODY_RADIUS: f32 = 8.0;

pub const TARGET_RADIUS: f32 = 14.0;
pub const TARGET_HEALTH: f32 = 50.0;
pub const TARGET_RESPAWN_TICKS: u32 = 180;
/// Targets placed when a training match starts.
pub const TRAINING_TARGET_COUNT: usize = 5;

pub const TELEPORT_EFFECT_TICKS: u32 = 30;
/// Steps of one tank radius a teleport may back off from an unsafe impact point.
pub const TELEPORT_BACKOFF_STEPS: usize = 6;
pub const PARTICLE_LIFETIME_TICKS: u32 = 40;
pub const PARTICLE_DRAG: f32 = 0.95;
pub const DEBRIS_PARTICLES: usize = 6;

// --- Ring of fire ---

pub const RING_START_DELAY_TICKS: u32 = 1200;
pub const RING_SHRINK_PER_TICK: f32 = 0.25;
pub const RING_MIN_RADIUS: f32 = 150.0;
pub const RING_DAMAGE_PER_TICK: f32 = 1.0;

// --- Round ---

pub const GRACE_PERIOD_TICKS: u32 = 120;
/// Delay between a win and the round reset (3 s).
pub const ROUND_RESET_DELAY_TICKS: u32 = 3 * TICK_RATE;

// --- Safe-position placement ---

pub const SPAWN_WALL_CLEARANCE: f32 = 20.0;
pub const SPAWN_MIN_TANK_DISTANCE: f32 = 120.0;
pub const SPAWN_ATTEMPTS: usize = 100;

// --- Camera ---

pub const CAMERA_SHAKE_DECAY: f32 = 0.9;
pub const CAMERA_WINNER_ZOOM: f32 = 1.6;
pub const CAMERA_ZOOM_LERP: f32 = 0.08;
