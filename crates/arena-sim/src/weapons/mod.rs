//! Weapon variants: the registry of per-variant strategy records and the
//! fire operation that turns a trigger pull into entities.

pub mod fire;
pub mod registry;

pub use fire::{fire, fire_by_id, Spawn};
pub use registry::{spec, WeaponSpec};
