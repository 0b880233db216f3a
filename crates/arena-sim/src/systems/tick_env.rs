//! Borrowed engine state handed to systems for one tick.

use arena_core::components::Camera;
use arena_core::tuning::Tuning;
use arena_terrain::TerrainProvider;
use rand_chacha::ChaCha8Rng;

use super::damage::DamageCtx;

pub struct TickEnv<'a> {
    pub tick: u64,
    pub tuning: &'a Tuning,
    pub damage: DamageCtx<'a>,
    pub rng: &'a mut ChaCha8Rng,
    pub camera: &'a mut Camera,
    pub terrain: &'a mut dyn TerrainProvider,
}
