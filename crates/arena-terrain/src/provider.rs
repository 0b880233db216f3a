//! Terrain provider contract consumed by the simulation.

use arena_core::enums::TerrainClass;
use arena_core::types::Rect;
use glam::Vec2;
use rand_chacha::ChaCha8Rng;

/// Speed multiplier applied to a tank standing on each terrain class.
pub fn class_speed_modifier(class: TerrainClass) -> f32 {
    match class {
        TerrainClass::Sand => 0.6,
        TerrainClass::Mud => 0.4,
        TerrainClass::Open | TerrainClass::Blocking => 1.0,
    }
}

/// Per-tile classification and neighbourhood queries.
///
/// Positions outside the grid read as `Open` so that wrapping objects never
/// fault a lookup.
pub trait TerrainProvider: Send {
    fn class_at(&self, pos: Vec2) -> TerrainClass;

    /// True if the tile under `pos` blocks movement, either by its class or
    /// because an obstacle is registered there.
    fn is_blocked(&self, pos: Vec2) -> bool;

    /// True if any tile in the 3×3 block centred on `pos` is blocked.
    fn neighborhood_blocked(&self, pos: Vec2) -> bool;

    /// Footprint of the blocking-class tile under `pos`, if any.
    fn blocking_tile_at(&self, pos: Vec2) -> Option<Rect>;

    /// Register an obstacle covering `rect` in the tile index.
    fn mark_obstacle(&mut self, rect: &Rect);

    /// Remove an obstacle from the tile index.
    fn clear_obstacle(&mut self, rect: &Rect);

    /// Re-scatter the tile classes. Registered obstacles are kept.
    fn regenerate(&mut self, rng: &mut ChaCha8Rng);

    fn speed_modifier(&self, pos: Vec2) -> f32 {
        class_speed_modifier(self.class_at(pos))
    }
}
