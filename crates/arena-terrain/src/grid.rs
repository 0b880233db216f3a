//! TileGrid: row-major tile classification with an obstacle index.

use arena_core::enums::TerrainClass;
use arena_core::error::{SimError, SimResult};
use arena_core::types::Rect;
use glam::Vec2;
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::provider::TerrainProvider;

/// Probability of each non-open class when scattering.
#[derive(Debug, Clone, Copy)]
pub struct ScatterDensity {
    pub blocking: f64,
    pub sand: f64,
    pub mud: f64,
}

impl Default for ScatterDensity {
    fn default() -> Self {
        Self {
            blocking: 0.03,
            sand: 0.08,
            mud: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    tile_size: f32,
    /// Raw class codes, row-major. Unknown codes read as open.
    codes: Vec<u8>,
    /// Tiles covered by a registered obstacle (destructible walls).
    obstacles: Vec<bool>,
    density: ScatterDensity,
}

impl TileGrid {
    /// All-open grid.
    pub fn new(cols: usize, rows: usize, tile_size: f32) -> Self {
        Self {
            cols,
            rows,
            tile_size,
            codes: vec![TerrainClass::Open.code(); cols * rows],
            obstacles: vec![false; cols * rows],
            density: ScatterDensity::default(),
        }
    }

    /// Build from raw codes. The code count must match the dimensions.
    pub fn from_codes(cols: usize, rows: usize, tile_size: f32, codes: Vec<u8>) -> SimResult<Self> {
        if codes.len() != cols * rows {
            return Err(SimError::InvalidConfig(format!(
                "tile grid expects {} codes, got {}",
                cols * rows,
                codes.len()
            )));
        }
        let unknown = codes
            .iter()
            .filter(|&&c| TerrainClass::from_code(c).code() != c)
            .count();
        if unknown > 0 {
            debug!("tile grid: {unknown} unknown terrain codes read as open");
        }
        Ok(Self {
            cols,
            rows,
            tile_size,
            codes,
            obstacles: vec![false; cols * rows],
            density: ScatterDensity::default(),
        })
    }

    pub fn with_density(mut self, density: ScatterDensity) -> Self {
        self.density = density;
        self
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Tile column/row containing `pos`, or None outside the grid.
    pub fn tile_of(&self, pos: Vec2) -> Option<(usize, usize)> {
        if !pos.is_finite() || pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let col = (pos.x / self.tile_size) as usize;
        let row = (pos.y / self.tile_size) as usize;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    pub fn tile_rect(&self, col: usize, row: usize) -> Rect {
        Rect::new(
            col as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    pub fn tile_center(&self, col: usize, row: usize) -> Vec2 {
        self.tile_rect(col, row).center()
    }

    pub fn class_of(&self, col: usize, row: usize) -> TerrainClass {
        self.codes
            .get(row * self.cols + col)
            .map(|&c| TerrainClass::from_code(c))
            .unwrap_or_default()
    }

    pub fn set_class(&mut self, col: usize, row: usize, class: TerrainClass) {
        if col < self.cols && row < self.rows {
            self.codes[row * self.cols + col] = class.code();
        }
    }

    fn tile_blocked(&self, col: usize, row: usize) -> bool {
        let idx = row * self.cols + col;
        self.class_of(col, row).is_blocking() || self.obstacles.get(idx).copied().unwrap_or(false)
    }

    /// Tile index range covered by `rect`, clamped to the grid.
    fn covered(&self, rect: &Rect) -> Option<(usize, usize, usize, usize)> {
        if rect.is_degenerate() || rect.right() <= 0.0 || rect.bottom() <= 0.0 {
            return None;
        }
        let c0 = (rect.x.max(0.0) / self.tile_size) as usize;
        let r0 = (rect.y.max(0.0) / self.tile_size) as usize;
        // Exclusive far edge: a rect ending exactly on a tile boundary does not cover the next tile.
        let c1 = ((rect.right() / self.tile_size).ceil() as usize).min(self.cols);
        let r1 = ((rect.bottom() / self.tile_size).ceil() as usize).min(self.rows);
        (c0 < c1 && r0 < r1).then_some((c0, r0, c1, r1))
    }

    fn set_obstacle(&mut self, rect: &Rect, value: bool) {
        if let Some((c0, r0, c1, r1)) = self.covered(rect) {
            for row in r0..r1 {
                for col in c0..c1 {
                    self.obstacles[row * self.cols + col] = value;
                }
            }
        }
    }
}

impl TerrainProvider for TileGrid {
    fn class_at(&self, pos: Vec2) -> TerrainClass {
        self.tile_of(pos)
            .map(|(col, row)| self.class_of(col, row))
            .unwrap_or_default()
    }

    fn is_blocked(&self, pos: Vec2) -> bool {
        self.tile_of(pos)
            .is_some_and(|(col, row)| self.tile_blocked(col, row))
    }

    fn neighborhood_blocked(&self, pos: Vec2) -> bool {
        let Some((col, row)) = self.tile_of(pos) else {
            return false;
        };
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                let c = col as i64 + dc;
                let r = row as i64 + dr;
                if c < 0 || r < 0 || c >= self.cols as i64 || r >= self.rows as i64 {
                    continue;
                }
                if self.tile_blocked(c as usize, r as usize) {
                    return true;
                }
            }
        }
        false
    }

    fn blocking_tile_at(&self, pos: Vec2) -> Option<Rect> {
        let (col, row) = self.tile_of(pos)?;
        self.class_of(col, row)
            .is_blocking()
            .then(|| self.tile_rect(col, row))
    }

    fn mark_obstacle(&mut self, rect: &Rect) {
        self.set_obstacle(rect, true);
    }

    fn clear_obstacle(&mut self, rect: &Rect) {
        self.set_obstacle(rect, false);
    }

    fn regenerate(&mut self, rng: &mut ChaCha8Rng) {
        let d = self.density;
        for code in self.codes.iter_mut() {
            let roll: f64 = rng.gen();
            let class = if roll < d.blocking {
                TerrainClass::Blocking
            } else if roll < d.blocking + d.sand {
                TerrainClass::Sand
            } else if roll < d.blocking + d.sand + d.mud {
                TerrainClass::Mud
            } else {
                TerrainClass::Open
            };
            *code = class.code();
        }
        debug!("terrain re-scattered ({}x{})", self.cols, self.rows);
    }
}
