//! Fundamental geometric and simulation types.
//!
//! Arena space is a 2D plane in arena units, origin at the top-left corner,
//! x to the right and y downward. Angles are radians, 0 = +x, increasing
//! toward +y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (walls, gates, tiles, tank bounding boxes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `2 * half` centred on `center`.
    pub fn centered(center: Vec2, half: f32) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// Zero-area or non-finite rectangles cannot take part in collisions.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite())
            || self.w <= 0.0
            || self.h <= 0.0
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Closest point of the rectangle to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }

    /// Circle / rectangle intersection.
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        center.distance_squared(self.closest_point(center)) <= radius * radius
    }
}

/// Which axis a reflecting surface is perpendicular to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitAxis {
    /// Vertical surface (left/right face): x velocity flips.
    Vertical,
    /// Horizontal surface (top/bottom face): y velocity flips.
    Horizontal,
}

/// A depletable allowance (bounces, pierces). Counters only decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charges {
    Limited(u32),
    Unlimited,
}

impl Charges {
    pub const NONE: Charges = Charges::Limited(0);

    /// Spend one charge. Returns false if none were left.
    pub fn try_spend(&mut self) -> bool {
        match self {
            Charges::Unlimited => true,
            Charges::Limited(0) => false,
            Charges::Limited(n) => {
                *n -= 1;
                true
            }
        }
    }

    pub fn remaining(&self) -> Option<u32> {
        match self {
            Charges::Limited(n) => Some(*n),
            Charges::Unlimited => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Charges::Limited(0))
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / crate::constants::TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Unit vector for a heading.
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle from `from` to `to`.
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Normalize an angle to [-π, π).
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Rotate `current` toward `target` by at most `max_delta`.
pub fn rotate_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = normalize_angle(target - current);
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Mirror a heading across a wall of the given orientation.
pub fn reflect_angle(angle: f32, axis: HitAxis) -> f32 {
    let reflected = match axis {
        HitAxis::Vertical => std::f32::consts::PI - angle,
        HitAxis::Horizontal => -angle,
    };
    normalize_angle(reflected)
}

/// Toroidal wrap on one axis: once an object of half-size `half` is fully
/// past an edge it re-enters from the opposite edge.
pub fn wrap_axis(value: f32, extent: f32, half: f32) -> f32 {
    if value > extent + half {
        -half
    } else if value < -half {
        extent + half
    } else {
        value
    }
}

/// Toroidal wrap on both axes independently.
pub fn wrap_position(pos: Vec2, width: f32, height: f32, half: f32) -> Vec2 {
    Vec2::new(wrap_axis(pos.x, width, half), wrap_axis(pos.y, height, half))
}

/// Wrap a point into `[0, width) x [0, height)`, carrying any overshoot
/// across the edge.
pub fn wrap_point(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(pos.x.rem_euclid(width), pos.y.rem_euclid(height))
}

/// Linear damage falloff: `max` at the centre, 0 at `radius` and beyond.
pub fn falloff_damage(max: f32, distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        0.0
    } else {
        max * (1.0 - distance / radius)
    }
}

/// Which face of `rect` a mover crossed when travelling from `prev` into it.
/// Used to pick the reflection normal.
pub fn crossing_axis(rect: &Rect, prev: Vec2, radius: f32) -> HitAxis {
    let was_outside_x = prev.x + radius <= rect.x || prev.x - radius >= rect.right();
    let was_outside_y = prev.y + radius <= rect.y || prev.y - radius >= rect.bottom();
    match (was_outside_x, was_outside_y) {
        (true, false) => HitAxis::Vertical,
        (false, true) => HitAxis::Horizontal,
        _ => {
            // Corner or already inside: pick the shallower penetration.
            let c = rect.center();
            let dx = (prev.x - c.x).abs() / rect.w.max(f32::EPSILON);
            let dy = (prev.y - c.y).abs() / rect.h.max(f32::EPSILON);
            if dx >= dy {
                HitAxis::Vertical
            } else {
                HitAxis::Horizontal
            }
        }
    }
}
