//! Entity spawn factories and safe-position placement.
//!
//! Builds the arena layout (walls, destructible walls, gates), creates tanks
//! and training targets, and validates spawn/item positions against walls,
//! blocking terrain and other tanks.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::commands::TankIntent;
use arena_core::components::*;
use arena_core::constants::*;
use arena_core::tuning::Tuning;
use arena_core::types::{heading, Rect};
use arena_hazards::gate;
use arena_terrain::TerrainProvider;
use glam::Vec2;
use log::debug;

use crate::weapons::Spawn;

/// Body radius used when placing pick-ups and targets.
pub const ITEM_RADIUS: f32 = 10.0;

/// Static obstacle arrangement for a new engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArenaLayout {
    /// Centre cross of walls with a gate in the middle, destructible walls
    /// in each quadrant, scattered terrain.
    #[default]
    Standard,
    /// No obstacles and no terrain scatter.
    Empty,
}

/// A tank at full health with no power-up.
pub fn new_tank(player: usize, pos: Vec2, angle: f32, tuning: &Tuning) -> Tank {
    Tank {
        player,
        pos,
        angle,
        speed: 0.0,
        move_speed: tuning.tank.move_speed,
        turn_speed: tuning.tank.turn_speed,
        health: tuning.tank.max_health,
        alive: true,
        power_up: None,
        special_ammo: 0,
        power_up_timer: 0,
        reload_timer: 0,
        frozen: false,
        frozen_timer: 0,
        intent: TankIntent::default(),
    }
}

/// Spawn one tank per player at its fallback corner. Real placement happens
/// at round reset.
pub fn spawn_tanks(world: &mut World, count: usize, tuning: &Tuning) -> Vec<Entity> {
    (0..count)
        .map(|player| {
            let pos = fallback_position(SpawnKind::Tank, player, tuning);
            world.spawn((new_tank(player, pos, 0.0, tuning),))
        })
        .collect()
}

pub fn spawn_wall(world: &mut World, rect: Rect) -> Entity {
    world.spawn((Wall { rect },))
}

/// Destructible walls are also registered in the terrain tile index.
pub fn spawn_destructible(
    world: &mut World,
    terrain: &mut dyn TerrainProvider,
    rect: Rect,
) -> Entity {
    terrain.mark_obstacle(&rect);
    world.spawn((DestructibleWall {
        rect,
        hp: DESTRUCTIBLE_WALL_HP,
    },))
}

pub fn spawn_gate(world: &mut World, rect: Rect, tuning: &Tuning) -> Entity {
    world.spawn((gate::new_gate(rect, &tuning.gate),))
}

pub fn spawn_target(world: &mut World, pos: Vec2) -> Entity {
    world.spawn((Target {
        pos,
        health: TARGET_HEALTH,
        alive: true,
        respawn_timer: 0,
    },))
}

/// Spawn whatever a fire request produced.
pub fn spawn_all(world: &mut World, spawns: Vec<Spawn>) {
    for spawn in spawns {
        match spawn {
            Spawn::Projectile(p) => world.spawn((p,)),
            Spawn::Mine(m) => world.spawn((m,)),
            Spawn::Lightning(l) => world.spawn((l,)),
            Spawn::Shield(s) => world.spawn((s,)),
            Spawn::Drone(d) => world.spawn((d,)),
        };
    }
}

/// Cosmetic debris radiating from `pos`.
pub fn spawn_particles(world: &mut World, rng: &mut ChaCha8Rng, pos: Vec2, count: usize, speed: f32) {
    for _ in 0..count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let v = speed * rng.gen_range(0.5..1.5);
        world.spawn((Particle {
            pos,
            vel: heading(angle) * v,
            lifetime: PARTICLE_LIFETIME_TICKS,
            alive: true,
        },));
    }
}

/// Build the static obstacles for `layout`.
pub fn build_arena(
    world: &mut World,
    terrain: &mut dyn TerrainProvider,
    layout: ArenaLayout,
    tuning: &Tuning,
) {
    if layout == ArenaLayout::Empty {
        return;
    }
    let w = tuning.arena.width;
    let h = tuning.arena.height;
    let ts = tuning.arena.tile_size;

    for rect in [
        Rect::new(w * 0.5 - 10.0, h * 0.2, 20.0, h * 0.25),
        Rect::new(w * 0.5 - 10.0, h * 0.55, 20.0, h * 0.25),
        Rect::new(w * 0.15, h * 0.5 - 10.0, w * 0.2, 20.0),
        Rect::new(w * 0.65, h * 0.5 - 10.0, w * 0.2, 20.0),
    ] {
        spawn_wall(world, rect);
    }

    spawn_gate(world, Rect::new(w * 0.5 - 10.0, h * 0.45, 20.0, h * 0.1), tuning);

    // Two tile-aligned blocks per quadrant.
    for (fx, fy) in [(0.2, 0.2), (0.75, 0.2), (0.2, 0.75), (0.75, 0.75)] {
        let col = (w * fx / ts).floor();
        let row = (h * fy / ts).floor();
        for dc in 0..2 {
            let rect = Rect::new((col + dc as f32) * ts, row * ts, ts, ts);
            spawn_destructible(world, terrain, rect);
        }
    }
}

/// Place the training targets.
pub fn spawn_training_targets(
    world: &mut World,
    terrain: &dyn TerrainProvider,
    rng: &mut ChaCha8Rng,
    tuning: &Tuning,
) {
    let mut placed: Vec<Vec2> = Vec::new();
    for _ in 0..TRAINING_TARGET_COUNT {
        let obstacles = obstacle_footprints(world);
        let rules = Placement {
            kind: SpawnKind::Item,
            obstacles: &obstacles,
            terrain,
            avoid: &placed,
            tuning,
        };
        let pos = safe_position(rng, &rules, 0);
        placed.push(pos);
        spawn_target(world, pos);
    }
}

// ---- Safe-position placement ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Tank,
    Item,
}

/// Everything a candidate position is validated against.
pub struct Placement<'a> {
    pub kind: SpawnKind,
    /// Wall, destructible and gate footprints.
    pub obstacles: &'a [Rect],
    pub terrain: &'a dyn TerrainProvider,
    /// Living tanks to keep away from (tank spawns only).
    pub avoid: &'a [Vec2],
    pub tuning: &'a Tuning,
}

impl Placement<'_> {
    fn body_radius(&self) -> f32 {
        match self.kind {
            SpawnKind::Tank => self.tuning.tank.radius,
            SpawnKind::Item => ITEM_RADIUS,
        }
    }
}

/// Footprints of every wall, destructible wall and gate.
pub fn obstacle_footprints(world: &World) -> Vec<Rect> {
    let mut rects: Vec<Rect> = world.query::<&Wall>().iter().map(|(_, w)| w.rect).collect();
    rects.extend(world.query::<&DestructibleWall>().iter().map(|(_, w)| w.rect));
    rects.extend(world.query::<&Gate>().iter().map(|(_, g)| g.rect));
    rects
}

/// Clearance rules for one candidate.
pub fn is_safe_position(pos: Vec2, rules: &Placement<'_>) -> bool {
    let r = rules.body_radius();
    let arena = &rules.tuning.arena;
    if !pos.is_finite() || pos.x < r || pos.y < r || pos.x > arena.width - r || pos.y > arena.height - r
    {
        return false;
    }
    let margin = rules.tuning.spawn.wall_clearance + r;
    if rules
        .obstacles
        .iter()
        .any(|o| o.expanded(margin).contains(pos))
    {
        return false;
    }
    if rules.terrain.neighborhood_blocked(pos) {
        return false;
    }
    if rules.kind == SpawnKind::Tank {
        let min = rules.tuning.spawn.min_tank_distance;
        if rules.avoid.iter().any(|p| p.distance(pos) < min) {
            return false;
        }
    }
    true
}

/// Random candidates within the attempt budget.
pub fn find_safe_position(rng: &mut ChaCha8Rng, rules: &Placement<'_>) -> Option<Vec2> {
    let r = rules.body_radius();
    let arena = &rules.tuning.arena;
    if arena.width - r <= r || arena.height - r <= r {
        return None;
    }
    for _ in 0..rules.tuning.spawn.attempts {
        let pos = Vec2::new(
            rng.gen_range(r..arena.width - r),
            rng.gen_range(r..arena.height - r),
        );
        if is_safe_position(pos, rules) {
            return Some(pos);
        }
    }
    None
}

/// Deterministic row-major scan over tile centres.
pub fn scan_safe_position(rules: &Placement<'_>) -> Option<Vec2> {
    let (cols, rows) = rules.tuning.grid_dims();
    let ts = rules.tuning.arena.tile_size;
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (col, row)))
        .map(|(col, row)| Vec2::new((col as f32 + 0.5) * ts, (row as f32 + 0.5) * ts))
        .find(|&pos| is_safe_position(pos, rules))
}

/// Last-resort position: a per-player corner for tanks, the arena centre for items.
pub fn fallback_position(kind: SpawnKind, player: usize, tuning: &Tuning) -> Vec2 {
    let w = tuning.arena.width;
    let h = tuning.arena.height;
    match kind {
        SpawnKind::Item => Vec2::new(w * 0.5, h * 0.5),
        SpawnKind::Tank => {
            let m = tuning.arena.tile_size * 2.0;
            let corners = [
                Vec2::new(m, m),
                Vec2::new(w - m, h - m),
                Vec2::new(w - m, m),
                Vec2::new(m, h - m),
            ];
            corners[player % corners.len()]
        }
    }
}

/// Random attempts, then the scan, then the fallback.
pub fn safe_position(rng: &mut ChaCha8Rng, rules: &Placement<'_>, player: usize) -> Vec2 {
    if let Some(pos) = find_safe_position(rng, rules) {
        return pos;
    }
    if let Some(pos) = scan_safe_position(rules) {
        debug!("safe position: random attempts exhausted, scan found {pos}");
        return pos;
    }
    let pos = fallback_position(rules.kind, player, rules.tuning);
    debug!("safe position: no clear tile, falling back to {pos}");
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::enums::TerrainClass;
    use arena_terrain::TileGrid;
    use rand::SeedableRng;

    fn open_grid(t: &Tuning) -> TileGrid {
        let (c, r) = t.grid_dims();
        TileGrid::new(c, r, t.arena.tile_size)
    }

    #[test]
    fn test_rejects_wall_clearance() {
        let t = Tuning::default();
        let grid = open_grid(&t);
        let walls = [Rect::new(500.0, 300.0, 40.0, 40.0)];
        let rules = Placement {
            kind: SpawnKind::Tank,
            obstacles: &walls,
            terrain: &grid,
            avoid: &[],
            tuning: &t,
        };
        // 34 units from the wall face: inside clearance (20) + radius (15)
        assert!(!is_safe_position(Vec2::new(466.0, 320.0), &rules));
        assert!(is_safe_position(Vec2::new(464.0, 320.0), &rules));
    }

    #[test]
    fn test_rejects_blocking_neighbourhood() {
        let t = Tuning::default();
        let mut grid = open_grid(&t);
        grid.set_class(10, 10, TerrainClass::Blocking);
        let rules = Placement {
            kind: SpawnKind::Item,
            obstacles: &[],
            terrain: &grid,
            avoid: &[],
            tuning: &t,
        };
        assert!(!is_safe_position(grid.tile_center(11, 11), &rules));
        assert!(is_safe_position(grid.tile_center(12, 11), &rules));
    }

    #[test]
    fn test_tank_separation_only_for_tanks() {
        let t = Tuning::default();
        let grid = open_grid(&t);
        let others = [Vec2::new(600.0, 400.0)];
        let mut rules = Placement {
            kind: SpawnKind::Tank,
            obstacles: &[],
            terrain: &grid,
            avoid: &others,
            tuning: &t,
        };
        assert!(!is_safe_position(Vec2::new(650.0, 400.0), &rules));
        assert!(is_safe_position(Vec2::new(721.0, 400.0), &rules));
        rules.kind = SpawnKind::Item;
        assert!(is_safe_position(Vec2::new(650.0, 400.0), &rules));
    }

    #[test]
    fn test_fallback_when_arena_is_full() {
        let t = Tuning::default();
        let grid = open_grid(&t);
        let walls = [Rect::new(0.0, 0.0, t.arena.width, t.arena.height)];
        let rules = Placement {
            kind: SpawnKind::Tank,
            obstacles: &walls,
            terrain: &grid,
            avoid: &[],
            tuning: &t,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(find_safe_position(&mut rng, &rules), None);
        assert_eq!(scan_safe_position(&rules), None);
        assert_eq!(
            safe_position(&mut rng, &rules, 1),
            fallback_position(SpawnKind::Tank, 1, &t)
        );
    }

    #[test]
    fn test_scan_finds_first_clear_tile() {
        let t = Tuning::default();
        let grid = open_grid(&t);
        let rules = Placement {
            kind: SpawnKind::Item,
            obstacles: &[],
            terrain: &grid,
            avoid: &[],
            tuning: &t,
        };
        assert_eq!(scan_safe_position(&rules), Some(Vec2::new(20.0, 20.0)));
    }

    #[test]
    fn test_standard_layout_registers_destructibles() {
        let t = Tuning::default();
        let mut grid = open_grid(&t);
        let mut world = World::new();
        build_arena(&mut world, &mut grid, ArenaLayout::Standard, &t);
        assert_eq!(world.query::<&Wall>().iter().count(), 4);
        assert_eq!(world.query::<&Gate>().iter().count(), 1);
        let rects: Vec<Rect> = world
            .query::<&DestructibleWall>()
            .iter()
            .map(|(_, d)| d.rect)
            .collect();
        assert_eq!(rects.len(), 8);
        for r in rects {
            assert!(grid.is_blocked(r.center()));
        }
    }
}
