//! Tests for the simulation engine, projectile resolution, obstacles, hazards
//! and the round lifecycle.

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_core::commands::{PlayerCommand, TankIntent};
use arena_core::components::*;
use arena_core::enums::*;
use arena_core::events::SimEvent;
use arena_core::tuning::Tuning;
use arena_core::types::{Charges, Rect};
use arena_terrain::TileGrid;

use crate::engine::{SimConfig, SimulationEngine};
use crate::weapons::fire::new_projectile;
use crate::weapons::spec;
use crate::world_setup::{
    find_safe_position, scan_safe_position, ArenaLayout, Placement, SpawnKind,
};

// ---- Helpers ----

fn engine_with(mode: GameMode, players: usize, layout: ArenaLayout, seed: u64) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        seed,
        mode,
        player_count: players,
        layout,
        ..Default::default()
    })
    .unwrap()
}

/// An empty arena past its grace period, with no pick-ups lying around.
fn started_empty(players: usize) -> SimulationEngine {
    let mut engine = engine_with(GameMode::Competitive, players, ArenaLayout::Empty, 7);
    engine.queue_command(PlayerCommand::StartMatch {
        mode: GameMode::Competitive,
    });
    engine.tick();
    engine.skip_grace();
    clear::<PowerUp>(&mut engine);
    engine
}

fn clear<T: hecs::Component>(engine: &mut SimulationEngine) {
    let doomed: Vec<hecs::Entity> = engine
        .world()
        .query::<&T>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for e in doomed {
        let _ = engine.world_mut().despawn(e);
    }
}

fn count<T: hecs::Component>(engine: &SimulationEngine) -> usize {
    engine.world().query::<&T>().iter().count()
}

/// Power-ups picked up during the tick that produced `events`.
fn collected(events: &[SimEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::PowerUpCollected { .. }))
        .count()
}

fn kill(engine: &mut SimulationEngine, player: usize) {
    engine.with_tank(player, |t| {
        t.health = 0.0;
        t.alive = false;
    });
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = || SimConfig {
        seed: 12345,
        ring_of_fire: true,
        ..Default::default()
    };
    let mut engine_a = SimulationEngine::new(config()).unwrap();
    let mut engine_b = SimulationEngine::new(config()).unwrap();

    for engine in [&mut engine_a, &mut engine_b] {
        engine.queue_command(PlayerCommand::StartMatch {
            mode: GameMode::Competitive,
        });
        for player in 0..2 {
            engine.queue_command(PlayerCommand::SetIntent {
                player,
                intent: TankIntent {
                    forward: 1.0,
                    turn: 0.3,
                    fire: true,
                },
            });
        }
    }

    for _ in 0..400 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine_with(GameMode::Competitive, 2, ArenaLayout::Standard, 111);
    let mut engine_b = engine_with(GameMode::Competitive, 2, ArenaLayout::Standard, 222);
    engine_a.queue_command(PlayerCommand::StartMatch {
        mode: GameMode::Competitive,
    });
    engine_b.queue_command(PlayerCommand::StartMatch {
        mode: GameMode::Competitive,
    });

    let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
    let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should place tanks differently");
}

// ---- Game phases ----

#[test]
fn test_lobby_does_not_advance() {
    let mut engine = engine_with(GameMode::Competitive, 2, ArenaLayout::Standard, 1);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.phase(), GamePhase::Lobby);
    assert_eq!(engine.time().tick, 0);
    assert_eq!(count::<Tank>(&engine), 0);
}

#[test]
fn test_pause_and_resume() {
    let mut engine = started_empty(2);
    let before = engine.time().tick;
    engine.queue_command(PlayerCommand::Pause);
    engine.tick();
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time().tick, before);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.time().tick, before + 1);
}

#[test]
fn test_start_match_builds_standard_arena() {
    let mut engine = engine_with(GameMode::Competitive, 3, ArenaLayout::Standard, 5);
    engine.queue_command(PlayerCommand::StartMatch {
        mode: GameMode::Competitive,
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.round, 1);
    assert_eq!(snap.tanks.len(), 3);
    assert_eq!(snap.power_ups.len() + collected(&snap.events), 3);
    assert!(snap.grace.is_some());
    assert_eq!(snap.scores, vec![0, 0, 0]);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::RoundReset { round: 1 })));
    assert_eq!(
        snap.obstacles
            .iter()
            .filter(|o| matches!(o, arena_core::state::ObstacleView::Gate { .. }))
            .count(),
        1
    );
}

#[test]
fn test_invalid_config_rejected() {
    let result = SimulationEngine::new(SimConfig {
        player_count: 0,
        ..Default::default()
    });
    assert!(result.is_err());

    let mut tuning = Tuning::default();
    tuning.tank.radius = -1.0;
    let result = SimulationEngine::new(SimConfig {
        tuning,
        ..Default::default()
    });
    assert!(result.is_err());
}

// ---- Intents ----

#[test]
fn test_intent_moves_and_fires() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(300.0, 300.0), 0.0);
    engine.place_tank(1, Vec2::new(900.0, 700.0), 0.0);
    engine.queue_command(PlayerCommand::SetIntent {
        player: 0,
        intent: TankIntent {
            forward: 5.0,
            turn: 0.0,
            fire: true,
        },
    });
    let snap = engine.tick();
    let tank = engine.tank(0).unwrap();
    assert_eq!(tank.pos, Vec2::new(302.0, 300.0), "forward is clamped to 1");
    assert_eq!(snap.projectiles.len(), 1);
    assert!(snap.events.contains(&SimEvent::Fired {
        player: 0,
        weapon: WeaponType::Regular
    }));
    assert_eq!(snap.tanks[0].reload_pct, 0.0);
}

// ---- Explosive scenario ----

#[test]
fn test_explosive_detonates_on_wall_and_kills_in_radius() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(100.0, 100.0), 0.0);
    // Beside the flight path, inside the blast radius.
    engine.place_tank(1, Vec2::new(140.0, 122.0), 0.0);
    engine.with_tank(1, |t| t.health = 50.0);
    engine.spawn_wall(Rect::new(150.0, 90.0, 20.0, 20.0));

    engine
        .fire_from(0, Vec2::new(100.0, 100.0), 0.0, WeaponType::Explosive)
        .unwrap();

    let mut blast = None;
    for _ in 0..30 {
        let snap = engine.tick();
        blast = snap.events.iter().find_map(|e| match e {
            SimEvent::Explosion { pos, radius } => Some((*pos, *radius)),
            _ => None,
        });
        if blast.is_some() {
            break;
        }
    }
    let (pos, radius) = blast.expect("explosive never detonated");
    assert!(pos.x <= 150.0 && pos.x >= 140.0, "detonated at {pos}");
    assert_eq!(radius, 60.0);
    assert_eq!(count::<Projectile>(&engine), 0);

    let b = engine.tank(1).unwrap();
    assert!(!b.alive);
    assert_eq!(engine.round().kills[0], 1);

    // Shooter is inside the radius too and takes falloff damage.
    let a = engine.tank(0).unwrap();
    assert!(a.alive && a.health < 100.0);
}

// ---- Projectile behaviour through the engine ----

#[test]
fn test_regular_reflects_off_wall() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 400.0), 0.0);
    engine.spawn_wall(Rect::new(400.0, 50.0, 20.0, 100.0));
    engine
        .fire_from(0, Vec2::new(340.0, 100.0), 0.0, WeaponType::Regular)
        .unwrap();
    for _ in 0..20 {
        engine.tick();
    }
    let p: Vec<Projectile> = engine
        .world()
        .query::<&Projectile>()
        .iter()
        .map(|(_, p)| p.clone())
        .collect();
    assert_eq!(p.len(), 1);
    assert!(p[0].pos.x < 400.0);
    assert!((p[0].angle.abs() - std::f32::consts::PI).abs() < 1e-4);
}

#[test]
fn test_piercing_passes_walls_and_spends_budget() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 500.0), 0.0);
    engine.spawn_wall(Rect::new(300.0, 250.0, 20.0, 100.0));
    engine.grant_power_up(0, WeaponType::Piercing);
    engine
        .fire_from(0, Vec2::new(200.0, 300.0), 0.0, WeaponType::Piercing)
        .unwrap();
    for _ in 0..30 {
        engine.tick();
    }
    let p: Vec<Projectile> = engine
        .world()
        .query::<&Projectile>()
        .iter()
        .map(|(_, p)| p.clone())
        .collect();
    assert_eq!(p.len(), 1);
    assert!(p[0].pos.x > 320.0, "went through the wall");
    assert_eq!(p[0].pierce, Charges::Limited(2));
    assert_eq!(engine.tank(0).unwrap().special_ammo, 4);
}

#[test]
fn test_piercing_through_adjacent_destructibles_costs_one_pierce_each() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 500.0), 0.0);
    let a = engine.spawn_destructible(Rect::new(400.0, 280.0, 40.0, 40.0));
    let b = engine.spawn_destructible(Rect::new(440.0, 280.0, 40.0, 40.0));
    engine.grant_power_up(0, WeaponType::Piercing);
    engine
        .fire_from(0, Vec2::new(300.0, 300.0), 0.0, WeaponType::Piercing)
        .unwrap();

    let mut last_x = 300.0;
    let mut cleared = false;
    for _ in 0..60 {
        engine.tick();
        let p: Vec<Projectile> = engine
            .world()
            .query::<&Projectile>()
            .iter()
            .map(|(_, p)| p.clone())
            .collect();
        assert_eq!(p.len(), 1, "shot lost inside the walls");
        assert!(p[0].pos.x > last_x, "shot turned back at x={}", p[0].pos.x);
        last_x = p[0].pos.x;
        if last_x > 490.0 {
            assert_eq!(p[0].pierce, Charges::Limited(1));
            assert!(p[0].phasing.is_empty());
            cleared = true;
            break;
        }
    }
    assert!(cleared);
    assert_eq!(engine.world().get::<&DestructibleWall>(a).unwrap().hp, 2);
    assert_eq!(engine.world().get::<&DestructibleWall>(b).unwrap().hp, 2);
}

#[test]
fn test_shot_starting_inside_a_wall_does_not_bounce_in_place() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 500.0), 0.0);
    engine.spawn_wall(Rect::new(400.0, 250.0, 40.0, 100.0));
    engine
        .fire_from(0, Vec2::new(420.0, 300.0), 0.0, WeaponType::Regular)
        .unwrap();
    engine.tick();
    assert_eq!(count::<Projectile>(&engine), 0);
}

#[test]
fn test_cluster_splits_on_impact() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 500.0), 0.0);
    engine.spawn_wall(Rect::new(400.0, 250.0, 20.0, 100.0));
    engine
        .fire_from(0, Vec2::new(340.0, 300.0), 0.0, WeaponType::Cluster)
        .unwrap();
    let mut split = false;
    for _ in 0..30 {
        engine.tick();
        let children = engine
            .world()
            .query::<&Projectile>()
            .iter()
            .filter(|(_, p)| p.is_child)
            .count();
        if children == 8 {
            split = true;
            break;
        }
    }
    assert!(split);
}

#[test]
fn test_freeze_shot_freezes_instead_of_killing() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(100.0, 400.0), 0.0);
    engine.place_tank(1, Vec2::new(200.0, 400.0), 0.0);
    engine
        .fire_from(0, Vec2::new(130.0, 400.0), 0.0, WeaponType::Freeze)
        .unwrap();
    let mut frozen = false;
    for _ in 0..20 {
        let snap = engine.tick();
        if snap.events.contains(&SimEvent::TankFrozen { player: 1 }) {
            frozen = true;
            break;
        }
    }
    assert!(frozen);
    let b = engine.tank(1).unwrap();
    assert!(b.alive && b.frozen);
    assert_eq!(count::<Projectile>(&engine), 0);
}

#[test]
fn test_grace_period_makes_tanks_untouchable() {
    let mut engine = engine_with(GameMode::Competitive, 2, ArenaLayout::Empty, 3);
    engine.queue_command(PlayerCommand::StartMatch {
        mode: GameMode::Competitive,
    });
    engine.tick();
    clear::<PowerUp>(&mut engine);
    assert!(engine.round().in_grace());

    engine.place_tank(0, Vec2::new(100.0, 400.0), 0.0);
    engine.place_tank(1, Vec2::new(200.0, 400.0), 0.0);
    engine
        .fire_from(0, Vec2::new(130.0, 400.0), 0.0, WeaponType::Regular)
        .unwrap();
    for _ in 0..30 {
        engine.tick();
    }
    let b = engine.tank(1).unwrap();
    assert!(b.alive);
    assert_eq!(b.health, 100.0);
}

#[test]
fn test_faulty_projectile_is_dropped_alone() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 500.0), 0.0);
    let t = Tuning::default();
    let regular = spec(WeaponType::Regular);
    let good = new_projectile(WeaponType::Regular, &regular, Vec2::new(100.0, 100.0), 0.0, None, &t);
    let bad = new_projectile(
        WeaponType::Regular,
        &regular,
        Vec2::new(100.0, 200.0),
        f32::NAN,
        None,
        &t,
    );
    engine.world_mut().spawn((good,));
    engine.world_mut().spawn((bad,));

    let snap = engine.tick();
    assert_eq!(snap.projectiles.len(), 1);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::EntityFault { .. })));
}

#[test]
fn test_degenerate_wall_counts_as_no_collision() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 500.0), 0.0);
    engine.spawn_wall(Rect::new(150.0, 50.0, 0.0, 100.0));
    engine
        .fire_from(0, Vec2::new(100.0, 100.0), 0.0, WeaponType::Regular)
        .unwrap();
    for _ in 0..20 {
        engine.tick();
    }
    let xs: Vec<f32> = engine
        .world()
        .query::<&Projectile>()
        .iter()
        .map(|(_, p)| p.pos.x)
        .collect();
    assert_eq!(xs, vec![200.0]);
}

// ---- Destructible walls ----

#[test]
fn test_destructible_wall_takes_exactly_three_hits() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 400.0), 0.0);
    let rect = Rect::new(400.0, 80.0, 40.0, 40.0);
    let wall = engine.spawn_destructible(rect);

    for expected in [2u8, 1] {
        engine
            .fire_from(0, Vec2::new(340.0, 100.0), 0.0, WeaponType::Regular)
            .unwrap();
        for _ in 0..30 {
            engine.tick();
            if engine.world().get::<&DestructibleWall>(wall).unwrap().hp == expected {
                break;
            }
        }
        clear::<Projectile>(&mut engine);
        assert_eq!(engine.world().get::<&DestructibleWall>(wall).unwrap().hp, expected);
        // Still targetable and still blocking.
        assert!(engine.terrain().is_blocked(rect.center()));
        assert!(engine.tick().obstacles.iter().any(|o| matches!(
            o,
            arena_core::state::ObstacleView::Destructible { hp, .. } if *hp == expected
        )));
    }

    engine
        .fire_from(0, Vec2::new(340.0, 100.0), 0.0, WeaponType::Regular)
        .unwrap();
    let mut destroyed = false;
    for _ in 0..30 {
        let snap = engine.tick();
        if snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::WallDestroyed { .. }))
        {
            destroyed = true;
            break;
        }
    }
    assert!(destroyed);
    assert!(engine.world().get::<&DestructibleWall>(wall).is_err());
    assert!(!engine.terrain().is_blocked(rect.center()));
}

#[test]
fn test_plasma_breaks_destructible_in_one_hit() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1000.0, 700.0), 0.0);
    engine.place_tank(1, Vec2::new(1000.0, 400.0), 0.0);
    let wall = engine.spawn_destructible(Rect::new(400.0, 80.0, 40.0, 40.0));
    engine
        .fire_from(0, Vec2::new(340.0, 100.0), 0.0, WeaponType::Plasma)
        .unwrap();
    for _ in 0..40 {
        engine.tick();
    }
    assert!(engine.world().get::<&DestructibleWall>(wall).is_err());
}

// ---- Tank movement ----

#[test]
fn test_tank_blocked_by_wall_stops_dead() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(300.0, 300.0), 0.0);
    engine.place_tank(1, Vec2::new(900.0, 700.0), 0.0);
    engine.spawn_wall(Rect::new(320.0, 200.0, 40.0, 200.0));
    engine.queue_command(PlayerCommand::SetIntent {
        player: 0,
        intent: TankIntent {
            forward: 1.0,
            turn: 0.0,
            fire: false,
        },
    });
    for _ in 0..10 {
        engine.tick();
    }
    let tank = engine.tank(0).unwrap();
    assert!(tank.pos.x <= 305.0);
    assert_eq!(tank.speed, 0.0);
}

#[test]
fn test_tank_wraps_across_edge() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(1210.0, 300.0), 0.0);
    engine.place_tank(1, Vec2::new(600.0, 700.0), 0.0);
    engine.queue_command(PlayerCommand::SetIntent {
        player: 0,
        intent: TankIntent {
            forward: 1.0,
            turn: 0.0,
            fire: false,
        },
    });
    for _ in 0..5 {
        engine.tick();
    }
    let tank = engine.tank(0).unwrap();
    assert!(tank.pos.x < 0.0, "wrapped to {}", tank.pos.x);
}

// ---- Gates ----

#[test]
fn test_gate_crushes_every_tick_of_overlap() {
    let mut engine = started_empty(2);
    engine.spawn_gate(Rect::new(600.0, 300.0, 20.0, 80.0));
    engine.place_tank(0, Vec2::new(610.0, 340.0), 0.0);
    engine.place_tank(1, Vec2::new(100.0, 700.0), 0.0);
    engine.with_tank(0, |t| t.health = 1000.0);

    let mut ticks = 0;
    while engine.tank(0).unwrap().health >= 1000.0 {
        engine.tick();
        ticks += 1;
        assert!(ticks < 700, "gate never closed");
    }
    let mut health = engine.tank(0).unwrap().health;
    for _ in 0..5 {
        engine.tick();
        let now = engine.tank(0).unwrap().health;
        assert_eq!(health - now, 75.0);
        health = now;
    }
}

// ---- Mines ----

#[test]
fn test_mine_arms_then_triggers_then_detonates() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(200.0, 200.0), 0.0);
    engine
        .fire_from(0, Vec2::new(200.0, 200.0), 0.0, WeaponType::Mine)
        .unwrap();
    engine.place_tank(0, Vec2::new(900.0, 600.0), 0.0);
    engine.place_tank(1, Vec2::new(215.0, 200.0), 0.0);

    let mut triggered_at = None;
    let mut exploded_at = None;
    for i in 1..=100u32 {
        let snap = engine.tick();
        for e in &snap.events {
            match e {
                SimEvent::MineTriggered { .. } => triggered_at = triggered_at.or(Some(i)),
                SimEvent::Explosion { .. } => exploded_at = exploded_at.or(Some(i)),
                _ => {}
            }
        }
    }
    let triggered_at = triggered_at.expect("mine never triggered");
    assert!(triggered_at > 60, "triggered during the arm window at {triggered_at}");
    assert_eq!(exploded_at, Some(triggered_at + 10));
    assert_eq!(count::<Mine>(&engine), 0);
    // Falloff at 15 units: 50 * 0.75.
    let b = engine.tank(1).unwrap();
    assert!((b.health - 62.5).abs() < 1e-3);
}

#[test]
fn test_owner_does_not_trigger_own_mine() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(200.0, 200.0), 0.0);
    engine.place_tank(1, Vec2::new(900.0, 600.0), 0.0);
    engine
        .fire_from(0, Vec2::new(200.0, 200.0), 0.0, WeaponType::Mine)
        .unwrap();
    for _ in 0..120 {
        let snap = engine.tick();
        assert!(!snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::MineTriggered { .. })));
    }
    assert_eq!(count::<Mine>(&engine), 1);
}

#[test]
fn test_mine_blast_hurts_its_owner() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(200.0, 200.0), 0.0);
    engine
        .fire_from(0, Vec2::new(200.0, 200.0), 0.0, WeaponType::Mine)
        .unwrap();
    engine.place_tank(0, Vec2::new(200.0, 230.0), 0.0);
    engine.place_tank(1, Vec2::new(215.0, 200.0), 0.0);
    for _ in 0..100 {
        engine.tick();
    }
    assert_eq!(count::<Mine>(&engine), 0);
    // Owner 30 units out: 50 * 0.5.
    let owner = engine.tank(0).unwrap();
    assert!((owner.health - 75.0).abs() < 1e-3);
}

// ---- Lightning ----

#[test]
fn test_lightning_strikes_after_charge() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(100.0, 400.0), 0.0);
    engine.place_tank(1, Vec2::new(240.0, 400.0), 0.0);
    engine
        .fire_from(0, Vec2::new(120.0, 400.0), 0.0, WeaponType::Lightning)
        .unwrap();
    for _ in 0..29 {
        engine.tick();
    }
    assert_eq!(engine.tank(1).unwrap().health, 100.0);
    let snap = engine.tick();
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::LightningStrike { .. })));
    assert_eq!(engine.tank(1).unwrap().health, 40.0);
    for _ in 0..20 {
        engine.tick();
    }
    assert_eq!(count::<LightningStrike>(&engine), 0);
}

// ---- Power-ups ----

#[test]
fn test_power_up_collected_on_contact() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(300.0, 300.0), 0.0);
    engine.place_tank(1, Vec2::new(900.0, 700.0), 0.0);
    engine.world_mut().spawn((PowerUp {
        weapon: WeaponType::Rocket,
        pos: Vec2::new(310.0, 300.0),
    },));
    let snap = engine.tick();
    assert!(snap.events.contains(&SimEvent::PowerUpCollected {
        player: 0,
        weapon: WeaponType::Rocket
    }));
    let tank = engine.tank(0).unwrap();
    assert_eq!(tank.power_up, Some(WeaponType::Rocket));
    assert_eq!(tank.special_ammo, 5);
    assert_eq!(count::<PowerUp>(&engine), 0);
}

// ---- Round lifecycle ----

#[test]
fn test_last_tank_standing_wins_once() {
    let mut engine = started_empty(4);
    for player in 1..4 {
        kill(&mut engine, player);
    }
    let snap = engine.tick();
    assert_eq!(snap.winner, Some(0));
    assert_eq!(snap.scores, vec![1, 0, 0, 0]);
    assert!(snap
        .events
        .contains(&SimEvent::RoundWon { player: 0, score: 1 }));
    assert!(engine.round().resetting);

    // Win detection keeps running while the reset is pending.
    for _ in 0..100 {
        let snap = engine.tick();
        assert_eq!(snap.scores, vec![1, 0, 0, 0]);
        assert_eq!(snap.winner, Some(0));
    }
    assert!(engine.camera().focus.is_some());

    let mut reset = false;
    for _ in 0..100 {
        let snap = engine.tick();
        if snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::RoundReset { round: 2 }))
        {
            reset = true;
            break;
        }
    }
    assert!(reset);
    assert_eq!(engine.round().winner, None);
    assert!(!engine.round().resetting);
    assert!(engine.round().in_grace());
    assert_eq!(engine.round().scores, vec![1, 0, 0, 0]);
    assert_eq!(engine.camera().focus, None);
    for player in 0..4 {
        let t = engine.tank(player).unwrap();
        assert!(t.alive);
        assert_eq!(t.health, 100.0);
        assert_eq!(t.power_up, None);
    }
}

#[test]
fn test_evaluate_is_idempotent() {
    let mut engine = started_empty(4);
    for player in 1..4 {
        kill(&mut engine, player);
    }
    engine.tick();
    let mut state = engine.round().clone();
    let mut camera = *engine.camera();
    let mut events = Vec::new();
    let again = crate::round::evaluate(
        engine.world(),
        &mut state,
        GameMode::Competitive,
        &mut camera,
        &mut events,
        engine.tuning(),
    );
    assert_eq!(again, None);
    assert_eq!(state.scores[0], 1);
    assert!(events.is_empty());
}

#[test]
fn test_no_win_during_grace() {
    let mut engine = engine_with(GameMode::Competitive, 2, ArenaLayout::Empty, 9);
    engine.queue_command(PlayerCommand::StartMatch {
        mode: GameMode::Competitive,
    });
    engine.tick();
    kill(&mut engine, 1);
    let snap = engine.tick();
    assert_eq!(snap.winner, None);

    engine.skip_grace();
    let snap = engine.tick();
    assert_eq!(snap.winner, Some(0));
}

#[test]
fn test_draw_resets_without_score() {
    let mut engine = started_empty(2);
    kill(&mut engine, 0);
    kill(&mut engine, 1);
    for _ in 0..200 {
        engine.tick();
    }
    assert_eq!(engine.round().round, 2);
    assert_eq!(engine.round().scores, vec![0, 0]);
}

#[test]
fn test_training_mode_never_declares_winner() {
    let mut engine = engine_with(GameMode::Training, 2, ArenaLayout::Standard, 4);
    engine.queue_command(PlayerCommand::StartMatch {
        mode: GameMode::Training,
    });
    engine.tick();
    engine.skip_grace();
    assert_eq!(count::<Target>(&engine), 5);
    kill(&mut engine, 1);
    for _ in 0..10 {
        assert_eq!(engine.tick().winner, None);
    }
}

#[test]
fn test_force_reset_clears_transients() {
    let mut engine = started_empty(2);
    engine.place_tank(0, Vec2::new(300.0, 300.0), 0.0);
    engine
        .fire_from(0, Vec2::new(300.0, 300.0), 0.0, WeaponType::Scatter)
        .unwrap();
    engine
        .fire_from(0, Vec2::new(300.0, 300.0), 0.0, WeaponType::Mine)
        .unwrap();
    assert!(count::<Projectile>(&engine) > 0);
    engine.queue_command(PlayerCommand::ForceReset);
    let snap = engine.tick();
    assert!(snap.projectiles.is_empty());
    assert!(snap.hazards.is_empty());
    assert_eq!(snap.power_ups.len() + collected(&snap.events), 3);
    assert_eq!(engine.round().round, 2);
}

#[test]
fn test_ring_of_fire_burns_outside() {
    let mut tuning = Tuning::default();
    tuning.ring.start_delay_ticks = 0;
    tuning.ring.min_radius = 100.0;
    tuning.ring.shrink_per_tick = 1000.0;
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 2,
        tuning,
        ring_of_fire: true,
        layout: ArenaLayout::Empty,
        ..Default::default()
    })
    .unwrap();
    engine.queue_command(PlayerCommand::StartMatch {
        mode: GameMode::Competitive,
    });
    engine.tick();
    engine.skip_grace();
    engine.place_tank(0, Vec2::new(600.0, 400.0), 0.0);
    engine.place_tank(1, Vec2::new(100.0, 100.0), 0.0);
    clear::<PowerUp>(&mut engine);
    engine.tick();
    assert_eq!(engine.tank(0).unwrap().health, 100.0);
    assert_eq!(engine.tank(1).unwrap().health, 99.0);
}

// ---- Safe positions ----

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0f32..1100.0, 0.0f32..700.0, 20.0f32..120.0, 20.0f32..120.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_safe_positions_clear_walls(
        walls in prop::collection::vec(rect_strategy(), 10..40),
        seed in any::<u64>(),
    ) {
        let t = Tuning::default();
        let (cols, rows) = t.grid_dims();
        let grid = TileGrid::new(cols, rows, t.arena.tile_size);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut placed: Vec<Vec2> = Vec::new();

        for _ in 0..4 {
            let rules = Placement {
                kind: SpawnKind::Tank,
                obstacles: &walls,
                terrain: &grid,
                avoid: &placed,
                tuning: &t,
            };
            let found = find_safe_position(&mut rng, &rules).or_else(|| scan_safe_position(&rules));
            let Some(pos) = found else { break };
            for w in &walls {
                prop_assert!(!w.expanded(t.spawn.wall_clearance).contains(pos));
            }
            for other in &placed {
                prop_assert!(other.distance(pos) >= t.spawn.min_tank_distance);
            }
            placed.push(pos);
        }
    }
}
