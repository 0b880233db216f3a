//! Game loop thread: runs the simulation engine at the tick rate and
//! publishes snapshots.
//!
//! The engine is moved into this thread. Commands arrive via `mpsc` channel.
//! Snapshots are stored in shared state for synchronous polling. A panic in
//! one tick is logged and the loop carries on with the next.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{error, info};

use arena_core::constants::TICK_RATE;
use arena_core::events::SimEvent;
use arena_core::state::GameStateSnapshot;
use arena_sim::engine::SimulationEngine;

use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("arena-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// Run `f`, turning a panic into `None`.
pub fn guarded<T>(tick: u64, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            error!("tick {tick}: game loop panic caught: {msg}");
            None
        }
    }
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let tick = engine.time().tick;
        if let Some(snapshot) = guarded(tick, || engine.tick()) {
            log_round_events(&snapshot.events);

            // 3. Store latest snapshot for synchronous polling
            if let Ok(mut lock) = latest_snapshot.lock() {
                *lock = Some(snapshot);
            }
        }

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind: skip the backlog
            next_tick_time = now;
        }
    }
}

fn log_round_events(events: &[SimEvent]) {
    for event in events {
        if let SimEvent::TankDestroyed { player, killer } = event {
            match killer {
                Some(k) if k != player => info!("player {k} destroyed player {player}"),
                _ => info!("player {player} was destroyed"),
            }
        }
    }
}
