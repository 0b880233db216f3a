//! Host state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use log::info;

use arena_core::commands::PlayerCommand;
use arena_core::state::GameStateSnapshot;
use arena_sim::engine::{SimConfig, SimulationEngine};

use crate::game_loop;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handles to a running game loop.
///
/// - `mpsc::Sender` sits behind a `Mutex` so the state can be shared by reference
/// - `Mutex<Option<...>>` holds what only exists once `start` has been called
/// - `Arc<Mutex<...>>` holds the latest snapshot, written by the loop thread
pub struct AppState {
    /// `None` before `start` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot for synchronous polling. Updated after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    pub running: Mutex<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
            handle: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from `config` and start the game loop thread.
    pub fn start(&self, config: SimConfig) -> Result<(), String> {
        let mut running = self.running.lock().map_err(|e| e.to_string())?;
        if *running {
            return Err("Simulation already running".into());
        }

        let engine = SimulationEngine::new(config).map_err(|e| e.to_string())?;
        let (cmd_tx, handle) = game_loop::spawn_game_loop(engine, self.latest_snapshot.clone())
            .map_err(|e| format!("Failed to spawn game loop: {e}"))?;

        *self.command_tx.lock().map_err(|e| e.to_string())? = Some(cmd_tx);
        *self.handle.lock().map_err(|e| e.to_string())? = Some(handle);
        *running = true;
        info!("game loop started");
        Ok(())
    }

    /// Forward a player command to the game loop.
    pub fn send(&self, command: PlayerCommand) -> Result<(), String> {
        let tx_lock = self.command_tx.lock().map_err(|e| e.to_string())?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .map_err(|e| format!("Failed to send command: {e}")),
            None => Err("Simulation not started".into()),
        }
    }

    /// The latest snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> Result<Option<GameStateSnapshot>, String> {
        let lock = self.latest_snapshot.lock().map_err(|e| e.to_string())?;
        Ok(lock.clone())
    }

    /// Stop the loop and wait for its thread to exit.
    pub fn shutdown(&self) -> Result<(), String> {
        let mut running = self.running.lock().map_err(|e| e.to_string())?;
        if let Some(tx) = self.command_tx.lock().map_err(|e| e.to_string())?.take() {
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        if let Some(handle) = self.handle.lock().map_err(|e| e.to_string())?.take() {
            handle
                .join()
                .map_err(|_| "Game loop thread panicked".to_string())?;
        }
        *running = false;
        info!("game loop stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::enums::GameMode;
    use std::time::{Duration, Instant};

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
        assert!(!*state.running.lock().unwrap());
    }

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        assert!(state.send(PlayerCommand::Pause).is_err());
    }

    #[test]
    fn test_start_rejects_bad_config() {
        let state = AppState::new();
        let result = state.start(SimConfig {
            player_count: 0,
            ..Default::default()
        });
        assert!(result.is_err());
        assert!(!*state.running.lock().unwrap());
    }

    #[test]
    fn test_start_run_shutdown() {
        let state = AppState::new();
        state.start(SimConfig::default()).unwrap();
        assert!(state.start(SimConfig::default()).is_err(), "double start");
        state
            .send(PlayerCommand::StartMatch {
                mode: GameMode::Competitive,
            })
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut ticked = false;
        while Instant::now() < deadline {
            if let Some(snap) = state.snapshot().unwrap() {
                if snap.time.tick > 0 {
                    ticked = true;
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(ticked);

        state.shutdown().unwrap();
        assert!(!*state.running.lock().unwrap());
        assert!(state.send(PlayerCommand::Pause).is_err());
    }
}
