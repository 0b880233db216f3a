use std::process::ExitCode;

use log::{error, info};

use arena_app::demo::{bot_commands, DemoArgs};
use arena_app::game_loop::TICK_DURATION;
use arena_app::state::AppState;
use arena_core::commands::PlayerCommand;
use arena_core::enums::GameMode;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let args = DemoArgs::parse(std::env::args().skip(1))?;
    let config = args.config()?;
    info!(
        "demo: seed {}, {} players, {} ticks",
        args.seed, args.players, args.ticks
    );

    let state = AppState::new();
    state.start(config)?;
    state.send(PlayerCommand::StartMatch {
        mode: GameMode::Competitive,
    })?;

    let snapshot = loop {
        std::thread::sleep(TICK_DURATION);
        let Some(snapshot) = state.snapshot()? else {
            continue;
        };
        if snapshot.time.tick >= args.ticks {
            break snapshot;
        }
        for command in bot_commands(&snapshot) {
            state.send(command)?;
        }
    };
    state.shutdown()?;

    info!(
        "demo finished at tick {} in round {}",
        snapshot.time.tick, snapshot.round
    );
    let summary = serde_json::json!({
        "tick": snapshot.time.tick,
        "round": snapshot.round,
        "scores": snapshot.scores,
        "kills": snapshot.kills,
    });
    println!("{summary}");
    Ok(())
}
