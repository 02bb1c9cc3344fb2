//! Engine binary for the Savanna simulation.
//!
//! Wires configuration, the seeded population, operator controls and the
//! tick loop together, then runs until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `savanna-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the grid and simulation state
//! 4. Place the initial lions and antelopes
//! 5. Create operator state and hook Ctrl-C to it
//! 6. Start the stdin command reader
//! 7. Run the simulation loop
//! 8. Log the result

mod error;
mod frame;
mod input;
mod spawner;

use std::path::Path;
use std::sync::Arc;

use savanna_agents::{PairBook, SavannaMover};
use savanna_core::command;
use savanna_core::config::SimulationConfig;
use savanna_core::operator::OperatorState;
use savanna_core::runner::{self, NoOpCallback, TickCallback};
use savanna_core::tick::SimulationState;
use savanna_world::Grid;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::frame::FrameCallback;

const CONFIG_PATH: &str = "savanna-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration; it names the fallback log level.
    let config = load_config()?;

    // 2. Initialize structured logging.
    let fallback_level = config.logging.level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level)),
        )
        .with_target(true)
        .init();

    info!("savanna-engine starting");
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        tick_interval_ms = config.world.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Create the grid and simulation state.
    let grid = Grid::new(config.world.width, config.world.height).map_err(EngineError::from)?;
    let mut state = SimulationState::new(grid, config.world.seed);
    info!(capacity = state.grid.capacity(), "Grid created");

    // 4. Place the initial population.
    spawner::spawn_initial_population(&mut state, &config.population)
        .map_err(EngineError::from)?;

    // 5. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.world.tick_interval_ms,
        &config.simulation,
    ));
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after the current tick");
                    operator.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }

    // 6. Start the stdin command reader.
    let (commands_tx, mut commands_rx) = command::command_channel();
    match input::spawn_stdin_reader(commands_tx) {
        Ok(_) => info!("Input ready: a = antelope, l = lion, q = quit"),
        Err(e) => warn!(error = %e, "failed to start stdin reader, input disabled"),
    }

    // 7. Run the simulation.
    let mut frames = FrameCallback::new(config.display.color);
    let mut silent = NoOpCallback;
    let callback: &mut dyn TickCallback = if config.display.frames {
        &mut frames
    } else {
        &mut silent
    };

    let result = runner::run_simulation(
        &mut state,
        &mut SavannaMover,
        &mut PairBook::new(),
        &operator,
        &mut commands_rx,
        callback,
    )
    .await
    .map_err(EngineError::from)?;

    // 8. Log results.
    runner::log_simulation_end(&result, &operator);

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "savanna-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration from the working directory.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config = SimulationConfig::load_or_default(Path::new(CONFIG_PATH))?;
    Ok(config)
}
