//! Simulation loop runner with operator controls.
//!
//! [`run_simulation`] wraps the single-tick [`run_tick`] function with the
//! control plane:
//!
//! - **Command queue**: spawn and stop commands are drained at the top of
//!   every iteration, before the tick runs
//! - **Operator stop**: a shared flag checked before every tick
//! - **Bounded simulation**: stop after `max_ticks`
//! - **Pacing**: sleep `tick_interval_ms` between ticks
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use savanna_agents::{AgentError, Mover, PairEngine};
use tracing::{info, warn};

use crate::command::{self, CommandReceiver};
use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickReport};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// A queued spawn command failed.
    #[error("command error: {source}")]
    Command {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick report, if any tick completed.
    pub final_report: Option<TickReport>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// The engine uses this to print text frames.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, report: &TickReport, state: &SimulationState);
}

/// A no-op tick callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _report: &TickReport, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick or a queued command fails.
pub async fn run_simulation(
    state: &mut SimulationState,
    mover: &mut dyn Mover,
    pairing: &mut dyn PairEngine,
    operator: &Arc<OperatorState>,
    commands: &mut CommandReceiver,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_report: Option<TickReport> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        population = state.population.len(),
        "Simulation starting"
    );

    loop {
        // --- Drain queued commands ---
        if command::drain_commands(state, commands)? {
            info!("Stop command received");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::StopCommand,
                final_report: last_report,
                total_ticks,
            });
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::OperatorStop,
                final_report: last_report,
                total_ticks,
            });
        }

        // --- Execute tick ---
        let report = tick::run_tick(state, mover, pairing)?;

        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&report, state);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(report.tick) {
            info!(
                tick = report.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_report: Some(report),
                total_ticks,
            });
        }

        last_report = Some(report);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult, operator: &OperatorState) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        elapsed_seconds = operator.elapsed_seconds(),
        final_tick = result.final_report.as_ref().map(|r| r.tick),
        final_population = result.final_report.as_ref().map(|r| r.population),
        "Simulation ended"
    );

    if result.final_report.is_none() {
        warn!("Simulation ended with no ticks executed");
    }
}
